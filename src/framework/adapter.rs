use super::error::BotError;
use super::input::BotInput;
use super::output::Output;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Tag identifying which platform a bot talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BotType(&'static str);

impl BotType {
    /// Creates a bot type tag.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The tag as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Hands a received input to the runtime.
pub type EnqueueInput = Arc<dyn Fn(BotInput) -> Result<(), BotError> + Send + Sync>;

/// Reports an adapter failure to the runtime.
pub type NotifyError = Arc<dyn Fn(BotError) + Send + Sync>;

/// Bridge between one chat platform and the runtime.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Platform this adapter serves.
    fn bot_type(&self) -> BotType;

    /// Connects and feeds inputs to `enqueue` until `cancel` fires.
    async fn run(&self, cancel: CancellationToken, enqueue: EnqueueInput, notify: NotifyError);

    /// Delivers an output. Failures are the adapter's to log.
    async fn send_message(&self, output: Output);
}
