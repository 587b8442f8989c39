//! Inbound values handed from an adapter to the runtime.

use super::output::OutputDestination;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A message received by an adapter, stripped down to what the runtime needs.
pub trait Input: Send + Sync + 'static {
    /// Stable key identifying the sender; used to correlate multi-turn conversations.
    fn sender_key(&self) -> &str;

    /// Received text.
    fn message(&self) -> &str;

    /// When the message was sent.
    fn sent_at(&self) -> DateTime<Utc>;

    /// Where a reply to this input should go.
    fn reply_to(&self) -> Box<dyn OutputDestination>;

    /// Access to the concrete type, for adapter-specific extensions.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("sender_key", &self.sender_key())
            .field("message", &self.message())
            .field("sent_at", &self.sent_at())
            .finish()
    }
}

macro_rules! sentinel_input {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            input: Arc<dyn Input>,
        }

        impl $name {
            /// Wraps the given input.
            #[must_use]
            pub fn new(input: Arc<dyn Input>) -> Self {
                Self { input }
            }

            /// The input this sentinel wraps.
            #[must_use]
            pub fn inner(&self) -> &Arc<dyn Input> {
                &self.input
            }
        }

        impl Input for $name {
            fn sender_key(&self) -> &str {
                self.input.sender_key()
            }

            fn message(&self) -> &str {
                self.input.message()
            }

            fn sent_at(&self) -> DateTime<Utc> {
                self.input.sent_at()
            }

            fn reply_to(&self) -> Box<dyn OutputDestination> {
                self.input.reply_to()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

sentinel_input!(
    /// Signals that the sender asked for the list of available commands.
    HelpInput
);

sentinel_input!(
    /// Signals that the sender wants to drop the current conversational context.
    AbortInput
);

/// The value an adapter enqueues for the runtime.
#[derive(Clone, Debug)]
pub enum BotInput {
    /// An ordinary message, subject to command matching.
    Message(Arc<dyn Input>),
    /// The help trigger was received.
    Help(HelpInput),
    /// The abort trigger was received.
    Abort(AbortInput),
}

impl BotInput {
    /// The underlying input regardless of variant.
    #[must_use]
    pub fn input(&self) -> &Arc<dyn Input> {
        match self {
            Self::Message(input) => input,
            Self::Help(help) => help.inner(),
            Self::Abort(abort) => abort.inner(),
        }
    }

    /// Short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Help(_) => "help",
            Self::Abort(_) => "abort",
        }
    }
}
