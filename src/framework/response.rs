//! Command responses and the continuations that carry a conversation forward.

use super::error::BotError;
use super::input::Input;
use super::output::{Output, OutputContent, OutputDestination};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, sendable future returned by continuations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Function that receives the same sender's next input.
pub type ContextualFn =
    Arc<dyn Fn(Arc<dyn Input>) -> BoxFuture<'static, Result<CommandResponse, BotError>> + Send + Sync>;

/// Persistable description of a continuation: the runtime looks the function up
/// by identifier and feeds it the stored argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableArgument {
    /// Identifier of a continuation registered with the runtime
    pub func_identifier: String,
    /// Argument passed to that continuation
    pub argument: serde_json::Value,
}

impl SerializableArgument {
    /// Creates a serializable continuation.
    #[must_use]
    pub fn new(func_identifier: impl Into<String>, argument: serde_json::Value) -> Self {
        Self {
            func_identifier: func_identifier.into(),
            argument,
        }
    }
}

/// What should handle the sender's next input.
#[derive(Clone)]
pub enum UserContext {
    /// In-memory continuation.
    Next(ContextualFn),
    /// Continuation that survives restarts.
    Serializable(SerializableArgument),
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next(_) => f.write_str("Next(..)"),
            Self::Serializable(arg) => f.debug_tuple("Serializable").field(arg).finish(),
        }
    }
}

/// Result of running a command.
#[derive(Debug)]
pub struct CommandResponse {
    /// What to send back
    pub content: OutputContent,
    /// Continuation for the sender's next message, if any
    pub user_context: Option<UserContext>,
}

impl CommandResponse {
    /// Response without continuation.
    #[must_use]
    pub fn new(content: impl Into<OutputContent>) -> Self {
        Self {
            content: content.into(),
            user_context: None,
        }
    }

    /// Turns the response into an output for the given destination, handing the
    /// continuation back to the caller.
    #[must_use]
    pub fn into_output(self, destination: Box<dyn OutputDestination>) -> (Output, Option<UserContext>) {
        (Output::new(destination, self.content), self.user_context)
    }
}
