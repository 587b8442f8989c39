use thiserror::Error;

/// Errors exchanged between an adapter and the bot runtime.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    /// The adapter cannot keep running; the runtime should stop this bot.
    #[error("bot cannot continue: {0}")]
    NonContinuable(String),

    /// The runtime refused an input (queue full or closed).
    #[error("failed to enqueue input: {0}")]
    Enqueue(String),

    /// A command or continuation failed.
    #[error("command error: {0}")]
    Command(String),
}

impl BotError {
    /// Builds the error an adapter reports when its connection cannot be established.
    #[must_use]
    pub fn non_continuable(message: impl Into<String>) -> Self {
        Self::NonContinuable(message.into())
    }

    /// Whether the runtime should stop the bot after receiving this error.
    #[must_use]
    pub const fn is_non_continuable(&self) -> bool {
        matches!(self, Self::NonContinuable(_))
    }
}
