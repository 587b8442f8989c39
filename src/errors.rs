//! Unified error types for the Discord adapter.

use thiserror::Error;

/// Errors raised while building the adapter, translating events, or talking to Discord.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither a token nor a pre-built session was supplied.
    #[error("token must be set or a session must be provided via with_session")]
    EmptyToken,

    /// The inbound message carries no author (system messages).
    #[error("message has no author")]
    NoAuthor,

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of the problem
        message: String,
    },

    /// The gateway session could not be created, opened or closed.
    #[error("Session error: {0}")]
    Session(String),

    /// A channel identifier that Discord cannot address.
    #[error("Invalid channel id: {0:?}")]
    InvalidChannelId(String),

    /// A response was built from an input that did not come from this adapter.
    #[error("input is not a Discord input")]
    InputMismatch,

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error bubbled up from serenity.
    #[error("Serenity error: {0}")]
    Serenity(Box<serenity::Error>),
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Serenity(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
