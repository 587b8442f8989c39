//! Outbound values handed from the runtime to an adapter.

use std::any::Any;
use std::fmt;

/// Where an [`Output`] should be delivered. Each adapter defines its own destination type.
pub trait OutputDestination: fmt::Debug + Send + Sync + 'static {
    /// Access to the concrete type so the adapter can recover its own destination.
    fn as_any(&self) -> &dyn Any;
}

/// One entry of a command listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandHelp {
    /// Command identifier
    pub identifier: String,
    /// How to invoke the command
    pub instruction: String,
}

impl CommandHelp {
    /// Creates a help entry.
    #[must_use]
    pub fn new(identifier: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            instruction: instruction.into(),
        }
    }
}

/// Help entries for every command the sender may use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandHelps(pub Vec<CommandHelp>);

impl CommandHelps {
    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandHelp> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CommandHelp>> for CommandHelps {
    fn from(value: Vec<CommandHelp>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a CommandHelps {
    type Item = &'a CommandHelp;
    type IntoIter = std::slice::Iter<'a, CommandHelp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Payload of an [`Output`].
pub enum OutputContent {
    /// Plain text.
    Text(String),
    /// A command listing, rendered by the adapter.
    Help(CommandHelps),
    /// Adapter-specific payload, e.g. a rich Discord message. Adapters downcast
    /// and ignore what they do not recognize.
    Custom(Box<dyn Any + Send + Sync>),
}

impl OutputContent {
    /// Wraps an adapter-specific payload.
    pub fn custom<T: Any + Send + Sync>(payload: T) -> Self {
        Self::Custom(Box::new(payload))
    }
}

impl fmt::Debug for OutputContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Help(helps) => f.debug_tuple("Help").field(helps).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<String> for OutputContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OutputContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<CommandHelps> for OutputContent {
    fn from(value: CommandHelps) -> Self {
        Self::Help(value)
    }
}

/// A message the runtime wants an adapter to deliver.
#[derive(Debug)]
pub struct Output {
    destination: Box<dyn OutputDestination>,
    content: OutputContent,
}

impl Output {
    /// Creates an output for the given destination.
    #[must_use]
    pub fn new(destination: Box<dyn OutputDestination>, content: OutputContent) -> Self {
        Self {
            destination,
            content,
        }
    }

    /// Delivery target.
    #[must_use]
    pub fn destination(&self) -> &dyn OutputDestination {
        self.destination.as_ref()
    }

    /// Payload.
    #[must_use]
    pub const fn content(&self) -> &OutputContent {
        &self.content
    }

    /// Splits the output into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Box<dyn OutputDestination>, OutputContent) {
        (self.destination, self.content)
    }
}
