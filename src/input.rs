//! Translation of inbound Discord messages into framework inputs.

use crate::errors::{Error, Result};
use crate::framework::{Input, OutputDestination};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;

/// A Discord channel, used as the destination of outgoing messages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// Creates a channel identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl OutputDestination for ChannelId {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Author of an inbound message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Author {
    /// Discord user id
    pub id: String,
    /// Username at the time the message was sent
    pub name: String,
    /// Whether the author is a bot account
    pub bot: bool,
}

/// A message-create event as delivered by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvent {
    /// Message id
    pub id: String,
    /// Channel the message was posted in
    pub channel_id: String,
    /// Guild, if not a direct message
    pub guild_id: Option<String>,
    /// Raw text content
    pub content: String,
    /// When Discord received the message
    pub timestamp: DateTime<Utc>,
    /// `None` for system messages
    pub author: Option<Author>,
}

/// A received Discord message in the framework's input shape.
#[derive(Clone, Debug)]
pub struct DiscordInput {
    /// The event this input was built from
    pub event: MessageEvent,
    sender_key: String,
    text: String,
    sent_at: DateTime<Utc>,
    channel_id: ChannelId,
}

impl DiscordInput {
    /// Channel the message came from.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }
}

impl Input for DiscordInput {
    fn sender_key(&self) -> &str {
        &self.sender_key
    }

    fn message(&self) -> &str {
        &self.text
    }

    fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    fn reply_to(&self) -> Box<dyn OutputDestination> {
        Box::new(self.channel_id.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Converts a message event into a [`DiscordInput`].
///
/// The sender key is `<channel id>_<author id>` so the runtime can follow one user
/// per channel. The text is kept as received.
///
/// # Errors
/// Returns [`Error::NoAuthor`] for events without an author.
pub fn message_to_input(event: &MessageEvent) -> Result<DiscordInput> {
    let author = event.author.as_ref().ok_or(Error::NoAuthor)?;

    Ok(DiscordInput {
        event: event.clone(),
        sender_key: format!("{}_{}", event.channel_id, author.id),
        text: event.content.clone(),
        sent_at: event.timestamp,
        channel_id: ChannelId::new(event.channel_id.clone()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::message_event;

    #[test]
    fn test_message_to_input_without_author_fails() {
        let mut event = message_event("ch-1", "hello", "user-1");
        event.author = None;

        let err = message_to_input(&event).unwrap_err();
        assert!(matches!(err, Error::NoAuthor));
    }

    #[test]
    fn test_message_to_input_fields() {
        let event = message_event("channel-123", "hello world", "user-456");
        let input = message_to_input(&event).unwrap();

        assert_eq!(input.sender_key(), "channel-123_user-456");
        assert_eq!(input.message(), "hello world");
        assert_eq!(input.sent_at(), event.timestamp);

        let reply_to = input.reply_to();
        let channel = reply_to.as_any().downcast_ref::<ChannelId>().unwrap();
        assert_eq!(channel, &ChannelId::from("channel-123"));

        assert_eq!(input.event, event);
    }

    #[test]
    fn test_message_is_not_trimmed() {
        let event = message_event("ch-1", "  .help  ", "user-1");
        let input = message_to_input(&event).unwrap();
        assert_eq!(input.message(), "  .help  ");
    }

    #[test]
    fn test_sender_key_is_stable_per_channel_and_author() {
        let first = message_to_input(&message_event("ch-1", "a", "user-1")).unwrap();
        let second = message_to_input(&message_event("ch-1", "b", "user-1")).unwrap();
        let other_channel = message_to_input(&message_event("ch-2", "a", "user-1")).unwrap();

        assert_eq!(first.sender_key(), second.sender_key());
        assert_ne!(first.sender_key(), other_channel.sender_key());
    }

    #[test]
    fn test_channel_id_display() {
        assert_eq!(ChannelId::new("42").to_string(), "42");
    }
}
