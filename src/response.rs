//! Building command responses for Discord inputs.

use crate::errors::{Error, Result};
use crate::framework::{
    CommandResponse, ContextualFn, Input, OutputContent, SerializableArgument, UserContext,
};
use crate::input::DiscordInput;

/// Optional setting for [`new_response`].
pub enum RespOption {
    /// Hand the sender's next input to this function.
    Next(ContextualFn),
    /// Hand the sender's next input to a registered continuation, described in a persistable way.
    NextSerializable(SerializableArgument),
}

/// The sender's next input goes to `next`.
#[must_use]
pub fn resp_with_next(next: ContextualFn) -> RespOption {
    RespOption::Next(next)
}

/// The sender's next input goes to the continuation described by `argument`.
#[must_use]
pub fn resp_with_next_serializable(argument: SerializableArgument) -> RespOption {
    RespOption::NextSerializable(argument)
}

/// Creates a [`CommandResponse`] replying to a Discord input.
///
/// `content` is usually a `String`; pass `OutputContent::custom(CreateMessage)` for
/// rich messages. Options are applied in order, so the last continuation wins.
///
/// # Errors
/// Returns [`Error::InputMismatch`] when `input` was not produced by this adapter.
pub fn new_response(
    input: &dyn Input,
    content: impl Into<OutputContent>,
    options: impl IntoIterator<Item = RespOption>,
) -> Result<CommandResponse> {
    if !input.as_any().is::<DiscordInput>() {
        return Err(Error::InputMismatch);
    }

    let user_context = options.into_iter().fold(None, |_, option| {
        Some(match option {
            RespOption::Next(next) => UserContext::Next(next),
            RespOption::NextSerializable(argument) => UserContext::Serializable(argument),
        })
    });

    Ok(CommandResponse {
        content: content.into(),
        user_context,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::framework::{BoxFuture, BotError, HelpInput, OutputDestination};
    use crate::input::message_to_input;
    use crate::test_utils::message_event;
    use chrono::{DateTime, Utc};
    use serenity::all::CreateMessage;
    use std::any::Any;
    use std::sync::Arc;

    fn discord_input() -> DiscordInput {
        message_to_input(&message_event("ch-1", ".echo hi", "user-1")).unwrap()
    }

    fn echo_next() -> ContextualFn {
        Arc::new(|input: Arc<dyn Input>| -> BoxFuture<'static, std::result::Result<CommandResponse, BotError>> {
            Box::pin(async move { Ok(CommandResponse::new(input.message().to_string())) })
        })
    }

    #[test]
    fn test_simple_response() {
        let response = new_response(&discord_input(), "hello", []).unwrap();
        assert!(matches!(&response.content, OutputContent::Text(text) if text == "hello"));
        assert!(response.user_context.is_none());
    }

    #[test]
    fn test_rich_response() {
        let response = new_response(&discord_input(), OutputContent::custom(CreateMessage::new()), []).unwrap();
        match response.content {
            OutputContent::Custom(payload) => assert!(payload.is::<CreateMessage>()),
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_response_with_next() {
        let response = new_response(&discord_input(), "tell me more", [resp_with_next(echo_next())]).unwrap();

        let Some(UserContext::Next(next)) = response.user_context else {
            panic!("expected an in-memory continuation");
        };
        let followup: Arc<dyn Input> = Arc::new(discord_input());
        let reply = next(followup).await.unwrap();
        assert!(matches!(reply.content, OutputContent::Text(text) if text == ".echo hi"));
    }

    #[test]
    fn test_response_with_serializable_next() {
        let argument = SerializableArgument::new("guess", serde_json::json!({ "answer": 42 }));
        let response = new_response(
            &discord_input(),
            "guess a number",
            [resp_with_next_serializable(argument.clone())],
        )
        .unwrap();

        match response.user_context {
            Some(UserContext::Serializable(stored)) => assert_eq!(stored, argument),
            other => panic!("unexpected user context: {other:?}"),
        }
    }

    #[test]
    fn test_last_option_wins() {
        let argument = SerializableArgument::new("guess", serde_json::Value::Null);
        let response = new_response(
            &discord_input(),
            "pick",
            [resp_with_next_serializable(argument), resp_with_next(echo_next())],
        )
        .unwrap();

        assert!(matches!(response.user_context, Some(UserContext::Next(_))));
    }

    #[derive(Debug)]
    struct Nowhere;

    impl OutputDestination for Nowhere {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct ForeignInput;

    impl Input for ForeignInput {
        fn sender_key(&self) -> &str {
            "foreign"
        }

        fn message(&self) -> &str {
            "hi"
        }

        fn sent_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::default()
        }

        fn reply_to(&self) -> Box<dyn OutputDestination> {
            Box::new(Nowhere)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_foreign_input_is_rejected() {
        let err = new_response(&ForeignInput, "hello", []).unwrap_err();
        assert!(matches!(err, Error::InputMismatch));
    }

    #[test]
    fn test_sentinel_input_is_rejected() {
        let help = HelpInput::new(Arc::new(discord_input()));
        assert!(new_response(&help, "hello", []).is_err());
    }

    #[test]
    fn test_serializable_argument_round_trips_through_json() {
        let argument = SerializableArgument::new("guess", serde_json::json!([1, 2, 3]));
        let encoded = serde_json::to_string(&argument).unwrap();
        let decoded: SerializableArgument = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, argument);
    }
}
