//! The Discord [`Adapter`].
//!
//! Inbound: every message event is translated with [`message_to_input`], the
//! bot's own messages are dropped, and the configured help and abort triggers are
//! turned into [`HelpInput`] and [`AbortInput`] before the value is enqueued.
//!
//! Outbound: text and help listings go out as plain messages, a serenity
//! [`CreateMessage`] placed in [`OutputContent::Custom`] goes out as a rich message,
//! and anything else is logged and dropped.

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::framework::{
    AbortInput, Adapter, BotError, BotInput, BotType, CommandHelps, EnqueueInput, HelpInput,
    Input, NotifyError, Output, OutputContent,
};
use crate::input::{ChannelId, MessageEvent, message_to_input};
use crate::session::{MessageHandler, SerenitySession, Session, SessionState};
use async_trait::async_trait;
use serenity::all::CreateMessage;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Bot type tag for the Discord integration.
pub const DISCORD: BotType = BotType::new("discord");

/// Construction-time adjustment for [`DiscordAdapter::new`].
pub enum AdapterOption {
    /// Use an already-configured session instead of creating one from the token.
    Session(Arc<dyn Session>),
}

/// Injects a pre-built session. Without it, [`DiscordAdapter::new`] creates a
/// serenity session from [`Config::token`].
#[must_use]
pub fn with_session(session: Arc<dyn Session>) -> AdapterOption {
    AdapterOption::Session(session)
}

/// [`Adapter`] implementation for Discord.
pub struct DiscordAdapter {
    config: Arc<Config>,
    session: Arc<dyn Session>,
}

impl DiscordAdapter {
    /// Creates an adapter from the given configuration and options.
    ///
    /// # Errors
    /// Returns [`Error::EmptyToken`] when no session is injected and the token is
    /// empty, and [`Error::Session`] when the session cannot be created.
    pub fn new(config: Config, options: impl IntoIterator<Item = AdapterOption>) -> Result<Self> {
        let mut session = None;
        for option in options {
            match option {
                AdapterOption::Session(injected) => session = Some(injected),
            }
        }

        let session = match session {
            Some(session) => session,
            None => {
                if config.token.is_empty() {
                    return Err(Error::EmptyToken);
                }
                let created = SerenitySession::new(&config.token, config.intents).map_err(|e| {
                    Error::Session(format!("failed to create Discord session: {e}"))
                })?;
                Arc::new(created) as Arc<dyn Session>
            }
        };

        Ok(Self {
            config: Arc::new(config),
            session,
        })
    }

    /// The configuration this adapter was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn close_session(&self) {
        if let Err(e) = self.session.close().await {
            error!("Failed to close Discord session: {}", e);
        }
    }

    fn message_handler(&self, enqueue: EnqueueInput) -> MessageHandler {
        let config = Arc::clone(&self.config);
        Arc::new(move |state: &SessionState, event: MessageEvent| {
            handle_message(&config, state, &event, &enqueue);
        })
    }
}

/// Routes one inbound event to the runtime.
fn handle_message(config: &Config, state: &SessionState, event: &MessageEvent, enqueue: &EnqueueInput) {
    let input = match message_to_input(event) {
        Ok(input) => input,
        Err(e) => {
            debug!("Skipping message {}: {}", event.id, e);
            return;
        }
    };

    // Without identity state the message is processed anyway.
    if let (Some(own_id), Some(author)) = (state.user_id.as_deref(), event.author.as_ref()) {
        if author.id == own_id {
            return;
        }
    }

    let trimmed = input.message().trim();
    let is_help = !config.help_command.is_empty() && trimmed == config.help_command;
    let is_abort = !config.abort_command.is_empty() && trimmed == config.abort_command;

    let input: Arc<dyn Input> = Arc::new(input);
    let value = if is_help {
        BotInput::Help(HelpInput::new(input))
    } else if is_abort {
        BotInput::Abort(AbortInput::new(input))
    } else {
        BotInput::Message(input)
    };

    let kind = value.kind();
    if let Err(e) = enqueue(value) {
        error!("Failed to enqueue {} input: {}", kind, e);
    }
}

/// Renders a command listing as one `**identifier**: instruction` line per entry.
#[must_use]
pub fn help_text(helps: &CommandHelps) -> String {
    helps
        .iter()
        .map(|h| format!("**{}**: {}", h.identifier, h.instruction))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Adapter for DiscordAdapter {
    fn bot_type(&self) -> BotType {
        DISCORD
    }

    #[instrument(skip_all, fields(bot_type = %DISCORD))]
    async fn run(&self, cancel: CancellationToken, enqueue: EnqueueInput, notify: NotifyError) {
        self.session.add_handler(self.message_handler(enqueue));

        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("Cancelled while opening the Discord session");
                self.close_session().await;
                return;
            }
            opened = self.session.open() => opened,
        };
        if let Err(e) = opened {
            notify(BotError::non_continuable(format!(
                "failed to open Discord session: {e}"
            )));
            return;
        }
        info!("Discord adapter is running");

        cancel.cancelled().await;

        info!("Shutting down Discord session...");
        self.close_session().await;
    }

    async fn send_message(&self, output: Output) {
        let (destination, content) = output.into_parts();
        let Some(channel) = destination.as_any().downcast_ref::<ChannelId>() else {
            error!("Destination is not a ChannelId: {:?}", destination);
            return;
        };

        match content {
            OutputContent::Text(text) => {
                if let Err(e) = self.session.send_message(channel, &text).await {
                    error!("Failed to send message to {}: {}", channel, e);
                }
            }
            OutputContent::Help(helps) => {
                let text = help_text(&helps);
                if let Err(e) = self.session.send_message(channel, &text).await {
                    error!("Failed to send help message to {}: {}", channel, e);
                }
            }
            OutputContent::Custom(payload) => match payload.downcast::<CreateMessage>() {
                Ok(message) => {
                    if let Err(e) = self.session.send_complex(channel, *message).await {
                        error!("Failed to send complex message to {}: {}", channel, e);
                    }
                }
                Err(_) => warn!("Unexpected output content for {}", channel),
            },
        }
    }
}
