//! Gateway session abstraction.
//!
//! The adapter only needs to register a message handler, open and close the
//! connection, and send plain or rich messages. [`Session`] captures exactly that,
//! so the adapter can run against [`SerenitySession`] in production and against a
//! recording stand-in in tests.

use crate::errors::{Error, Result};
use crate::input::{Author, ChannelId, MessageEvent};
use async_trait::async_trait;
use serenity::all::{
    ChannelId as DiscordChannelId, Client, Context, CreateMessage, EventHandler, GatewayIntents,
    Http, Message, MessageType, Ready,
};
use serenity::gateway::ShardManager;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// How long [`SerenitySession::open`] waits for the gateway to report ready.
pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// What the session knows about its own connection when an event arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The bot's own user id, once the gateway has reported it
    pub user_id: Option<String>,
}

/// Callback invoked for every inbound message.
pub type MessageHandler = Arc<dyn Fn(&SessionState, MessageEvent) + Send + Sync>;

/// The subset of a Discord client the adapter relies on.
#[async_trait]
pub trait Session: Send + Sync {
    /// Registers a handler for inbound messages.
    fn add_handler(&self, handler: MessageHandler);

    /// Connects to the gateway.
    async fn open(&self) -> Result<()>;

    /// Disconnects from the gateway.
    async fn close(&self) -> Result<()>;

    /// Sends plain text to a channel.
    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<()>;

    /// Sends a rich message (embeds, components, attachments) to a channel.
    async fn send_complex(&self, channel: &ChannelId, message: CreateMessage) -> Result<()>;
}

struct Running {
    shard_manager: Arc<ShardManager>,
    task: JoinHandle<serenity::Result<()>>,
}

/// [`Session`] backed by serenity's gateway client and HTTP client.
pub struct SerenitySession {
    token: String,
    intents: GatewayIntents,
    http: Arc<Http>,
    handlers: Arc<RwLock<Vec<MessageHandler>>>,
    user_id: Arc<RwLock<Option<String>>>,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl SerenitySession {
    /// Creates a session for the given bot token. Nothing is connected until [`Session::open`].
    ///
    /// # Errors
    /// Returns [`Error::Session`] if the token is malformed.
    pub fn new(token: &str, intents: GatewayIntents) -> Result<Self> {
        serenity::utils::validate_token(token).map_err(|e| Error::Session(e.to_string()))?;

        Ok(Self {
            token: token.to_string(),
            intents,
            http: Arc::new(Http::new(token)),
            handlers: Arc::new(RwLock::new(Vec::new())),
            user_id: Arc::new(RwLock::new(None)),
            running: tokio::sync::Mutex::new(None),
        })
    }

    /// Intents requested on identify.
    #[must_use]
    pub const fn intents(&self) -> GatewayIntents {
        self.intents
    }
}

fn discord_channel(channel: &ChannelId) -> Result<DiscordChannelId> {
    match channel.as_str().parse::<u64>() {
        Ok(id) if id != 0 => Ok(DiscordChannelId::new(id)),
        _ => Err(Error::InvalidChannelId(channel.to_string())),
    }
}

#[async_trait]
impl Session for SerenitySession {
    fn add_handler(&self, handler: MessageHandler) {
        match self.handlers.write() {
            Ok(mut handlers) => handlers.push(handler),
            Err(poisoned) => poisoned.into_inner().push(handler),
        }
    }

    #[instrument(skip(self))]
    async fn open(&self) -> Result<()> {
        let (ready_rx, exit_rx) = {
            let mut running = self.running.lock().await;
            if running.is_some() {
                return Err(Error::Session("session is already open".to_string()));
            }

            let (ready_tx, ready_rx) = oneshot::channel();
            let events = GatewayEvents {
                handlers: Arc::clone(&self.handlers),
                user_id: Arc::clone(&self.user_id),
                ready: Mutex::new(Some(ready_tx)),
            };

            info!("Setting up Serenity client...");
            let mut client = Client::builder(&self.token, self.intents)
                .event_handler(events)
                .await?;
            let shard_manager = Arc::clone(&client.shard_manager);
            let (exit_tx, exit_rx) = oneshot::channel::<()>();
            let task = tokio::spawn(async move {
                let result = client.start().await;
                let _ = exit_tx.send(());
                result
            });

            // Stored before the handshake so `close` can stop a client that never became ready.
            *running = Some(Running {
                shard_manager,
                task,
            });
            (ready_rx, exit_rx)
        };

        let handshake = async {
            tokio::select! {
                ready = ready_rx => ready.is_ok(),
                _ = exit_rx => false,
            }
        };
        match timeout(READY_TIMEOUT, handshake).await {
            Ok(true) => {
                info!("Discord gateway connection is ready");
                Ok(())
            }
            Ok(false) => {
                self.close().await?;
                Err(Error::Session("gateway closed before ready".to_string()))
            }
            Err(_) => {
                if let Err(e) = self.close().await {
                    warn!("Failed to stop the unready gateway client: {}", e);
                }
                Err(Error::Session(format!(
                    "gateway not ready after {}s",
                    READY_TIMEOUT.as_secs()
                )))
            }
        }
    }

    #[instrument(skip(self))]
    async fn close(&self) -> Result<()> {
        let Some(running) = self.running.lock().await.take() else {
            debug!("Close called on a session that is not open");
            return Ok(());
        };

        running.shard_manager.shutdown_all().await;
        match running.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(Error::Session(format!("gateway task failed: {e}"))),
        }
    }

    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<()> {
        discord_channel(channel)?.say(&self.http, content).await?;
        Ok(())
    }

    async fn send_complex(&self, channel: &ChannelId, message: CreateMessage) -> Result<()> {
        discord_channel(channel)?
            .send_message(&self.http, message)
            .await?;
        Ok(())
    }
}

/// Serenity event handler that feeds registered [`MessageHandler`]s.
struct GatewayEvents {
    handlers: Arc<RwLock<Vec<MessageHandler>>>,
    user_id: Arc<RwLock<Option<String>>>,
    ready: Mutex<Option<oneshot::Sender<()>>>,
}

impl GatewayEvents {
    fn state(&self) -> SessionState {
        let user_id = match self.user_id.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        SessionState { user_id }
    }
}

#[async_trait]
impl EventHandler for GatewayEvents {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);
        match self.user_id.write() {
            Ok(mut guard) => *guard = Some(ready.user.id.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(ready.user.id.to_string()),
        }

        let sender = self.ready.lock().ok().and_then(|mut slot| slot.take());
        if let Some(sender) = sender {
            // The opener may have given up already; nothing to do then.
            let _ = sender.send(());
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let handlers = match self.handlers.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn!("Message handler registry was poisoned");
                poisoned.into_inner().clone()
            }
        };
        if handlers.is_empty() {
            return;
        }

        let state = self.state();
        let event = event_from_message(&msg);
        for handler in &handlers {
            handler(&state, event.clone());
        }
    }
}

/// Message kinds Discord posts on its own: member joins, pins, boosts, thread
/// and stage notices, and the like. Their `author` is whoever triggered the notice.
fn is_system_notice(kind: MessageType) -> bool {
    matches!(
        kind,
        MessageType::GroupRecipientAddition
            | MessageType::GroupRecipientRemoval
            | MessageType::GroupCallCreation
            | MessageType::GroupNameUpdate
            | MessageType::GroupIconUpdate
            | MessageType::PinsAdd
            | MessageType::MemberJoin
            | MessageType::NitroBoost
            | MessageType::NitroTier1
            | MessageType::NitroTier2
            | MessageType::NitroTier3
            | MessageType::ChannelFollowAdd
            | MessageType::GuildDiscoveryDisqualified
            | MessageType::GuildDiscoveryRequalified
            | MessageType::GuildDiscoveryGracePeriodInitialWarning
            | MessageType::GuildDiscoveryGracePeriodFinalWarning
            | MessageType::ThreadCreated
            | MessageType::GuildInviteReminder
            | MessageType::AutoModAction
            | MessageType::RoleSubscriptionPurchase
            | MessageType::StageStart
            | MessageType::StageEnd
            | MessageType::StageSpeaker
            | MessageType::StageTopic
            | MessageType::GuildIncidentAlertModeEnabled
            | MessageType::GuildIncidentAlertModeDisabled
            | MessageType::GuildIncidentReportRaid
            | MessageType::GuildIncidentReportFalseAlarm
    )
}

/// Converts a serenity message into a [`MessageEvent`].
///
/// System notices (see `is_system_notice`) are delivered without an author.
/// Everything a user or application wrote keeps its author, including replies,
/// command responses and thread starters.
#[must_use]
pub fn event_from_message(msg: &Message) -> MessageEvent {
    let author = (!is_system_notice(msg.kind)).then(|| Author {
        id: msg.author.id.to_string(),
        name: msg.author.name.clone(),
        bot: msg.author.bot,
    });

    MessageEvent {
        id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        guild_id: msg.guild_id.map(|id| id.to_string()),
        content: msg.content.clone(),
        timestamp: *msg.timestamp,
        author,
    }
}
