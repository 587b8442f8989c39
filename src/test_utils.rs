//! Shared test utilities.
//!
//! [`MockSession`] records every call the adapter makes so tests can run the
//! adapter without a gateway connection. The collectors capture what the adapter
//! hands back to the runtime.

#![allow(clippy::unwrap_used, missing_docs)]

use crate::errors::{Error, Result};
use crate::framework::{BotError, BotInput, EnqueueInput, NotifyError};
use crate::input::{Author, ChannelId, MessageEvent};
use crate::session::{MessageHandler, Session, SessionState};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serenity::all::CreateMessage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A call to one of the session's send operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentMessage {
    /// `send_message`
    Plain {
        /// Target channel
        channel: String,
        /// Text sent
        content: String,
    },
    /// `send_complex`
    Complex {
        /// Target channel
        channel: String,
    },
}

/// Recording [`Session`] stand-in.
#[derive(Default)]
pub struct MockSession {
    handlers: Mutex<Vec<MessageHandler>>,
    sent: Mutex<Vec<SentMessage>>,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
    open_started: Notify,
    fail_open: bool,
    hang_open: bool,
    fail_close: bool,
    fail_send: bool,
}

impl MockSession {
    /// `open` returns an error.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// `open` never completes, like a gateway that cannot be reached.
    pub fn hanging_open(mut self) -> Self {
        self.hang_open = true;
        self
    }

    /// `close` returns an error.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Both send operations record the call and then return an error.
    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Delivers an event to every registered handler, as the gateway would.
    pub fn deliver(&self, state: &SessionState, event: MessageEvent) {
        let handlers = self.handlers.lock().unwrap().clone();
        for handler in &handlers {
            handler(state, event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Resolves once `open` has been called.
    pub async fn opened(&self) {
        self.open_started.notified().await;
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Every send call so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, message: SentMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message);
        if self.fail_send {
            return Err(Error::Session("send failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MockSession {
    fn add_handler(&self, handler: MessageHandler) {
        self.handlers.lock().unwrap().push(handler);
    }

    async fn open(&self) -> Result<()> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        self.open_started.notify_one();
        if self.hang_open {
            std::future::pending::<()>().await;
        }
        if self.fail_open {
            return Err(Error::Session("connection refused".to_string()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(Error::Session("close failed".to_string()));
        }
        Ok(())
    }

    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<()> {
        self.record(SentMessage::Plain {
            channel: channel.to_string(),
            content: content.to_string(),
        })
    }

    async fn send_complex(&self, channel: &ChannelId, _message: CreateMessage) -> Result<()> {
        self.record(SentMessage::Complex {
            channel: channel.to_string(),
        })
    }
}

/// Builds a regular message event from `author_id` in `channel_id`.
pub fn message_event(channel_id: &str, content: &str, author_id: &str) -> MessageEvent {
    MessageEvent {
        id: "message-1".to_string(),
        channel_id: channel_id.to_string(),
        guild_id: Some("guild-1".to_string()),
        content: content.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        author: Some(Author {
            id: author_id.to_string(),
            name: format!("{author_id}-name"),
            bot: false,
        }),
    }
}

/// Enqueue callback that stores every value it receives.
pub fn collect_inputs() -> (EnqueueInput, Arc<Mutex<Vec<BotInput>>>) {
    let inputs = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&inputs);
    let enqueue: EnqueueInput = Arc::new(move |input: BotInput| -> std::result::Result<(), BotError> {
        sink.lock().unwrap().push(input);
        Ok(())
    });
    (enqueue, inputs)
}

/// Notify callback that stores every error it receives.
pub fn notify_collector() -> (NotifyError, Arc<Mutex<Vec<BotError>>>) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let notify: NotifyError = Arc::new(move |error: BotError| sink.lock().unwrap().push(error));
    (notify, errors)
}
