//! Bot framework contract.
//!
//! These are the transport-agnostic types a platform adapter exchanges with the
//! bot runtime: inputs flowing in, outputs flowing out, command responses with
//! optional continuations, and the [`Adapter`] trait itself. The runtime owns
//! command dispatch, worker scheduling and conversation storage; this module only
//! describes the values it hands to and accepts from an adapter.

/// [`Adapter`] trait, bot type tag and runtime callbacks
pub mod adapter;
/// Framework-level errors
pub mod error;
/// Inbound values and the help/abort sentinels
pub mod input;
/// Outbound values and command help listings
pub mod output;
/// Command responses and conversation continuations
pub mod response;

pub use adapter::{Adapter, BotType, EnqueueInput, NotifyError};
pub use error::BotError;
pub use input::{AbortInput, BotInput, HelpInput, Input};
pub use output::{CommandHelp, CommandHelps, Output, OutputContent, OutputDestination};
pub use response::{BoxFuture, CommandResponse, ContextualFn, SerializableArgument, UserContext};
