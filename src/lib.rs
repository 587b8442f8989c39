//! `discord-bridge` - Discord adapter for a generic chat-bot runtime
//!
//! This crate translates Discord message events into the runtime's inputs and the
//! runtime's outputs into Discord API calls. The runtime contract lives in
//! [`framework`]; [`adapter::DiscordAdapter`] implements it on top of a narrow
//! [`session::Session`] capability backed by serenity.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Discord adapter - run loop, inbound routing and outbound dispatch
pub mod adapter;
/// Adapter configuration: token, triggers, intents
pub mod config;
/// Unified error types and result handling
pub mod errors;
/// Bot runtime contract: inputs, outputs, responses, the `Adapter` trait
pub mod framework;
/// Inbound message events and their translation into inputs
pub mod input;
/// Response construction for Discord inputs
pub mod response;
/// Gateway session capability and its serenity implementation
pub mod session;

#[cfg(test)]
pub mod test_utils;

pub use adapter::{AdapterOption, DISCORD, DiscordAdapter, with_session};
pub use config::{Config, load_config};
pub use errors::{Error, Result};
pub use input::{ChannelId, DiscordInput, MessageEvent, message_to_input};
pub use response::{RespOption, new_response, resp_with_next, resp_with_next_serializable};
