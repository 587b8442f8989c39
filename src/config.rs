//! Adapter configuration.
//!
//! The configuration can be built in code with [`Config::new`] or loaded from a
//! TOML file with [`load_config`]. Every field has a default, so a file only needs
//! the values it changes. The bot token is usually kept out of the file and taken
//! from `DISCORD_BOT_TOKEN` via [`Config::with_env_token`].

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serenity::all::GatewayIntents;
use std::fmt;
use std::path::Path;

/// Environment variable holding the bot token.
pub const TOKEN_ENV_VAR: &str = "DISCORD_BOT_TOKEN";

/// Default help trigger.
pub const DEFAULT_HELP_COMMAND: &str = ".help";

/// Default abort trigger.
pub const DEFAULT_ABORT_COMMAND: &str = ".abort";

/// Intents requested when none are configured.
#[must_use]
pub fn default_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Configuration for the Discord adapter.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot token. May stay empty when a session is injected.
    pub token: String,

    /// Exact text that asks for help. Empty disables help detection.
    pub help_command: String,

    /// Exact text that drops the current conversation. Empty disables abort detection.
    pub abort_command: String,

    /// Gateway intents, stored as raw bits.
    #[serde(with = "intents_bits")]
    pub intents: GatewayIntents,
}

impl Config {
    /// Creates a configuration with default triggers and intents and an empty token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the token with `DISCORD_BOT_TOKEN` when that variable is set.
    #[must_use]
    pub fn with_env_token(mut self) -> Self {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            tracing::debug!("Using bot token from {}", TOKEN_ENV_VAR);
            self.token = token;
        }
        self
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse TOML configuration: {e}"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            help_command: DEFAULT_HELP_COMMAND.to_string(),
            abort_command: DEFAULT_ABORT_COMMAND.to_string(),
            intents: default_intents(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("token", &token)
            .field("help_command", &self.help_command)
            .field("abort_command", &self.abort_command)
            .field("intents", &self.intents.bits())
            .finish()
    }
}

/// Loads the adapter configuration from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    Config::from_toml_str(&contents)
}

mod intents_bits {
    use serde::{Deserialize, Deserializer, Serializer};
    use serenity::all::GatewayIntents;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(intents: &GatewayIntents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(intents.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GatewayIntents, D::Error> {
        u64::deserialize(deserializer).map(GatewayIntents::from_bits_truncate)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new();
        assert_eq!(config.token, "");
        assert_eq!(config.help_command, ".help");
        assert_eq!(config.abort_command, ".abort");
        assert_eq!(
            config.intents,
            GatewayIntents::GUILD_MESSAGES
                | GatewayIntents::DIRECT_MESSAGES
                | GatewayIntents::MESSAGE_CONTENT
        );
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            token = "abc"
            help_command = "!help"
        "#;

        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.help_command, "!help");
        assert_eq!(config.abort_command, ".abort");
        assert_eq!(config.intents, default_intents());
    }

    #[test]
    fn test_parse_intents_bits() {
        let bits = GatewayIntents::GUILDS.bits();
        let config = Config::from_toml_str(&format!("intents = {bits}")).unwrap();
        assert_eq!(config.intents, GatewayIntents::GUILDS);
    }

    #[test]
    fn test_empty_triggers_are_kept() {
        let config = Config::from_toml_str("help_command = \"\"\nabort_command = \"\"").unwrap();
        assert!(config.help_command.is_empty());
        assert!(config.abort_command.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("token = ").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load_config("definitely/not/here/config.toml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            token: "super-secret".to_string(),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
