use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// Environment variable holding the gateway token
pub const TOKEN_ENV_VAR: &str = "DISCORD_BOT_TOKEN";

/// Environment variable pointing at an optional JSON config file
pub const CONFIG_PATH_ENV_VAR: &str = "BOT_CONFIG_PATH";

pub const DEFAULT_PREFIX: &str = "!!";
pub const DEFAULT_KEYWORDS: [&str; 6] = ["help", "macro", "issue", "problem", "bug", "error"];
pub const DEFAULT_VERIFY_ROLE_NAME: &str = "Verified";
pub const DEFAULT_VERIFY_EMOJI: &str = "✅";
pub const DEFAULT_CARD_MARKER: &str = "Server Verification";
pub const DEFAULT_NOTICE_SECONDS: u64 = 10;

/// Bot behaviour settings, fixed for the lifetime of the process.
/// Loaded from an optional JSON file; every field falls back to the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Command prefix. Messages starting with it never trigger the auto-responder.
    pub prefix: String,
    /// Substrings that trigger the Macro Help reply (matched case-insensitively)
    pub keywords: Vec<String>,
    /// Name of the role granted by the reaction verification flow
    pub verify_role_name: String,
    /// Reaction that grants/revokes the role
    pub verify_emoji: String,
    /// Substring of the embed title that marks a verification card
    pub card_marker: String,
    /// Lifetime of transient error notices
    pub notice_seconds: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            verify_role_name: DEFAULT_VERIFY_ROLE_NAME.to_string(),
            verify_emoji: DEFAULT_VERIFY_EMOJI.to_string(),
            card_marker: DEFAULT_CARD_MARKER.to_string(),
            notice_seconds: DEFAULT_NOTICE_SECONDS,
        }
    }
}

impl BotConfig {
    /// Load from a JSON file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BotError::ConfigLoad {
            path: path.to_string(),
            source: e,
        })?;

        let config: BotConfig =
            serde_json::from_str(&content).map_err(|e| BotError::ConfigParse {
                path: path.to_string(),
                source: e,
            })?;

        config.normalized()
    }

    /// Load from `path` if given, otherwise from `BOT_CONFIG_PATH`, otherwise defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV_VAR).ok();
        match path.or(env_path.as_deref()) {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Lowercase and trim keywords, then validate
    pub fn normalized(mut self) -> Result<Self> {
        self.keywords = self
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("prefix", &self.prefix),
            ("verify_role_name", &self.verify_role_name),
            ("verify_emoji", &self.verify_emoji),
            ("card_marker", &self.card_marker),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BotError::ConfigValidation {
                    message: format!("'{}' must not be empty", field),
                });
            }
        }
        if self.keywords.is_empty() {
            return Err(BotError::ConfigValidation {
                message: "'keywords' must contain at least one keyword".to_string(),
            });
        }
        Ok(())
    }

    /// Message content with the prefix prepended, e.g. `!!ping`
    pub fn command(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

/// Read the gateway token from the environment
pub fn token_from_env() -> Result<String> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(BotError::MissingToken {
            var: TOKEN_ENV_VAR.to_string(),
        }),
    }
}

/// Decode the bot/application id from the first token segment
pub fn bot_id_from_token(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    // Discord tokens use URL-safe base64 without padding
    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(segment)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(segment))
        .ok()?;
    let id = String::from_utf8(decoded).ok()?;
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}
