pub mod bot_config;

pub use bot_config::{bot_id_from_token, token_from_env, BotConfig, TOKEN_ENV_VAR};
