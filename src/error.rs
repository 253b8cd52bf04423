use serenity::http::HttpError;
use thiserror::Error;

/// Discord JSON error codes the bot reacts to.
pub mod codes {
    pub const UNKNOWN_MEMBER: i64 = 10007;
    pub const UNKNOWN_MESSAGE: i64 = 10008;
    pub const MISSING_ACCESS: i64 = 50001;
    pub const CANNOT_DM_USER: i64 = 50007;
    pub const MISSING_PERMISSIONS: i64 = 50013;
}

#[derive(Error, Debug)]
pub enum BotError {
    // Startup errors
    #[error("Missing {var} environment variable")]
    MissingToken { var: String },

    // Configuration errors
    #[error("Failed to load config file '{path}': {source}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // Discord errors
    #[error("Missing permissions: {message}")]
    PermissionDenied { message: String },

    #[error("Unknown message: {message}")]
    UnknownMessage { message: String },

    #[error("Unknown member: {message}")]
    UnknownMember { message: String },

    #[error("Cannot send messages to this user: {message}")]
    DmClosed { message: String },

    #[error("Discord API error: {message}")]
    Discord { message: String },
}

impl BotError {
    /// Classify a Discord failure from its HTTP status and JSON error code.
    pub fn from_discord_response(status: u16, code: i64, message: String) -> Self {
        match code {
            codes::MISSING_PERMISSIONS | codes::MISSING_ACCESS => BotError::PermissionDenied { message },
            codes::UNKNOWN_MESSAGE => BotError::UnknownMessage { message },
            codes::UNKNOWN_MEMBER => BotError::UnknownMember { message },
            codes::CANNOT_DM_USER => BotError::DmClosed { message },
            _ if status == 403 => BotError::PermissionDenied { message },
            _ => BotError::Discord { message },
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, BotError::PermissionDenied { .. })
    }
}

fn classify_http(err: &HttpError) -> Option<BotError> {
    if let HttpError::UnsuccessfulRequest(response) = err {
        return Some(BotError::from_discord_response(
            response.status_code.as_u16(),
            response.error.code as i64,
            response.error.message.clone(),
        ));
    }
    None
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(http_err) = &err {
            if let Some(classified) = classify_http(http_err) {
                return classified;
            }
        }
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_permission_codes() {
        let err = BotError::from_discord_response(403, 50013, "Missing Permissions".into());
        assert!(err.is_permission_denied());

        let err = BotError::from_discord_response(403, 50001, "Missing Access".into());
        assert!(err.is_permission_denied());

        // Unknown code on a 403 is still a permission failure
        let err = BotError::from_discord_response(403, 0, "Forbidden".into());
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_classify_specific_codes() {
        assert!(matches!(
            BotError::from_discord_response(404, 10008, "Unknown Message".into()),
            BotError::UnknownMessage { .. }
        ));
        assert!(matches!(
            BotError::from_discord_response(404, 10007, "Unknown Member".into()),
            BotError::UnknownMember { .. }
        ));
        assert!(matches!(
            BotError::from_discord_response(403, 50007, "Cannot send messages to this user".into()),
            BotError::DmClosed { .. }
        ));
        assert!(matches!(
            BotError::from_discord_response(500, 0, "Internal".into()),
            BotError::Discord { .. }
        ));
    }
}
