// src/verification/types.rs
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId, UserId};

/// The user behind a reaction
#[derive(Debug, Clone)]
pub struct Reactor {
    pub id: UserId,
    pub name: String,
    pub bot: bool,
}

/// A reaction added to or removed from a message
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub guild_id: Option<GuildId>,
    /// Guild name from the cache, used for logs and the DM
    pub guild_name: Option<String>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: String,
    pub reactor: Reactor,
}

impl ReactionEvent {
    pub fn guild_label(&self) -> String {
        match (&self.guild_name, self.guild_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "DM".to_string(),
        }
    }
}

/// Why a reaction event was not acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    BotReactor,
    OtherEmoji,
    NotInGuild,
    NotVerificationCard,
    NotAMember,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    Skipped(Skip),
    /// The member already had the role
    AlreadyVerified,
    /// The role is missing and could not be created
    RoleUnavailable,
    /// The bot may not assign the role
    PermissionDenied,
    Granted { role_id: RoleId, notified: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
    Skipped(Skip),
    /// No role with the configured name exists
    RoleMissing,
    /// The member did not hold the role
    NotVerified,
    PermissionDenied,
    Revoked { role_id: RoleId },
}
