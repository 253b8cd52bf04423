use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::messages::{
    verification_card, verified_dm, ROLE_CREATE_REASON, ROLE_GRANT_REASON, ROLE_REVOKE_REASON,
    VERIFIED_ROLE_COLOUR,
};
use crate::platform::GuildApi;
use crate::verification::{
    is_verification_card, GrantOutcome, ReactionEvent, RevokeOutcome, Skip,
};

/// Result of the checks shared by grant and revoke
enum Gate {
    Proceed(GuildId),
    Skip(Skip),
}

/// Reaction based verification: posts the card and grants/revokes the role.
///
/// Holds no state of its own. Every check is made against Discord on each
/// event, so duplicate or interleaved reactions converge on the right role
/// membership.
pub struct VerificationManager {
    config: Arc<BotConfig>,
}

impl VerificationManager {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }

    /// Post the verification card in `channel_id`, pre-attach the trigger
    /// emoji and delete the invoking command message.
    pub async fn issue_card(
        &self,
        api: &dyn GuildApi,
        channel_id: ChannelId,
        invoking_message: Option<MessageId>,
    ) -> Result<MessageId> {
        let card = verification_card(&self.config);
        let message_id = api.post_card(channel_id, &card).await?;
        api.add_reaction(channel_id, message_id, &self.config.verify_emoji)
            .await?;
        info!("Posted verification card {} in channel {}", message_id, channel_id);

        if let Some(invoking) = invoking_message {
            match api.delete_message(channel_id, invoking).await {
                Ok(()) => {}
                Err(BotError::UnknownMessage { .. }) => {
                    debug!("Command message {} already deleted", invoking);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(message_id)
    }

    /// Common gate for add/remove: bot reactor, emoji, guild and card identity
    async fn check_reaction(&self, api: &dyn GuildApi, event: &ReactionEvent) -> Result<Gate> {
        if event.reactor.bot {
            return Ok(Gate::Skip(Skip::BotReactor));
        }
        if event.emoji != self.config.verify_emoji {
            return Ok(Gate::Skip(Skip::OtherEmoji));
        }
        let Some(guild_id) = event.guild_id else {
            return Ok(Gate::Skip(Skip::NotInGuild));
        };

        let message = api.fetch_message(event.channel_id, event.message_id).await?;
        if !is_verification_card(&message, api.bot_user_id(), &self.config.card_marker) {
            return Ok(Gate::Skip(Skip::NotVerificationCard));
        }

        Ok(Gate::Proceed(guild_id))
    }

    /// Look up the verification role, creating it if it does not exist.
    /// Returns `None` if the bot may not create it.
    ///
    /// After creating, the role is looked up again so that handlers racing on
    /// the same guild all settle on the first match, not on their own copy.
    async fn resolve_or_create_role(
        &self,
        api: &dyn GuildApi,
        guild_id: GuildId,
        guild_label: &str,
    ) -> Result<Option<RoleId>> {
        let role_name = &self.config.verify_role_name;
        if let Some(role_id) = api.find_role(guild_id, role_name).await? {
            return Ok(Some(role_id));
        }

        match api
            .create_role(guild_id, role_name, VERIFIED_ROLE_COLOUR, ROLE_CREATE_REASON)
            .await
        {
            Ok(created) => {
                info!("Created {} role in {}", role_name, guild_label);
                let role_id = api.find_role(guild_id, role_name).await?.unwrap_or(created);
                if role_id != created {
                    warn!(
                        "{} role was created concurrently in {}, using {} instead of {}",
                        role_name, guild_label, role_id, created
                    );
                }
                Ok(Some(role_id))
            }
            Err(e) if e.is_permission_denied() => {
                error!("Unable to create role in {} - insufficient permissions", guild_label);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Handle a reaction being added
    pub async fn grant(&self, api: &dyn GuildApi, event: &ReactionEvent) -> Result<GrantOutcome> {
        let guild_id = match self.check_reaction(api, event).await? {
            Gate::Proceed(guild_id) => guild_id,
            Gate::Skip(skip) => return Ok(GrantOutcome::Skipped(skip)),
        };
        let guild_label = event.guild_label();
        let user = &event.reactor;

        let Some(role_id) = self.resolve_or_create_role(api, guild_id, &guild_label).await? else {
            return Ok(GrantOutcome::RoleUnavailable);
        };

        let Some(roles) = api.member_roles(guild_id, user.id).await? else {
            return Ok(GrantOutcome::Skipped(Skip::NotAMember));
        };
        if roles.contains(&role_id) {
            debug!("{} is already verified in {}", user.name, guild_label);
            return Ok(GrantOutcome::AlreadyVerified);
        }

        match api
            .add_member_role(guild_id, user.id, role_id, ROLE_GRANT_REASON)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_permission_denied() => {
                error!("Unable to add role to {} in {}", user.name, guild_label);
                return Ok(GrantOutcome::PermissionDenied);
            }
            Err(e) => return Err(e),
        }

        // The role stays even if the DM fails
        let notified = match api.direct_message(user.id, &verified_dm(&guild_label)).await {
            Ok(()) => true,
            Err(BotError::DmClosed { .. }) | Err(BotError::PermissionDenied { .. }) => {
                debug!("{} has DMs disabled", user.name);
                false
            }
            Err(e) => {
                warn!("Failed to send verification DM to {}: {}", user.name, e);
                false
            }
        };

        info!("Verified user {} in {}", user.name, guild_label);
        Ok(GrantOutcome::Granted { role_id, notified })
    }

    /// Handle a reaction being removed. Never creates the role.
    pub async fn revoke(&self, api: &dyn GuildApi, event: &ReactionEvent) -> Result<RevokeOutcome> {
        let guild_id = match self.check_reaction(api, event).await? {
            Gate::Proceed(guild_id) => guild_id,
            Gate::Skip(skip) => return Ok(RevokeOutcome::Skipped(skip)),
        };
        let guild_label = event.guild_label();
        let user = &event.reactor;

        let Some(role_id) = api.find_role(guild_id, &self.config.verify_role_name).await? else {
            return Ok(RevokeOutcome::RoleMissing);
        };

        let Some(roles) = api.member_roles(guild_id, user.id).await? else {
            return Ok(RevokeOutcome::Skipped(Skip::NotAMember));
        };
        if !roles.contains(&role_id) {
            return Ok(RevokeOutcome::NotVerified);
        }

        match api
            .remove_member_role(guild_id, user.id, role_id, ROLE_REVOKE_REASON)
            .await
        {
            Ok(()) => {
                info!("Removed verification from {} in {}", user.name, guild_label);
                Ok(RevokeOutcome::Revoked { role_id })
            }
            Err(e) if e.is_permission_denied() => {
                error!("Unable to remove role from {} in {}", user.name, guild_label);
                Ok(RevokeOutcome::PermissionDenied)
            }
            Err(e) => Err(e),
        }
    }
}

/// Shared verification manager type
pub type SharedVerificationManager = Arc<VerificationManager>;

pub fn create_shared_verification_manager(config: Arc<BotConfig>) -> SharedVerificationManager {
    Arc::new(VerificationManager::new(config))
}
