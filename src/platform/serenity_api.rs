use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ChannelId, GuildId, Http, MessageId, RoleId, UserId,
};
use std::sync::Arc;
use tracing::debug;

use super::{Card, GuildApi, MessageSnapshot};
use crate::error::{BotError, Result};

/// [`GuildApi`] backed by serenity's HTTP client
#[derive(Clone)]
pub struct SerenityApi {
    http: Arc<Http>,
    bot_user_id: UserId,
}

impl SerenityApi {
    pub fn new(http: Arc<Http>, bot_user_id: UserId) -> Self {
        Self { http, bot_user_id }
    }
}

/// Convert a [`Card`] into a serenity embed builder
pub fn build_embed(card: &Card) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(&card.title)
        .color(card.colour);
    if let Some(ref description) = card.description {
        embed = embed.description(description);
    }
    for field in &card.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(ref footer) = card.footer {
        embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
    }
    embed
}

/// Parse a configured emoji; anything that isn't a custom emoji tag is unicode
pub fn reaction_type(emoji: &str) -> serenity::ReactionType {
    serenity::ReactionType::try_from(emoji)
        .unwrap_or_else(|_| serenity::ReactionType::Unicode(emoji.to_string()))
}

/// Pick the first role named `name`, ordering like Discord's role list
/// (ascending position, then ascending id).
pub fn first_named_role<'a>(
    roles: impl IntoIterator<Item = (RoleId, u16, &'a str)>,
    name: &str,
) -> Option<RoleId> {
    roles
        .into_iter()
        .filter(|(_, _, role_name)| *role_name == name)
        .min_by_key(|(id, position, _)| (*position, id.get()))
        .map(|(id, _, _)| id)
}

#[async_trait]
impl GuildApi for SerenityApi {
    fn bot_user_id(&self) -> UserId {
        self.bot_user_id
    }

    async fn reply_card(&self, channel_id: ChannelId, message_id: MessageId, card: &Card) -> Result<()> {
        channel_id
            .send_message(
                &self.http,
                serenity::CreateMessage::new()
                    .embed(build_embed(card))
                    .reference_message((channel_id, message_id)),
            )
            .await?;
        Ok(())
    }

    async fn post_card(&self, channel_id: ChannelId, card: &Card) -> Result<MessageId> {
        let message = channel_id
            .send_message(&self.http, serenity::CreateMessage::new().embed(build_embed(card)))
            .await?;
        Ok(message.id)
    }

    async fn add_reaction(&self, channel_id: ChannelId, message_id: MessageId, emoji: &str) -> Result<()> {
        self.http
            .create_reaction(channel_id, message_id, &reaction_type(emoji))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        self.http.delete_message(channel_id, message_id, None).await?;
        Ok(())
    }

    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<MessageSnapshot> {
        let message = channel_id.message(&self.http, message_id).await?;
        Ok(MessageSnapshot {
            author_id: message.author.id,
            embed_titles: message.embeds.into_iter().map(|e| e.title).collect(),
        })
    }

    async fn find_role(&self, guild_id: GuildId, name: &str) -> Result<Option<RoleId>> {
        let roles = guild_id.roles(&self.http).await?;
        Ok(first_named_role(
            roles.values().map(|r| (r.id, r.position, r.name.as_str())),
            name,
        ))
    }

    async fn create_role(&self, guild_id: GuildId, name: &str, colour: u32, reason: &str) -> Result<RoleId> {
        let role = guild_id
            .create_role(
                &self.http,
                serenity::EditRole::new()
                    .name(name)
                    .colour(colour)
                    .audit_log_reason(reason),
            )
            .await?;
        Ok(role.id)
    }

    async fn member_roles(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<Vec<RoleId>>> {
        match guild_id.member(&self.http, user_id).await {
            Ok(member) => Ok(Some(member.roles)),
            Err(e) => match BotError::from(e) {
                BotError::UnknownMember { .. } => {
                    debug!("User {} is not a member of guild {}", user_id, guild_id);
                    Ok(None)
                }
                other => Err(other),
            },
        }
    }

    async fn add_member_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()> {
        self.http
            .add_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn remove_member_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, Some(reason))
            .await?;
        Ok(())
    }

    async fn direct_message(&self, user_id: UserId, content: &str) -> Result<()> {
        user_id
            .direct_message(&self.http, serenity::CreateMessage::new().content(content))
            .await?;
        Ok(())
    }
}
