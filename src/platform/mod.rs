//! Boundary between the bot logic and the Discord API.
//!
//! [`GuildApi`] lists every outbound call the managers make. [`SerenityApi`]
//! implements it over serenity's HTTP client; tests use an in-memory mock.

pub mod serenity_api;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId, UserId};

use crate::error::Result;

pub use serenity_api::SerenityApi;

/// A rich embed, independent of the serenity builder types
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub colour: u32,
    pub fields: Vec<CardField>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Card {
    pub fn new(title: impl Into<String>, colour: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            colour,
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// The parts of a fetched message needed to recognise a verification card
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSnapshot {
    pub author_id: UserId,
    /// Title of each embed in order (`None` for untitled embeds)
    pub embed_titles: Vec<Option<String>>,
}

/// Outbound Discord operations used by the bot
#[async_trait]
pub trait GuildApi: Send + Sync {
    /// The bot's own user id
    fn bot_user_id(&self) -> UserId;

    /// Send `card` in `channel_id` as a reply to `message_id`
    async fn reply_card(&self, channel_id: ChannelId, message_id: MessageId, card: &Card) -> Result<()>;

    /// Post `card` in `channel_id` and return the new message's id
    async fn post_card(&self, channel_id: ChannelId, card: &Card) -> Result<MessageId>;

    async fn add_reaction(&self, channel_id: ChannelId, message_id: MessageId, emoji: &str) -> Result<()>;

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()>;

    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<MessageSnapshot>;

    /// First role named `name` in the guild's role order, if any
    async fn find_role(&self, guild_id: GuildId, name: &str) -> Result<Option<RoleId>>;

    async fn create_role(&self, guild_id: GuildId, name: &str, colour: u32, reason: &str) -> Result<RoleId>;

    /// Roles currently held by the member, or `None` if the user is not in the guild
    async fn member_roles(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<Vec<RoleId>>>;

    async fn add_member_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()>;

    async fn remove_member_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()>;

    async fn direct_message(&self, user_id: UserId, content: &str) -> Result<()>;
}
