//! In-memory [`GuildApi`] for tests.

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, RoleId, UserId};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Card, GuildApi, MessageSnapshot};
use crate::error::{BotError, Result};

pub const BOT_USER_ID: u64 = 900;

/// Every mutating call the bot made, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reply { channel_id: ChannelId, message_id: MessageId, card: Card },
    Post { channel_id: ChannelId, card: Card },
    React { channel_id: ChannelId, message_id: MessageId, emoji: String },
    Delete { channel_id: ChannelId, message_id: MessageId },
    CreateRole { guild_id: GuildId, name: String, colour: u32, reason: String },
    AddRole { user_id: UserId, role_id: RoleId, reason: String },
    RemoveRole { user_id: UserId, role_id: RoleId, reason: String },
    DirectMessage { user_id: UserId, content: String },
}

#[derive(Default)]
struct State {
    /// Guild roles in Discord order
    roles: Vec<(RoleId, String)>,
    members: HashMap<UserId, Vec<RoleId>>,
    messages: HashMap<MessageId, MessageSnapshot>,
    calls: Vec<Call>,
    next_id: u64,
}

/// Failure switches
#[derive(Default, Clone, Copy)]
pub struct Failures {
    pub create_role_forbidden: bool,
    pub member_role_forbidden: bool,
    pub dm_closed: bool,
    pub dm_broken: bool,
    pub delete_unknown: bool,
    pub delete_forbidden: bool,
    /// Another handler creates the same role just before ours does
    pub concurrent_role_creation: bool,
}

pub struct MockApi {
    state: Mutex<State>,
    pub failures: Failures,
}

fn forbidden() -> BotError {
    BotError::PermissionDenied {
        message: "Missing Permissions".to_string(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::with_failures(Failures::default())
    }

    pub fn with_failures(failures: Failures) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 5000,
                ..Default::default()
            }),
            failures,
        }
    }

    pub fn add_role(&self, id: u64, name: &str) -> RoleId {
        let role_id = RoleId::new(id);
        self.state.lock().unwrap().roles.push((role_id, name.to_string()));
        role_id
    }

    pub fn add_member(&self, user_id: UserId, roles: Vec<RoleId>) {
        self.state.lock().unwrap().members.insert(user_id, roles);
    }

    pub fn add_message(&self, message_id: MessageId, snapshot: MessageSnapshot) {
        self.state.lock().unwrap().messages.insert(message_id, snapshot);
    }

    pub fn roles_named(&self, name: &str) -> Vec<RoleId> {
        let state = self.state.lock().unwrap();
        state
            .roles
            .iter()
            .filter(|(_, n)| n == name)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn member_has(&self, user_id: UserId, role_id: RoleId) -> bool {
        let state = self.state.lock().unwrap();
        state
            .members
            .get(&user_id)
            .is_some_and(|roles| roles.contains(&role_id))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change role state (create/add/remove)
    pub fn role_mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateRole { .. } | Call::AddRole { .. } | Call::RemoveRole { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GuildApi for MockApi {
    fn bot_user_id(&self) -> UserId {
        UserId::new(BOT_USER_ID)
    }

    async fn reply_card(&self, channel_id: ChannelId, message_id: MessageId, card: &Card) -> Result<()> {
        self.record(Call::Reply {
            channel_id,
            message_id,
            card: card.clone(),
        });
        Ok(())
    }

    async fn post_card(&self, channel_id: ChannelId, card: &Card) -> Result<MessageId> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let message_id = MessageId::new(state.next_id);
        state.messages.insert(
            message_id,
            MessageSnapshot {
                author_id: UserId::new(BOT_USER_ID),
                embed_titles: vec![Some(card.title.clone())],
            },
        );
        state.calls.push(Call::Post {
            channel_id,
            card: card.clone(),
        });
        Ok(message_id)
    }

    async fn add_reaction(&self, channel_id: ChannelId, message_id: MessageId, emoji: &str) -> Result<()> {
        self.record(Call::React {
            channel_id,
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        if self.failures.delete_unknown {
            return Err(BotError::UnknownMessage {
                message: "Unknown Message".to_string(),
            });
        }
        if self.failures.delete_forbidden {
            return Err(forbidden());
        }
        self.record(Call::Delete {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn fetch_message(&self, _channel_id: ChannelId, message_id: MessageId) -> Result<MessageSnapshot> {
        self.state
            .lock()
            .unwrap()
            .messages
            .get(&message_id)
            .cloned()
            .ok_or_else(|| BotError::UnknownMessage {
                message: "Unknown Message".to_string(),
            })
    }

    async fn find_role(&self, _guild_id: GuildId, name: &str) -> Result<Option<RoleId>> {
        Ok(self.roles_named(name).first().copied())
    }

    async fn create_role(&self, guild_id: GuildId, name: &str, colour: u32, reason: &str) -> Result<RoleId> {
        if self.failures.create_role_forbidden {
            return Err(forbidden());
        }
        let mut state = self.state.lock().unwrap();
        if self.failures.concurrent_role_creation {
            state.next_id += 1;
            let competing = RoleId::new(state.next_id);
            state.roles.push((competing, name.to_string()));
        }
        state.next_id += 1;
        let role_id = RoleId::new(state.next_id);
        state.roles.push((role_id, name.to_string()));
        state.calls.push(Call::CreateRole {
            guild_id,
            name: name.to_string(),
            colour,
            reason: reason.to_string(),
        });
        Ok(role_id)
    }

    async fn member_roles(&self, _guild_id: GuildId, user_id: UserId) -> Result<Option<Vec<RoleId>>> {
        Ok(self.state.lock().unwrap().members.get(&user_id).cloned())
    }

    async fn add_member_role(&self, _guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()> {
        if self.failures.member_role_forbidden {
            return Err(forbidden());
        }
        let mut state = self.state.lock().unwrap();
        let roles = state.members.entry(user_id).or_default();
        if !roles.contains(&role_id) {
            roles.push(role_id);
        }
        state.calls.push(Call::AddRole {
            user_id,
            role_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn remove_member_role(&self, _guild_id: GuildId, user_id: UserId, role_id: RoleId, reason: &str) -> Result<()> {
        if self.failures.member_role_forbidden {
            return Err(forbidden());
        }
        let mut state = self.state.lock().unwrap();
        if let Some(roles) = state.members.get_mut(&user_id) {
            roles.retain(|r| *r != role_id);
        }
        state.calls.push(Call::RemoveRole {
            user_id,
            role_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn direct_message(&self, user_id: UserId, content: &str) -> Result<()> {
        if self.failures.dm_closed {
            return Err(BotError::DmClosed {
                message: "Cannot send messages to this user".to_string(),
            });
        }
        if self.failures.dm_broken {
            return Err(BotError::Discord {
                message: "Internal Server Error".to_string(),
            });
        }
        self.record(Call::DirectMessage {
            user_id,
            content: content.to_string(),
        });
        Ok(())
    }
}
