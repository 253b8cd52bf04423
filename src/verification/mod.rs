pub mod types;

use poise::serenity_prelude::UserId;

use crate::platform::MessageSnapshot;

pub use types::{GrantOutcome, ReactionEvent, Reactor, RevokeOutcome, Skip};

/// Whether `message` is a verification card: posted by the bot, with a first
/// embed whose title contains `marker`.
///
/// Cards are recognised structurally; no message ids are stored.
pub fn is_verification_card(message: &MessageSnapshot, bot_user_id: UserId, marker: &str) -> bool {
    if message.author_id != bot_user_id {
        return false;
    }
    match message.embed_titles.first() {
        Some(Some(title)) => title.contains(marker),
        _ => false,
    }
}
