use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::verification::{ReactionEvent, Reactor};
use crate::{Data, Error};

/// Resolve the reacting user and guild name for a gateway reaction
async fn reaction_event(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
) -> Result<ReactionEvent, Error> {
    let user = match &reaction.member {
        Some(member) => member.user.clone(),
        None => reaction.user(ctx).await?,
    };

    Ok(ReactionEvent {
        guild_id: reaction.guild_id,
        guild_name: reaction.guild_id.and_then(|id| id.name(&ctx.cache)),
        channel_id: reaction.channel_id,
        message_id: reaction.message_id,
        emoji: reaction.emoji.to_string(),
        reactor: Reactor {
            id: user.id,
            name: user.name,
            bot: user.bot,
        },
    })
}

/// Skip the user lookup for reactions that can never be verification reactions
fn is_trigger(emoji: &serenity::ReactionType, verify_emoji: &str) -> bool {
    emoji.to_string() == verify_emoji
}

/// Handle a reaction being added to any message
pub async fn handle_reaction_add(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    data: &Data,
) -> Result<(), Error> {
    if !is_trigger(&reaction.emoji, &data.config.verify_emoji) {
        return Ok(());
    }

    let event = reaction_event(ctx, reaction).await?;
    let outcome = data.verification.grant(data.api.as_ref(), &event).await?;
    debug!(
        "Reaction add by {} on {}: {:?}",
        event.reactor.name, event.message_id, outcome
    );
    Ok(())
}

/// Handle a reaction being removed from any message
pub async fn handle_reaction_remove(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    data: &Data,
) -> Result<(), Error> {
    if !is_trigger(&reaction.emoji, &data.config.verify_emoji) {
        return Ok(());
    }

    let event = reaction_event(ctx, reaction).await?;
    let outcome = data.verification.revoke(data.api.as_ref(), &event).await?;
    debug!(
        "Reaction remove by {} on {}: {:?}",
        event.reactor.name, event.message_id, outcome
    );
    Ok(())
}
