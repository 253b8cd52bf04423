use tracing::info;

use crate::messages::{bot_help_card, pong_message};
use crate::platform::serenity_api::build_embed;
use crate::{Context, Error};

/// Check bot latency
#[poise::command(prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    info!("Ping command called by {} ({:?})", ctx.author().name, latency);
    ctx.say(pong_message(latency)).await?;
    Ok(())
}

/// Show bot help
#[poise::command(prefix_command)]
pub async fn bothelp(ctx: Context<'_>) -> Result<(), Error> {
    let card = bot_help_card(&ctx.data().config);
    ctx.send(poise::CreateReply::default().embed(build_embed(&card)))
        .await?;
    Ok(())
}
