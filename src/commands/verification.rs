use tracing::info;

use crate::commands::errors::handle_failure;
use crate::{Context, Data, Error};

/// Admin command to send verification message
#[poise::command(
    prefix_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    on_error = "verify_error"
)]
pub async fn verify(ctx: Context<'_>) -> Result<(), Error> {
    let invoking_message = match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg.id),
        _ => None,
    };

    let data = ctx.data();
    let card_id = data
        .verification
        .issue_card(data.api.as_ref(), ctx.channel_id(), invoking_message)
        .await?;

    info!(
        "Verification card {} posted by {} in channel {}",
        card_id,
        ctx.author().name,
        ctx.channel_id()
    );
    Ok(())
}

/// Same as the global handler, but non-admins get the administrator notice
async fn verify_error(error: poise::FrameworkError<'_, Data, Error>) {
    handle_failure(error, true).await
}
