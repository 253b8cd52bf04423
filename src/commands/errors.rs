use std::time::Duration;
use tracing::{debug, error, warn};

use crate::messages::{ADMIN_REQUIRED_NOTICE, NO_PERMISSION_NOTICE};
use crate::{Context, Data, Error};

/// How a command failure is surfaced to the invoking user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    UnknownCommand,
    MissingPermissions,
    Other,
}

impl Failure {
    pub fn of(error: &poise::FrameworkError<'_, Data, Error>) -> Self {
        match error {
            poise::FrameworkError::UnknownCommand { .. } => Failure::UnknownCommand,
            poise::FrameworkError::MissingUserPermissions { .. } => Failure::MissingPermissions,
            _ => Failure::Other,
        }
    }
}

/// Text of the transient notice for a failure, if the user should see one.
/// `admin_only` selects the administrator wording used by admin commands.
pub fn notice_for(failure: Failure, admin_only: bool) -> Option<&'static str> {
    match failure {
        Failure::MissingPermissions if admin_only => Some(ADMIN_REQUIRED_NOTICE),
        Failure::MissingPermissions => Some(NO_PERMISSION_NOTICE),
        Failure::UnknownCommand | Failure::Other => None,
    }
}

/// Send `text` in the invoking channel and delete it after `notice_seconds`
pub async fn send_transient_notice(ctx: Context<'_>, text: &str) {
    let ttl = Duration::from_secs(ctx.data().config.notice_seconds);

    let handle = match ctx.say(text).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to send notice in channel {}: {}", ctx.channel_id(), e);
            return;
        }
    };
    let message = match handle.into_message().await {
        Ok(message) => message,
        Err(e) => {
            warn!("Sent notice but could not fetch it for expiry: {}", e);
            return;
        }
    };

    let http = ctx.serenity_context().http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Err(e) = message.delete(&http).await {
            debug!("Failed to delete expired notice {}: {}", message.id, e);
        }
    });
}

/// Global handler for command dispatch failures
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    handle_failure(error, false).await
}

/// Log a command failure and post the matching notice, if any
pub async fn handle_failure(error: poise::FrameworkError<'_, Data, Error>, admin_only: bool) {
    let notice = notice_for(Failure::of(&error), admin_only);

    match error {
        poise::FrameworkError::UnknownCommand { .. } => {}
        poise::FrameworkError::MissingUserPermissions { missing_permissions, ctx, .. } => {
            warn!(
                "User {} missing permissions for '{}': {:?}",
                ctx.author().name,
                ctx.command().qualified_name,
                missing_permissions
            );
            if let Some(text) = notice {
                send_transient_notice(ctx, text).await;
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
        }
        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            error!(
                "Argument parse error in '{}': {} (input: {:?})",
                ctx.command().qualified_name,
                error,
                input
            );
        }
        poise::FrameworkError::MissingBotPermissions { missing_permissions, ctx, .. } => {
            error!(
                "Bot missing permissions for '{}': {:?}",
                ctx.command().qualified_name,
                missing_permissions
            );
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            debug!(
                "Command '{}' is guild-only, used in DM by {}",
                ctx.command().qualified_name,
                ctx.author().name
            );
        }
        other => {
            error!("Other framework error: {}", other);
        }
    }
}
