use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Discord bot that answers macro help questions and verifies members by reaction
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file overriding the built-in settings (defaults to $BOT_CONFIG_PATH)
    #[arg(long, short = 'c')]
    config: Option<String>,

    /// Log at DEBUG level
    #[arg(long)]
    debug: bool,
}

mod commands;
mod config;
mod error;
mod events;
mod logging;
mod managers;
mod messages;
mod platform;
mod verification;

use commands::{bothelp, ping, verify};
use config::BotConfig;
use events::{handle_message, handle_reaction_add, handle_reaction_remove};
use managers::{
    create_shared_keyword_responder, create_shared_verification_manager,
    run_startup_permission_check, SharedKeywordResponder, SharedVerificationManager,
};
use platform::{GuildApi, SerenityApi};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state. Read-only after startup.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub api: Arc<dyn GuildApi>,
    pub keyword_responder: SharedKeywordResponder,
    pub verification: SharedVerificationManager,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = handle_message(ctx, new_message, data).await {
                error!("Failed to handle message: {}", e);
            }
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(e) = handle_reaction_add(ctx, add_reaction, data).await {
                error!("Failed to handle reaction add: {}", e);
            }
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            if let Err(e) = handle_reaction_remove(ctx, removed_reaction, data).await {
                error!("Failed to handle reaction remove: {}", e);
            }
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    logging::init(args.debug);

    let token = match config::token_from_env() {
        Ok(token) => token,
        Err(e) => {
            error!("Error: {}", e);
            error!(
                "Make sure to set your bot token in the {} environment variable",
                config::TOKEN_ENV_VAR
            );
            std::process::exit(1);
        }
    };

    if let Some(id) = config::bot_id_from_token(&token) {
        info!("Bot ID: {} (configure intents at https://discord.com/developers/applications/{}/bot)", id, id);
    }

    let bot_config = match BotConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Prefix '{}', verification role '{}', trigger emoji {}, keywords: {}",
        bot_config.prefix,
        bot_config.verify_role_name,
        bot_config.verify_emoji,
        bot_config.keywords.join(", ")
    );

    let keyword_responder = create_shared_keyword_responder(bot_config.clone());
    let verification = create_shared_verification_manager(bot_config.clone());

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![verify(), bothelp(), ping()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(bot_config.prefix.clone()),
                mention_as_prefix: false,
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {}) in {}",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                        ctx.guild_id().map(|g| g.to_string()).unwrap_or_else(|| "DM".to_string())
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' completed for {}",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            on_error: |error| Box::pin(commands::on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            let config = bot_config.clone();
            let keyword_responder = keyword_responder.clone();
            let verification = verification.clone();

            Box::pin(async move {
                info!("{} has connected to Discord!", ready.user.name);
                info!("Bot is in {} servers", ready.guilds.len());

                let guild_ids: Vec<serenity::GuildId> = ready.guilds.iter().map(|g| g.id).collect();
                if !guild_ids.is_empty() {
                    if !run_startup_permission_check(ctx.http.as_ref(), &guild_ids, &config.verify_role_name).await {
                        warn!("Starting with permission problems, verification may fail in some guilds");
                    }
                } else {
                    warn!("Bot is not in any guilds - skipping permission check");
                }

                let api: Arc<dyn GuildApi> = Arc::new(SerenityApi::new(ctx.http.clone(), ready.user.id));

                Ok(Data {
                    config,
                    api,
                    keyword_responder,
                    verification,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("Enable MESSAGE_CONTENT and GUILD_MEMBERS under Privileged Gateway Intents:");
            error!("Go to https://discord.com/developers/applications -> Your App -> Bot -> Privileged Gateway Intents");
            return Err(anyhow::anyhow!("Disallowed gateway intents"));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
