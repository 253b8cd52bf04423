use poise::serenity_prelude::{GuildId, Http, Permissions};
use tracing::{error, info, warn};

use crate::platform::serenity_api::first_named_role;

/// A single permission with its status
#[derive(Debug, Clone)]
pub struct PermissionStatus {
    pub name: &'static str,
    pub description: &'static str,
    pub has_permission: bool,
}

/// All required permissions for the bot
pub fn get_required_permissions() -> Vec<(&'static str, &'static str, Permissions)> {
    vec![
        ("VIEW_CHANNEL", "See channels and messages", Permissions::VIEW_CHANNEL),
        ("SEND_MESSAGES", "Reply to help keywords and commands", Permissions::SEND_MESSAGES),
        ("EMBED_LINKS", "Send help and verification cards", Permissions::EMBED_LINKS),
        ("ADD_REACTIONS", "Attach the verification reaction", Permissions::ADD_REACTIONS),
        ("READ_MESSAGE_HISTORY", "Read reacted-to verification cards", Permissions::READ_MESSAGE_HISTORY),
        ("MANAGE_MESSAGES", "Delete the !!verify command message", Permissions::MANAGE_MESSAGES),
        ("MANAGE_ROLES", "Create and assign the verification role", Permissions::MANAGE_ROLES),
    ]
}

/// Result of a permission check for a single guild
#[derive(Debug)]
pub struct GuildPermissionCheck {
    pub guild_id: GuildId,
    pub guild_name: String,
    pub permission_statuses: Vec<PermissionStatus>,
    pub has_all_permissions: bool,
    pub bot_role_position: Option<u16>,
    /// Position of the verification role, if it exists yet
    pub verify_role_position: Option<u16>,
    pub role_hierarchy_ok: bool,
}

/// Check each required permission against the bot's guild permissions
pub fn evaluate_permissions(bot_permissions: Permissions) -> Vec<PermissionStatus> {
    let administrator = bot_permissions.contains(Permissions::ADMINISTRATOR);
    get_required_permissions()
        .into_iter()
        .map(|(name, description, permission)| PermissionStatus {
            name,
            description,
            has_permission: administrator || bot_permissions.contains(permission),
        })
        .collect()
}

/// The bot can only assign roles strictly below its own highest role.
/// A verification role that doesn't exist yet is created below the bot.
pub fn role_hierarchy_ok(bot_role_position: Option<u16>, verify_role_position: Option<u16>) -> bool {
    match (bot_role_position, verify_role_position) {
        (Some(bot_pos), Some(verify_pos)) => bot_pos > verify_pos,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

/// Check bot permissions for a specific guild
pub async fn check_guild_permissions(
    http: &Http,
    guild_id: GuildId,
    verify_role_name: &str,
) -> Result<GuildPermissionCheck, String> {
    let guild = guild_id
        .to_partial_guild(http)
        .await
        .map_err(|e| format!("Failed to fetch guild {}: {}", guild_id, e))?;

    let bot_user = http
        .get_current_user()
        .await
        .map_err(|e| format!("Failed to get bot user: {}", e))?;

    let bot_member = guild
        .member(http, bot_user.id)
        .await
        .map_err(|e| format!("Failed to get bot member in guild {}: {}", guild_id, e))?;

    #[allow(deprecated)]
    let bot_permissions = guild.member_permissions(&bot_member);
    let permission_statuses = evaluate_permissions(bot_permissions);
    let has_all_permissions = permission_statuses.iter().all(|s| s.has_permission);

    let bot_role_position = bot_member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|role| role.position)
        .max();

    let verify_role_position = first_named_role(
        guild.roles.values().map(|r| (r.id, r.position, r.name.as_str())),
        verify_role_name,
    )
    .and_then(|id| guild.roles.get(&id))
    .map(|role| role.position);

    Ok(GuildPermissionCheck {
        guild_id,
        guild_name: guild.name.clone(),
        permission_statuses,
        has_all_permissions,
        bot_role_position,
        verify_role_position,
        role_hierarchy_ok: role_hierarchy_ok(bot_role_position, verify_role_position),
    })
}

/// Log permission check results with appropriate log levels
pub fn log_permission_check_results(results: &[GuildPermissionCheck], verify_role_name: &str) {
    info!("========================================");
    info!("       BOT PERMISSION CHECK");
    info!("========================================");

    for check in results {
        info!("Guild: '{}' (ID: {})", check.guild_name, check.guild_id);

        for status in &check.permission_statuses {
            if status.has_permission {
                info!("  [YES] {:<20} - {}", status.name, status.description);
            } else {
                error!("  [NO]  {:<20} - {}", status.name, status.description);
            }
        }

        match check.verify_role_position {
            Some(pos) if check.role_hierarchy_ok => {
                info!("  [OK] Bot role is above '{}' (position {})", verify_role_name, pos);
            }
            Some(pos) => {
                error!(
                    "  [FAIL] Bot role (position {}) is not above '{}' (position {})",
                    check.bot_role_position.unwrap_or(0),
                    verify_role_name,
                    pos
                );
                error!("  Fix: Go to Discord Server Settings > Roles > drag bot's role higher");
            }
            None => {
                info!("  [OK] '{}' role will be created on first verification", verify_role_name);
            }
        }

        if !check.has_all_permissions {
            let missing: Vec<_> = check
                .permission_statuses
                .iter()
                .filter(|s| !s.has_permission)
                .map(|s| s.name)
                .collect();
            error!("  Missing permissions: {}", missing.join(", "));
        }
    }

    if results.iter().all(|r| r.has_all_permissions && r.role_hierarchy_ok) {
        info!("OVERALL: All permission checks passed for all guilds");
    } else {
        warn!("OVERALL: Permission issues detected - some operations may fail!");
    }
}

/// Run a full permission check and log results.
/// Returns true if everything is OK.
pub async fn run_startup_permission_check(
    http: &Http,
    guild_ids: &[GuildId],
    verify_role_name: &str,
) -> bool {
    let mut results = Vec::new();
    for guild_id in guild_ids {
        match check_guild_permissions(http, *guild_id, verify_role_name).await {
            Ok(check) => results.push(check),
            Err(e) => {
                error!("Failed to check permissions for guild {}: {}", guild_id, e);
            }
        }
    }

    log_permission_check_results(&results, verify_role_name);
    results
        .iter()
        .all(|r| r.has_all_permissions && r.role_hierarchy_ok)
}
