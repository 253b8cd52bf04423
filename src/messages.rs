// src/messages.rs
use std::time::Duration;

use crate::config::BotConfig;
use crate::platform::Card;

pub const HELP_COLOUR: u32 = 0x00ff00;
pub const INFO_COLOUR: u32 = 0x0099ff;
/// Green used for the auto-created verification role
pub const VERIFIED_ROLE_COLOUR: u32 = 0x2ecc71;

pub const ROLE_CREATE_REASON: &str = "Auto-created for verification system";
pub const ROLE_GRANT_REASON: &str = "User verified via reaction";
pub const ROLE_REVOKE_REASON: &str = "User removed verification reaction";

pub const ADMIN_REQUIRED_NOTICE: &str = "❌ You need administrator permissions to use this command!";
pub const NO_PERMISSION_NOTICE: &str = "❌ You don't have permission to use this command!";

const MACRO_HELP_BODY: &str = "\
**🔧 Macro Help & Troubleshooting**

**Common Macro Issues:**
• **Macro not running**: Check if macros are enabled in your application settings
• **Permission errors**: Run your application as administrator
• **Syntax errors**: Review your macro code for typos or missing brackets
• **Variable issues**: Ensure all variables are properly declared and initialized

**Quick Fixes:**
1. Restart your application
2. Clear macro cache/temp files
3. Check for conflicting macros
4. Verify file permissions

**Need more help?** Please share:
- What application you're using
- Error message (if any)
- What you're trying to accomplish
- Steps you've already tried

*Our community is here to help! 💪*";

/// Reply sent when a message mentions one of the help keywords
pub fn macro_help_card() -> Card {
    Card::new("🔧 Macro Help", HELP_COLOUR)
        .description(MACRO_HELP_BODY)
        .footer("Need more specific help? Ask in detail!")
}

/// The card users react to in order to get verified.
/// The title must contain `config.card_marker`.
pub fn verification_card(config: &BotConfig) -> Card {
    Card::new(format!("🔐 {}", config.card_marker), INFO_COLOUR)
        .description(format!(
            "React with {} to get verified and access all channels!",
            config.verify_emoji
        ))
        .field(
            "Why verify?",
            "Verification helps keep our server secure and ensures you're a real person.",
            false,
        )
        .footer("Click the reaction below to verify!")
}

pub fn bot_help_card(config: &BotConfig) -> Card {
    Card::new("🤖 Bot Commands", INFO_COLOUR)
        .field(
            "Bot Commands",
            format!(
                "`{}` - Show this help message\n`{}` - Check bot latency",
                config.command("bothelp"),
                config.command("ping")
            ),
            false,
        )
        .field(
            "Admin Commands",
            format!(
                "`{}` - Send verification message (Admin only)",
                config.command("verify")
            ),
            false,
        )
        .field(
            "Auto Features",
            "• Responds to macro help keywords automatically\n\
             • Gives roles when users react to verification messages",
            false,
        )
        .field("Macro Keywords", config.keywords.join(", "), false)
}

pub fn verified_dm(guild_name: &str) -> String {
    format!("✅ You've been verified in **{}**! Welcome!", guild_name)
}

pub fn pong_message(latency: Duration) -> String {
    format!("🏓 Pong! Latency: {}ms", (latency.as_secs_f64() * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_card_contains_marker_and_emoji() {
        let config = BotConfig::default();
        let card = verification_card(&config);
        assert_eq!(card.title, "🔐 Server Verification");
        assert!(card.description.as_deref().unwrap().contains("✅"));
        assert_eq!(card.fields.len(), 1);
        assert!(!card.fields[0].inline);
        assert_eq!(card.footer.as_deref(), Some("Click the reaction below to verify!"));
    }

    #[test]
    fn test_bot_help_lists_keywords_and_commands() {
        let config = BotConfig::default();
        let card = bot_help_card(&config);
        let keywords = card.fields.iter().find(|f| f.name == "Macro Keywords").unwrap();
        assert_eq!(keywords.value, "help, macro, issue, problem, bug, error");
        assert!(card.fields[0].value.contains("`!!ping`"));
        assert!(card.fields[1].value.contains("`!!verify`"));
    }

    #[test]
    fn test_macro_help_card() {
        let card = macro_help_card();
        assert_eq!(card.title, "🔧 Macro Help");
        assert_eq!(card.colour, 0x00ff00);
        assert!(card.description.unwrap().starts_with("**🔧 Macro Help & Troubleshooting**"));
    }

    #[test]
    fn test_pong_rounds_to_milliseconds() {
        assert_eq!(pong_message(Duration::from_micros(42_600)), "🏓 Pong! Latency: 43ms");
        assert_eq!(pong_message(Duration::ZERO), "🏓 Pong! Latency: 0ms");
    }
}
