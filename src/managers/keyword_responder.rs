use poise::serenity_prelude::{ChannelId, MessageId};
use std::sync::Arc;
use tracing::debug;

use crate::config::BotConfig;
use crate::error::Result;
use crate::messages::macro_help_card;
use crate::platform::GuildApi;

/// An inbound chat message, as far as the auto-responder cares
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_name: String,
    pub author_bot: bool,
    pub content: String,
}

/// Replies with the Macro Help card when a message mentions a help keyword.
///
/// There is no cooldown: every qualifying message gets its own reply.
pub struct KeywordResponder {
    config: Arc<BotConfig>,
}

impl KeywordResponder {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }

    /// First configured keyword found in `content` (case-insensitive substring)
    pub fn matched_keyword(&self, content: &str) -> Option<&str> {
        let lowered = content.to_lowercase();
        self.config
            .keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Prefixed messages belong to the command dispatcher
    pub fn should_reply(&self, content: &str) -> bool {
        !content.starts_with(&self.config.prefix) && self.matched_keyword(content).is_some()
    }

    /// Returns whether a reply was sent
    pub async fn handle(&self, api: &dyn GuildApi, message: &IncomingMessage) -> Result<bool> {
        if message.author_bot || !self.should_reply(&message.content) {
            return Ok(false);
        }

        debug!(
            "Keyword '{}' from {} in channel {}",
            self.matched_keyword(&message.content).unwrap_or_default(),
            message.author_name,
            message.channel_id
        );
        api.reply_card(message.channel_id, message.message_id, &macro_help_card())
            .await?;
        Ok(true)
    }
}

/// Shared keyword responder type
pub type SharedKeywordResponder = Arc<KeywordResponder>;

pub fn create_shared_keyword_responder(config: Arc<BotConfig>) -> SharedKeywordResponder {
    Arc::new(KeywordResponder::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{Call, MockApi};

    fn responder() -> KeywordResponder {
        KeywordResponder::new(Arc::new(BotConfig::default()))
    }

    fn message(content: &str) -> IncomingMessage {
        IncomingMessage {
            channel_id: ChannelId::new(1),
            message_id: MessageId::new(2),
            author_name: "bob".to_string(),
            author_bot: false,
            content: content.to_string(),
        }
    }

    fn replies(api: &MockApi) -> usize {
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::Reply { .. }))
            .count()
    }

    #[test]
    fn test_keyword_matching_is_substring_and_case_insensitive() {
        let responder = responder();
        assert_eq!(responder.matched_keyword("My MACRO broke"), Some("macro"));
        assert_eq!(responder.matched_keyword("helpful tips"), Some("help"));
        assert_eq!(responder.matched_keyword("debugging"), Some("bug"));
        assert_eq!(responder.matched_keyword("all good here"), None);
    }

    #[test]
    fn test_prefixed_messages_never_qualify() {
        let responder = responder();
        assert!(!responder.should_reply("!!macro"));
        assert!(!responder.should_reply("!!help me with this error"));
        assert!(responder.should_reply("! macro"));
        assert!(responder.should_reply(" !!macro"));
    }

    #[tokio::test]
    async fn test_single_reply_for_multiple_keywords() {
        let api = MockApi::new();
        let sent = responder()
            .handle(&api, &message("my macro has an error"))
            .await
            .unwrap();

        assert!(sent);
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Reply { message_id, card, .. } => {
                assert_eq!(*message_id, MessageId::new(2));
                assert_eq!(card.title, "🔧 Macro Help");
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_qualifying_message_gets_a_reply() {
        let api = MockApi::new();
        let responder = responder();
        for _ in 0..3 {
            responder.handle(&api, &message("bug again")).await.unwrap();
        }
        assert_eq!(replies(&api), 3);
    }

    #[tokio::test]
    async fn test_prefixed_message_gets_no_reply() {
        let api = MockApi::new();
        let sent = responder().handle(&api, &message("!!macro")).await.unwrap();
        assert!(!sent);
        assert_eq!(replies(&api), 0);
    }

    #[tokio::test]
    async fn test_bot_authors_ignored() {
        let api = MockApi::new();
        let mut msg = message("error error error");
        msg.author_bot = true;
        assert!(!responder().handle(&api, &msg).await.unwrap());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_message_without_keyword_ignored() {
        let api = MockApi::new();
        assert!(!responder().handle(&api, &message("good morning")).await.unwrap());
        assert!(api.calls().is_empty());
    }
}
