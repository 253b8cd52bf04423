use poise::serenity_prelude as serenity;

use crate::managers::IncomingMessage;
use crate::{Data, Error};

/// Handle incoming messages
pub async fn handle_message(
    _ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages
    if msg.author.bot {
        return Ok(());
    }

    let incoming = IncomingMessage {
        channel_id: msg.channel_id,
        message_id: msg.id,
        author_name: msg.author.name.clone(),
        author_bot: msg.author.bot,
        content: msg.content.clone(),
    };

    // Prefixed messages are left to the poise command dispatcher
    data.keyword_responder
        .handle(data.api.as_ref(), &incoming)
        .await?;

    Ok(())
}
