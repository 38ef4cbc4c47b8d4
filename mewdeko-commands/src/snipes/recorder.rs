//! Stores deleted and edited messages for the snipe commands.

use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use mewdeko_core::Data;
use mewdeko_database::impls::snipes::{is_snipe_enabled, record_snipe};
use mewdeko_utils::time::now_unix_secs;

/// Whether an edit is worth keeping: a human author whose text actually changed.
pub fn is_snipeable_edit(author_is_bot: bool, old_content: &str, new_content: &str) -> bool {
    !author_is_bot && !old_content.trim().is_empty() && old_content != new_content
}

/// Record a deleted message. Only messages still in the gateway cache can be
/// recovered.
pub async fn record_deleted(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
    guild_id: Option<serenity::GuildId>,
) {
    // Deletes the bot made itself (filters, purges) are not sniped.
    if data.suppressed_deletes.take(message_id.get()) {
        return;
    }

    let Some(guild_id) = guild_id else {
        return;
    };

    let Some(message) = ctx
        .cache
        .message(channel_id, message_id)
        .map(|message| serenity::Message::clone(&message))
    else {
        debug!(message_id = %message_id, "deleted message not cached, skipping snipe");
        return;
    };

    if message.author.bot || message.content.trim().is_empty() {
        return;
    }

    store(data, guild_id, &message, &message.content, false).await;
}

/// Record the previous content of an edited message.
pub async fn record_edited(
    data: &Data,
    guild_id: Option<serenity::GuildId>,
    old: Option<&serenity::Message>,
    new_content: Option<&str>,
) {
    let (Some(guild_id), Some(old)) = (guild_id, old) else {
        return;
    };

    let new_content = new_content.unwrap_or(old.content.as_str());
    if !is_snipeable_edit(old.author.bot, &old.content, new_content) {
        return;
    }

    store(data, guild_id, old, &old.content, true).await;
}

async fn store(
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    content: &str,
    edited: bool,
) {
    match is_snipe_enabled(&data.db, guild_id.get()).await {
        Ok(true) => {}
        Ok(false) => return,
        Err(source) => {
            error!(?source, "failed to read snipe config");
            return;
        }
    }

    if let Err(source) = record_snipe(
        &data.db,
        guild_id.get(),
        message.channel_id.get(),
        message.author.id.get(),
        content,
        edited,
        now_unix_secs(),
    )
    .await
    {
        error!(?source, edited, "failed to record snipe");
    }
}

#[cfg(test)]
mod tests {
    use super::is_snipeable_edit;

    #[test]
    fn only_real_human_edits_are_kept() {
        assert!(is_snipeable_edit(false, "before", "after"));
        assert!(!is_snipeable_edit(true, "before", "after"));
        assert!(!is_snipeable_edit(false, "same", "same"));
        assert!(!is_snipeable_edit(false, "  ", "after"));
    }
}
