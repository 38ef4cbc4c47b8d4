use poise::serenity_prelude as serenity;
use tracing::warn;

use mewdeko_commands::filter::run_filters;
use mewdeko_commands::games::handle_trivia_guess;
use mewdeko_commands::snipes::recorder::{record_deleted, record_edited};
use mewdeko_core::Data;

/// New messages go through the filters first; a filtered message is not
/// treated as a trivia guess.
pub async fn handle_message_create(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) {
    if run_filters(ctx, data, message).await {
        return;
    }

    handle_trivia_guess(data, message).await;
}

/// Where the post-edit message comes from for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditSource {
    Cached,
    RebuiltFromOld,
    Fetch,
    Skip,
}

fn edit_source(
    has_new: bool,
    has_old: bool,
    in_guild: bool,
    bot_author: bool,
) -> EditSource {
    if has_new {
        EditSource::Cached
    } else if has_old {
        EditSource::RebuiltFromOld
    } else if in_guild && !bot_author {
        EditSource::Fetch
    } else {
        EditSource::Skip
    }
}

pub async fn handle_message_update(
    ctx: &serenity::Context,
    data: &Data,
    old: Option<&serenity::Message>,
    new: Option<&serenity::Message>,
    event: &serenity::MessageUpdateEvent,
) {
    // Embed-only updates carry no new content.
    let Some(new_content) = event.content.as_deref() else {
        return;
    };

    let bot_author = event.author.as_ref().is_some_and(|author| author.bot);
    let updated = match edit_source(new.is_some(), old.is_some(), event.guild_id.is_some(), bot_author)
    {
        EditSource::Cached => new.cloned(),
        EditSource::RebuiltFromOld => old.map(|old| {
            let mut rebuilt = old.clone();
            event.apply_to_message(&mut rebuilt);
            rebuilt
        }),
        EditSource::Fetch => match event.channel_id.message(&ctx.http, event.id).await {
            Ok(mut fetched) => {
                // REST messages do not carry the guild id.
                fetched.guild_id = event.guild_id;
                Some(fetched)
            }
            Err(source) => {
                warn!(?source, message_id = %event.id, "failed to fetch edited message");
                None
            }
        },
        EditSource::Skip => None,
    };

    if let Some(updated) = updated.as_ref()
        && run_filters(ctx, data, updated).await
    {
        return;
    }

    record_edited(data, event.guild_id, old, Some(new_content)).await;
}

pub async fn handle_message_delete(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: serenity::ChannelId,
    message_ids: &[serenity::MessageId],
    guild_id: Option<serenity::GuildId>,
) {
    for message_id in message_ids {
        record_deleted(ctx, data, channel_id, *message_id, guild_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSource, edit_source};

    #[test]
    fn uncached_guild_edits_are_fetched_for_filtering() {
        assert_eq!(edit_source(false, false, true, false), EditSource::Fetch);
    }

    #[test]
    fn cached_copies_are_preferred() {
        assert_eq!(edit_source(true, true, true, false), EditSource::Cached);
        assert_eq!(edit_source(false, true, true, false), EditSource::RebuiltFromOld);
    }

    #[test]
    fn bot_and_dm_edits_are_not_fetched() {
        assert_eq!(edit_source(false, false, true, true), EditSource::Skip);
        assert_eq!(edit_source(false, false, false, false), EditSource::Skip);
    }
}
