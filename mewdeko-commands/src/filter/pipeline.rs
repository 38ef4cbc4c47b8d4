//! Message filter run on every new or edited guild message.

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use mewdeko_core::Data;
use mewdeko_database::impls::filter::get_filter_snapshot;
use mewdeko_database::model::filter::FilterSnapshot;
use mewdeko_utils::permissions::is_staff_or_admin;

use crate::filter::matching::{contains_invite, contains_link, find_word};
use crate::moderation::embeds::is_missing_permissions_error;
use crate::moderation::punish::warn_user;
use crate::moderation::send_moderation_target_dm;

pub const AUTOBAN_REASON: &str = "Auto Ban Word Detected";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Invite,
    Word(String),
    Link,
    AutobanWord(String),
}

/// The first filter that fires for `content` in `channel_id`, checked in the
/// order invites, filtered words, links, auto-ban words.
pub fn detect_violation(snapshot: &FilterSnapshot, channel_id: u64, content: &str) -> Option<Violation> {
    if snapshot.invites_active_in(channel_id) && contains_invite(content) {
        return Some(Violation::Invite);
    }

    if snapshot.words_active_in(channel_id)
        && let Some(word) = find_word(content, &snapshot.filtered_words)
    {
        return Some(Violation::Word(word.to_owned()));
    }

    if snapshot.links_active_in(channel_id) && contains_link(content) {
        return Some(Violation::Link);
    }

    find_word(content, &snapshot.autoban_words).map(|word| Violation::AutobanWord(word.to_owned()))
}

/// Run the guild's filters over `message`. Returns `true` when a filter acted
/// on it, in which case no further handlers should treat it as a normal
/// message.
pub async fn run_filters(ctx: &serenity::Context, data: &Data, message: &serenity::Message) -> bool {
    if message.author.bot || message.webhook_id.is_some() {
        return false;
    }

    let Some(guild_id) = message.guild_id else {
        return false;
    };

    let snapshot = match get_filter_snapshot(&data.db, guild_id.get()).await {
        Ok(snapshot) => snapshot,
        Err(source) => {
            error!(?source, "failed to load filter configuration");
            return false;
        }
    };

    if snapshot.is_inert() {
        return false;
    }

    let Some(violation) = detect_violation(&snapshot, message.channel_id.get(), &message.content)
    else {
        return false;
    };

    // Resolved only once something matched; most messages never get here.
    match is_staff_or_admin(&ctx.http, guild_id, message.author.id, snapshot.staff_role_id).await {
        Ok(true) => return false,
        Ok(false) => {}
        Err(source) => warn!(?source, "failed to resolve filter exemption"),
    }

    info!(
        guild_id = %guild_id,
        user_id = %message.author.id,
        ?violation,
        "message filter triggered"
    );

    match violation {
        Violation::Invite => {
            delete_filtered(ctx, data, message).await;
            if snapshot.warn_on_invite {
                warn_author(ctx, data, guild_id, message, "Posted a server invite").await;
            }
        }
        Violation::Word(word) => {
            delete_filtered(ctx, data, message).await;
            if snapshot.warn_on_filtered_word {
                let reason = format!("Used a filtered word: {word}");
                warn_author(ctx, data, guild_id, message, &reason).await;
            }
        }
        Violation::Link => delete_filtered(ctx, data, message).await,
        Violation::AutobanWord(word) => autoban(ctx, data, guild_id, message, &word).await,
    }

    true
}

async fn delete_filtered(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    data.suppressed_deletes.suppress(message.id.get());

    if let Err(source) = message.delete(&ctx.http).await {
        if is_missing_permissions_error(&source) {
            warn!(channel_id = %message.channel_id, "missing permissions to delete filtered message");
        } else {
            error!(?source, "failed to delete filtered message");
        }
    }
}

/// Warn the author with the bot as moderator, DMing them first.
async fn warn_author(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    reason: &str,
) {
    let (bot_id, bot_name) = {
        let current = ctx.cache.current_user();
        (current.id, current.name.clone())
    };

    let _ = send_moderation_target_dm(&ctx.http, &message.author, guild_id, "warned", Some(reason))
        .await;

    if let Err(source) = warn_user(
        &ctx.http,
        &data.db,
        guild_id,
        message.author.id,
        bot_id,
        &bot_name,
        Some(reason),
    )
    .await
    {
        error!(?source, "failed to warn user for filter violation");
    }
}

async fn autoban(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    word: &str,
) {
    delete_filtered(ctx, data, message).await;

    let dm_reason = format!("{AUTOBAN_REASON}: {word}");
    let _ = send_moderation_target_dm(&ctx.http, &message.author, guild_id, "banned", Some(&dm_reason))
        .await;

    match guild_id
        .ban_with_reason(&ctx.http, message.author.id, 0, AUTOBAN_REASON)
        .await
    {
        Ok(()) => info!(guild_id = %guild_id, user_id = %message.author.id, "auto-banned user"),
        Err(source) if is_missing_permissions_error(&source) => {
            warn!(user_id = %message.author.id, "missing permissions to auto-ban user");
        }
        Err(source) => error!(?source, "failed to auto-ban user"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Violation, detect_violation};
    use mewdeko_database::model::filter::FilterSnapshot;

    fn snapshot() -> FilterSnapshot {
        FilterSnapshot {
            filter_invites: true,
            filter_words: true,
            filter_links: true,
            filtered_words: vec!["heck".to_owned()],
            autoban_words: vec!["scam".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn invites_win_over_every_other_filter() {
        let verdict = detect_violation(&snapshot(), 1, "heck https://discord.gg/abc scam");
        assert_eq!(verdict, Some(Violation::Invite));
    }

    #[test]
    fn words_come_before_links_and_autoban() {
        let verdict = detect_violation(&snapshot(), 1, "heck https://example.com scam");
        assert_eq!(verdict, Some(Violation::Word("heck".to_owned())));

        let verdict = detect_violation(&snapshot(), 1, "https://example.com scam");
        assert_eq!(verdict, Some(Violation::Link));

        let verdict = detect_violation(&snapshot(), 1, "free scam here");
        assert_eq!(verdict, Some(Violation::AutobanWord("scam".to_owned())));
    }

    #[test]
    fn disabled_filters_do_not_fire() {
        let mut config = FilterSnapshot {
            filtered_words: vec!["heck".to_owned()],
            ..Default::default()
        };
        assert_eq!(detect_violation(&config, 5, "discord.gg/abc heck http://x.io"), None);

        config.word_channels.insert(5);
        assert_eq!(
            detect_violation(&config, 5, "heck"),
            Some(Violation::Word("heck".to_owned()))
        );
        assert_eq!(detect_violation(&config, 6, "heck"), None);
    }

    #[test]
    fn autoban_words_apply_without_a_toggle() {
        let config = FilterSnapshot {
            autoban_words: vec!["scam".to_owned()],
            ..Default::default()
        };
        assert_eq!(
            detect_violation(&config, 1, "SCAM"),
            Some(Violation::AutobanWord("scam".to_owned()))
        );
    }

    #[test]
    fn autoban_phrases_match_inside_longer_text() {
        let config = FilterSnapshot {
            autoban_words: vec!["free nitro".to_owned()],
            ..Default::default()
        };
        assert_eq!(
            detect_violation(&config, 1, "Get FREE NITRO at my link"),
            Some(Violation::AutobanWord("free nitro".to_owned()))
        );
    }
}
