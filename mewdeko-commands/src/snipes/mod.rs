pub mod recorder;

pub mod editsnipe;
pub mod editsnipelist;
pub mod snipe;
pub mod snipelist;
pub mod snipeset;

use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{fetch_target_profile, guild_only_message};
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::snipes::{is_snipe_enabled, latest_snipe, recent_snipes};
use mewdeko_database::model::snipes::SnipeEntry;
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, sanitize_mentions};
use mewdeko_utils::pagination::paginate_embed_pages;

const DEFAULT_LIST_AMOUNT: usize = 5;
const MAX_LIST_AMOUNT: usize = 25;

fn disabled_message() -> &'static str {
    "Sniping is disabled in this server. An administrator can enable it with `!snipeset on`."
}

fn nothing_message(edited: bool) -> &'static str {
    if edited {
        "There's no edited message to snipe here."
    } else {
        "There's no deleted message to snipe here."
    }
}

/// Enabled-check shared by every snipe command.
async fn snipe_guild(ctx: Context<'_>) -> Result<Option<serenity::GuildId>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(None);
    };

    if !is_snipe_enabled(&ctx.data().db, guild_id.get()).await? {
        ctx.say(disabled_message()).await?;
        return Ok(None);
    }

    Ok(Some(guild_id))
}

/// Show the newest snipe matching the filters.
pub(crate) async fn show_latest(
    ctx: Context<'_>,
    channel: Option<serenity::GuildChannel>,
    user: Option<serenity::User>,
    edited: bool,
) -> Result<(), Error> {
    let Some(guild_id) = snipe_guild(ctx).await? else {
        return Ok(());
    };

    let channel_id = channel.map_or(ctx.channel_id(), |channel| channel.id);
    let entry = latest_snipe(
        &ctx.data().db,
        guild_id.get(),
        channel_id.get(),
        user.map(|user| user.id.get()),
        edited,
    )
    .await?;

    let Some(entry) = entry else {
        ctx.say(nothing_message(edited)).await?;
        return Ok(());
    };

    let profile = fetch_target_profile(ctx.http(), serenity::UserId::new(entry.user_id)).await;
    let mut author = serenity::CreateEmbedAuthor::new(profile.display_name);
    if let Some(url) = profile.avatar_url.as_deref() {
        author = author.icon_url(url);
    }

    let verb = if edited { "Edited" } else { "Deleted" };
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(author)
        .description(sanitize_mentions(&entry.content))
        .footer(serenity::CreateEmbedFooter::new(format!("{verb} message")))
        .timestamp(serenity::Timestamp::from_unix_timestamp(i64::try_from(entry.created_at)?)?);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show the newest snipes in this channel, one per page.
pub(crate) async fn show_list(
    ctx: Context<'_>,
    amount: Option<usize>,
    edited: bool,
) -> Result<(), Error> {
    let Some(guild_id) = snipe_guild(ctx).await? else {
        return Ok(());
    };

    let amount = amount.unwrap_or(DEFAULT_LIST_AMOUNT).clamp(1, MAX_LIST_AMOUNT);
    let entries = recent_snipes(
        &ctx.data().db,
        guild_id.get(),
        ctx.channel_id().get(),
        None,
        edited,
        i64::try_from(amount)?,
    )
    .await?;

    if entries.is_empty() {
        ctx.say(nothing_message(edited)).await?;
        return Ok(());
    }

    let pages = entries.iter().map(snipe_page).collect::<Vec<_>>();
    let title = if edited { "Edit Snipes" } else { "Snipes" };
    paginate_embed_pages(ctx, title, &pages, 1).await?;

    Ok(())
}

fn snipe_page(entry: &SnipeEntry) -> String {
    format!(
        "**Author :** <@{}>\n**When :** <t:{}:R>\n\n{}",
        entry.user_id,
        entry.created_at,
        sanitize_mentions(&entry.content)
    )
}

#[cfg(test)]
mod tests {
    use super::snipe_page;
    use mewdeko_database::model::snipes::SnipeEntry;

    #[test]
    fn page_shows_author_time_and_sanitized_content() {
        let entry = SnipeEntry {
            id: 1,
            guild_id: 2,
            channel_id: 3,
            user_id: 4,
            content: "hi @everyone".to_owned(),
            edited: false,
            created_at: 1_700_000_000,
        };

        assert_eq!(
            snipe_page(&entry),
            "**Author :** <@4>\n**When :** <t:1700000000:R>\n\nhi @\u{200B}everyone"
        );
    }
}
