use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::filter::toggle_reply;
use crate::moderation::embeds::usage_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::filter::{
    add_filtered_word, clear_filtered_words, list_filtered_words, normalize_word,
    remove_filtered_word, toggle_channel_filter, toggle_filter_warn, toggle_server_filter,
};
use mewdeko_database::model::filter::FilterKind;
use mewdeko_utils::confirmation::confirm_action;
use mewdeko_utils::embed::{confirm_embed, error_embed, sanitize_mentions};
use mewdeko_utils::pagination::{chunk_lines, paginate_embed_pages};

pub const META: CommandMeta = CommandMeta {
    name: "filterwords",
    desc: "Delete messages containing configured words, server-wide or per channel.",
    category: "filter",
    usage: "!filterwords <server|channel|add|remove|list|clear|warn>",
};

const WORDS_PER_PAGE: usize = 20;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Filter",
    subcommands("server", "channel", "add", "remove", "list", "clear", "warn")
)]
pub async fn filterwords(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(META.usage)).await?;
    Ok(())
}

/// Toggle the word filter for the whole server.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn server(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let enabled = toggle_server_filter(&ctx.data().db, guild_id.get(), FilterKind::Words).await?;
    toggle_reply(ctx, "Word filtering", "this server", enabled).await
}

/// Toggle the word filter for this channel.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn channel(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let channel_id = ctx.channel_id();
    let enabled = toggle_channel_filter(
        &ctx.data().db,
        guild_id.get(),
        channel_id.get(),
        FilterKind::Words,
    )
    .await?;
    toggle_reply(ctx, "Word filtering", &format!("<#{}>", channel_id.get()), enabled).await
}

/// Add a filtered word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Word to filter"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let Some(word) = word.map(|word| normalize_word(&word)).filter(|word| !word.is_empty()) else {
        ctx.say(usage_message("!filterwords add <word>")).await?;
        return Ok(());
    };

    let embed = if add_filtered_word(&ctx.data().db, guild_id.get(), &word).await? {
        confirm_embed(format!("Added `{}` to the filtered words.", sanitize_mentions(&word)))
    } else {
        error_embed(format!("`{}` is already filtered.", sanitize_mentions(&word)))
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Remove a filtered word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Word to stop filtering"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let Some(word) = word.map(|word| normalize_word(&word)).filter(|word| !word.is_empty()) else {
        ctx.say(usage_message("!filterwords remove <word>")).await?;
        return Ok(());
    };

    let embed = if remove_filtered_word(&ctx.data().db, guild_id.get(), &word).await? {
        confirm_embed(format!("Removed `{}` from the filtered words.", sanitize_mentions(&word)))
    } else {
        error_embed(format!("`{}` is not filtered.", sanitize_mentions(&word)))
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// List the filtered words.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Page to open"] page: Option<usize>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let words = list_filtered_words(&ctx.data().db, guild_id.get()).await?;
    if words.is_empty() {
        ctx.say("No words are filtered in this server.").await?;
        return Ok(());
    }

    let lines = words
        .iter()
        .map(|word| format!("`{}`", sanitize_mentions(word)))
        .collect::<Vec<_>>();
    let pages = chunk_lines(&lines, WORDS_PER_PAGE);
    paginate_embed_pages(ctx, "Filtered Words", &pages, page.unwrap_or(1)).await?;

    Ok(())
}

/// Remove every filtered word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn clear(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let prompt = confirm_embed("Remove **every** filtered word in this server?");
    if !confirm_action(ctx, prompt).await? {
        ctx.say("Cancelled.").await?;
        return Ok(());
    }

    let removed = clear_filtered_words(&ctx.data().db, guild_id.get()).await?;
    ctx.send(poise::CreateReply::default().embed(confirm_embed(format!(
        "Removed {removed} filtered word(s)."
    ))))
    .await?;

    Ok(())
}

/// Toggle warning users who send a filtered word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn warn(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let enabled = toggle_filter_warn(&ctx.data().db, guild_id.get(), FilterKind::Words).await?;
    toggle_reply(ctx, "Warning on filtered words", "this server", enabled).await
}
