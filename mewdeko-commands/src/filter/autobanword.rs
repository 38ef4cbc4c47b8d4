use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::usage_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::filter::{
    add_autoban_word, list_autoban_words, normalize_word, remove_autoban_word,
};
use mewdeko_utils::embed::{confirm_embed, error_embed, sanitize_mentions};
use mewdeko_utils::pagination::{chunk_lines, paginate_embed_pages};

pub const META: CommandMeta = CommandMeta {
    name: "autobanword",
    desc: "Ban anyone who sends one of these words.",
    category: "filter",
    usage: "!autobanword <add|remove|list>",
};

const WORDS_PER_PAGE: usize = 10;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Filter",
    subcommands("add", "remove", "list")
)]
pub async fn autobanword(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(META.usage)).await?;
    Ok(())
}

/// Add an auto-ban word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Word that bans its sender"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let Some(word) = word.map(|word| normalize_word(&word)).filter(|word| !word.is_empty()) else {
        ctx.say(usage_message("!autobanword add <word>")).await?;
        return Ok(());
    };

    let embed = if add_autoban_word(&ctx.data().db, guild_id.get(), &word).await? {
        confirm_embed(format!(
            "Users sending `{}` will now be banned.",
            sanitize_mentions(&word)
        ))
    } else {
        error_embed(format!("`{}` is already an auto-ban word.", sanitize_mentions(&word)))
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Remove an auto-ban word.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Word to remove"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let Some(word) = word.map(|word| normalize_word(&word)).filter(|word| !word.is_empty()) else {
        ctx.say(usage_message("!autobanword remove <word>")).await?;
        return Ok(());
    };

    let embed = if remove_autoban_word(&ctx.data().db, guild_id.get(), &word).await? {
        confirm_embed(format!("Removed `{}` from the auto-ban words.", sanitize_mentions(&word)))
    } else {
        error_embed(format!("`{}` is not an auto-ban word.", sanitize_mentions(&word)))
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// List the auto-ban words.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Page to open"] page: Option<usize>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let words = list_autoban_words(&ctx.data().db, guild_id.get()).await?;
    if words.is_empty() {
        ctx.say("No auto-ban words are set.").await?;
        return Ok(());
    }

    let lines = words
        .iter()
        .enumerate()
        .map(|(index, word)| format!("`{}.` {}", index + 1, sanitize_mentions(word)))
        .collect::<Vec<_>>();
    let pages = chunk_lines(&lines, WORDS_PER_PAGE);
    paginate_embed_pages(ctx, "Auto-Ban Words", &pages, page.unwrap_or(1)).await?;

    Ok(())
}
