use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::filter::toggle_reply;
use crate::moderation::embeds::usage_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::filter::{toggle_channel_filter, toggle_server_filter};
use mewdeko_database::model::filter::FilterKind;

pub const META: CommandMeta = CommandMeta {
    name: "filterlinks",
    desc: "Delete messages containing links, server-wide or per channel.",
    category: "filter",
    usage: "!filterlinks <server|channel>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Filter",
    subcommands("server", "channel")
)]
pub async fn filterlinks(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(META.usage)).await?;
    Ok(())
}

/// Toggle the link filter for the whole server.
#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn server(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let enabled = toggle_server_filter(&ctx.data().db, guild_id.get(), FilterKind::Links).await?;
    toggle_reply(ctx, "Link filtering", "this server", enabled).await
}

/// Toggle the link filter for this channel.
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
        FilterKind::Links,
    )
    .await?;
    toggle_reply(ctx, "Link filtering", &format!("<#{}>", channel_id.get()), enabled).await
}
