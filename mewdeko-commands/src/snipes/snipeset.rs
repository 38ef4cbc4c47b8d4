use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::usage_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::snipes::set_snipe_enabled;
use mewdeko_utils::embed::confirm_embed;
use mewdeko_utils::parse::parse_toggle;

pub const META: CommandMeta = CommandMeta {
    name: "snipeset",
    desc: "Turn recording of deleted and edited messages on or off.",
    category: "utility",
    usage: "!snipeset <on|off>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn snipeset(
    ctx: Context<'_>,
    #[description = "on or off"] state: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let Some(enabled) = state.as_deref().and_then(parse_toggle) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    set_snipe_enabled(&ctx.data().db, guild_id.get(), enabled).await?;
    info!(guild_id = %guild_id, enabled, "updated snipe setting");

    let description = if enabled {
        "Deleted and edited messages will now be recorded."
    } else {
        "Deleted and edited messages will no longer be recorded."
    };
    ctx.send(poise::CreateReply::default().embed(confirm_embed(description)))
        .await?;

    Ok(())
}
