use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::punishments::set_warnlog_channel;
use mewdeko_utils::embed::confirm_embed;
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnlogchannel",
    desc: "Set the channel every warning is posted to. Omit the channel to disable.",
    category: "moderation",
    usage: "!warnlogchannel [channel]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warnlogchannel(
    ctx: Context<'_>,
    #[description = "Channel for warning logs"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::ADMINISTRATOR,
    )
    .await?
    {
        return Ok(());
    }

    if let Some(channel) = channel.as_ref()
        && channel.guild_id != guild_id
    {
        ctx.say("That channel is not in this server.").await?;
        return Ok(());
    }

    let channel_id = channel.as_ref().map(|channel| channel.id.get());
    set_warnlog_channel(&ctx.data().db, guild_id.get(), channel_id).await?;

    let description = match channel_id {
        Some(id) => format!("Warnings will be logged in <#{id}>."),
        None => "Warning logging has been disabled.".to_owned(),
    };
    ctx.send(poise::CreateReply::default().embed(confirm_embed(description)))
        .await?;

    Ok(())
}
