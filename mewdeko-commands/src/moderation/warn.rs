use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, moderation_action_embed, moderation_bot_target_message,
    moderation_self_action_message, send_moderation_target_dm, target_profile_from_user,
    usage_message,
};
use crate::moderation::punish::{describe_punishment, normalize_reason, warn_user};
use mewdeko_core::{Context, Error};
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Warn a user. Reaching a configured warning count applies a punishment.",
    category: "moderation",
    usage: "!warn <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: Option<serenity::User>,
    #[description = "Reason for warning"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::BAN_MEMBERS,
    )
    .await?
    {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("warn")).await?;
        return Ok(());
    }

    let reason = normalize_reason(reason.as_deref());

    // DM first so the user still hears about it if the punishment removes them.
    let _ = send_moderation_target_dm(ctx.http(), &user, guild_id, "warned", Some(&reason)).await;

    let outcome = warn_user(
        ctx.http(),
        &ctx.data().db,
        guild_id,
        user.id,
        ctx.author().id,
        &ctx.author().name,
        Some(&reason),
    )
    .await?;

    let target_profile = target_profile_from_user(&user);
    let mut embed = moderation_action_embed(&target_profile, user.id, "warned", Some(&reason))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Warning #{}",
            outcome.warn_count
        )));
    if let Some(punishment) = outcome.punishment.as_ref() {
        embed = embed.field("Punishment", describe_punishment(punishment), false);
    }
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
