use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::punishments::set_warn_expire;
use mewdeko_database::impls::warnings::expire_guild_warnings;
use mewdeko_database::model::punishments::WarnExpireAction;
use mewdeko_utils::embed::confirm_embed;
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnexpire",
    desc: "Forgive or delete warnings after a number of days (0 disables).",
    category: "moderation",
    usage: "!warnexpire <days> [clear|delete]",
};

const MAX_EXPIRE_DAYS: u32 = 366;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warnexpire(
    ctx: Context<'_>,
    #[description = "Days before warnings expire (0 disables)"] days: Option<u32>,
    #[description = "clear (forgive) or delete"] action: Option<String>,
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

    let Some(days) = days else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if days > MAX_EXPIRE_DAYS {
        ctx.say(format!("Warnings can expire after at most {MAX_EXPIRE_DAYS} days."))
            .await?;
        return Ok(());
    }

    let action = match action.as_deref().map(str::trim) {
        None | Some("") => WarnExpireAction::Clear,
        Some(raw) => match WarnExpireAction::parse(&raw.to_ascii_lowercase()) {
            Some(action) => action,
            None => {
                ctx.say(usage_message(META.usage)).await?;
                return Ok(());
            }
        },
    };

    let hours = i32::try_from(days * 24)?;
    let db = &ctx.data().db;
    set_warn_expire(db, guild_id.get(), hours, action).await?;
    let expired = expire_guild_warnings(db, guild_id.get()).await?;

    info!(guild_id = %guild_id, hours, action = action.as_str(), expired, "updated warning expiry");

    let description = if days == 0 {
        "Warnings will no longer expire.".to_owned()
    } else {
        let verb = match action {
            WarnExpireAction::Clear => "forgiven",
            WarnExpireAction::Delete => "deleted",
        };
        format!("Warnings will be {verb} after **{days}** day(s). {expired} warning(s) expired now.")
    };
    ctx.send(poise::CreateReply::default().embed(confirm_embed(description)))
        .await?;

    Ok(())
}
