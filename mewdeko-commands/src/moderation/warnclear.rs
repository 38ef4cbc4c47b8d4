use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::warnings::{forgive_all, forgive_nth};
use mewdeko_utils::confirmation::confirm_action;
use mewdeko_utils::embed::{confirm_embed, error_embed};
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnclear",
    desc: "Forgive one of a user's warnings by its warnlog index, or all with 0.",
    category: "moderation",
    usage: "!warnclear <user> [index]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warnclear(
    ctx: Context<'_>,
    #[description = "The user whose warnings to forgive"] user: Option<serenity::User>,
    #[description = "Warnlog index (0 forgives all)"] index: Option<usize>,
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

    let forgiven_by = ctx.author().name.clone();
    let db = &ctx.data().db;

    match index.unwrap_or(0) {
        0 => {
            let prompt = confirm_embed(format!(
                "Forgive **all** active warnings of <@{}>?",
                user.id.get()
            ));
            if !confirm_action(ctx, prompt).await? {
                ctx.say("Cancelled.").await?;
                return Ok(());
            }

            let forgiven = forgive_all(db, guild_id.get(), user.id.get(), &forgiven_by).await?;
            ctx.send(poise::CreateReply::default().embed(confirm_embed(format!(
                "Forgave {} warning(s) of <@{}>.",
                forgiven,
                user.id.get()
            ))))
            .await?;
        }
        position => {
            let forgiven =
                forgive_nth(db, guild_id.get(), user.id.get(), position - 1, &forgiven_by).await?;

            let embed = if forgiven {
                confirm_embed(format!(
                    "Warning #{} of <@{}> has been forgiven.",
                    position,
                    user.id.get()
                ))
            } else {
                error_embed(format!(
                    "<@{}> has no active warning #{}.",
                    user.id.get(),
                    position
                ))
            };
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}
