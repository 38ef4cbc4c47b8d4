use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::filter::set_staff_role;
use mewdeko_utils::embed::confirm_embed;

pub const META: CommandMeta = CommandMeta {
    name: "staffrole",
    desc: "Set the role exempt from message filters. Omit the role to clear it.",
    category: "filter",
    usage: "!staffrole [role]",
};

#[poise::command(prefix_command, slash_command, category = "Filter")]
pub async fn staffrole(
    ctx: Context<'_>,
    #[description = "Role exempt from filters"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::ADMINISTRATOR).await?
    else {
        return Ok(());
    };

    let role_id = role.as_ref().map(|role| role.id.get());
    set_staff_role(&ctx.data().db, guild_id.get(), role_id).await?;

    let description = match role_id {
        Some(id) => format!("Members with <@&{id}> are now exempt from filters."),
        None => "The staff role has been cleared. Only administrators are exempt.".to_owned(),
    };
    ctx.send(poise::CreateReply::default().embed(confirm_embed(description)))
        .await?;

    Ok(())
}
