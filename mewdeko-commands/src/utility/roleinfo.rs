use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::DEFAULT_EMBED_COLOR;
use mewdeko_utils::formatting::truncate_chars;
use mewdeko_utils::permissions::permission_names;
use mewdeko_utils::time::discord_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "roleinfo",
    desc: "Show information about a role.",
    category: "utility",
    usage: "!roleinfo <role>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn roleinfo(
    ctx: Context<'_>,
    #[description = "Role to inspect"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    let Some(role) = role else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let names = permission_names(role.permissions);
    let permissions = if names.is_empty() {
        "None".to_owned()
    } else {
        truncate_chars(&names.join(", "), 1024)
    };

    let color = if role.colour.0 == 0 {
        DEFAULT_EMBED_COLOR
    } else {
        role.colour.0
    };

    let embed = serenity::CreateEmbed::new()
        .color(color)
        .title(role.name.clone())
        .field("ID", role.id.get().to_string(), true)
        .field("Color", format!("#{}", role.colour.hex()), true)
        .field("Position", role.position.to_string(), true)
        .field("Hoisted", yes_no(role.hoist), true)
        .field("Mentionable", yes_no(role.mentionable), true)
        .field("Managed", yes_no(role.managed), true)
        .field(
            "Created",
            discord_timestamp(role.id.created_at().unix_timestamp(), 'F'),
            true,
        )
        .field("Permissions", permissions, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
