use poise::serenity_prelude as serenity;

use crate::utility::help::categories;
use crate::{COMMANDS, CommandMeta};
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::titled_embed;
use mewdeko_utils::formatting::display_category;

pub const META: CommandMeta = CommandMeta {
    name: "modules",
    desc: "List the command modules.",
    category: "utility",
    usage: "!modules",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn modules(ctx: Context<'_>) -> Result<(), Error> {
    let description = categories()
        .into_iter()
        .map(|category| {
            let count = COMMANDS.iter().filter(|c| c.category == category).count();
            format!("**{}** ({count} commands)", display_category(category))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let embed = titled_embed("Modules", description).footer(serenity::CreateEmbedFooter::new(
        "Use !help <module> to see a module's commands.",
    ));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
