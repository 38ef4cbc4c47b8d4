use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::snipes::show_latest;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "editsnipe",
    desc: "Show the previous content of the last edited message in a channel.",
    category: "utility",
    usage: "!editsnipe [channel] [user]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn editsnipe(
    ctx: Context<'_>,
    #[description = "Channel to snipe (defaults to this one)"] channel: Option<serenity::GuildChannel>,
    #[description = "Only messages from this user"] user: Option<serenity::User>,
) -> Result<(), Error> {
    show_latest(ctx, channel, user, true).await
}
