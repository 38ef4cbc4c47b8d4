use mewdeko_core::{Context, Error};
use mewdeko_utils::purge::PurgeFilter;

use crate::CommandMeta;
use crate::moderation::purge::run_purge;

pub const META: CommandMeta = CommandMeta {
    name: "purgebots",
    desc: "Delete recent messages sent by bots in this channel.",
    category: "moderation",
    usage: "!purgebots <amount>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn purgebots(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge"] amount: Option<usize>,
) -> Result<(), Error> {
    run_purge(ctx, amount, PurgeFilter::Bots, META.usage).await
}
