use crate::CommandMeta;
use crate::snipes::show_list;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "snipelist",
    desc: "List recently deleted messages in this channel.",
    category: "utility",
    usage: "!snipelist [amount]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn snipelist(
    ctx: Context<'_>,
    #[description = "How many to show (default 5)"] amount: Option<usize>,
) -> Result<(), Error> {
    show_list(ctx, amount, false).await
}
