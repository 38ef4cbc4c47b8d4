use crate::CommandMeta;
use crate::snipes::show_list;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "editsnipelist",
    desc: "List recently edited messages in this channel.",
    category: "utility",
    usage: "!editsnipelist [amount]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn editsnipelist(
    ctx: Context<'_>,
    #[description = "How many to show (default 5)"] amount: Option<usize>,
) -> Result<(), Error> {
    show_list(ctx, amount, true).await
}
