use mewdeko_core::{Context, Error};
use mewdeko_utils::purge::PurgeFilter;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use crate::moderation::purge::run_purge;

pub const META: CommandMeta = CommandMeta {
    name: "purgecontains",
    desc: "Delete recent messages containing some text.",
    category: "moderation",
    usage: "!purgecontains <amount> <text>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn purgecontains(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge"] amount: Option<usize>,
    #[description = "Text the messages contain"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let Some(text) = text.map(|text| text.trim().to_owned()).filter(|text| !text.is_empty())
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    run_purge(ctx, amount, PurgeFilter::Contains(text), META.usage).await
}
