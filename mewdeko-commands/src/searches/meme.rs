use crate::CommandMeta;
use crate::searches::post_reddit_image;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "meme",
    desc: "Post a random meme.",
    category: "searches",
    usage: "!meme",
};

#[poise::command(prefix_command, slash_command, category = "Searches")]
pub async fn meme(ctx: Context<'_>) -> Result<(), Error> {
    post_reddit_image(ctx, None).await
}
