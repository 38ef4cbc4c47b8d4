pub mod meme;
pub mod randomreddit;

use poise::serenity_prelude as serenity;
use tracing::warn;

use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_services::RedditPost;
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, error_embed, sanitize_mentions};
use mewdeko_utils::formatting::truncate_chars;

/// Post a random image from `subreddit` (or the API's meme feed), skipping
/// images this guild has already seen.
pub(crate) async fn post_reddit_image(ctx: Context<'_>, subreddit: Option<&str>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    ctx.defer().await?;

    let allow_nsfw = ctx
        .guild_channel()
        .await
        .is_some_and(|channel| channel.nsfw);

    let embed = match ctx
        .data()
        .reddit
        .fresh_post(guild_id.get(), subreddit, allow_nsfw)
        .await
    {
        Ok(Some(post)) => post_embed(&post),
        Ok(None) => error_embed("Couldn't find a post to show. Try again."),
        Err(source) => {
            warn!(?source, subreddit, "reddit lookup failed");
            error_embed("The reddit API didn't respond. Try again later.")
        }
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn post_embed(post: &RedditPost) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(serenity::CreateEmbedAuthor::new(format!("u/{}", post.author)))
        .title(truncate_chars(&sanitize_mentions(&post.title), 256))
        .url(post.post_link.clone())
        .image(post.url.clone())
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} upvote(s) | r/{}",
            post.ups, post.subreddit
        )))
}
