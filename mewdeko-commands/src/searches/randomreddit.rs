use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use crate::searches::post_reddit_image;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "randomreddit",
    desc: "Post a random image from a subreddit.",
    category: "searches",
    usage: "!randomreddit <subreddit>",
};

#[poise::command(prefix_command, slash_command, category = "Searches", aliases("rr"))]
pub async fn randomreddit(
    ctx: Context<'_>,
    #[description = "Subreddit name, with or without r/"] subreddit: Option<String>,
) -> Result<(), Error> {
    let Some(subreddit) = subreddit.as_deref().and_then(subreddit_name) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    post_reddit_image(ctx, Some(subreddit)).await
}

/// The bare subreddit name, or `None` when it can't be one.
fn subreddit_name(raw: &str) -> Option<&str> {
    let name = raw.trim();
    let name = name
        .strip_prefix("/r/")
        .or_else(|| name.strip_prefix("r/"))
        .unwrap_or(name);

    let valid = (2..=21).contains(&name.len())
        && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    valid.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::subreddit_name;

    #[test]
    fn accepts_plain_and_prefixed_names() {
        assert_eq!(subreddit_name("aww"), Some("aww"));
        assert_eq!(subreddit_name(" r/Rust_Lang "), Some("Rust_Lang"));
        assert_eq!(subreddit_name("/r/cats"), Some("cats"));
    }

    #[test]
    fn rejects_impossible_names() {
        assert_eq!(subreddit_name("a"), None);
        assert_eq!(subreddit_name("../admin"), None);
        assert_eq!(subreddit_name("this_name_is_far_too_long"), None);
    }
}
