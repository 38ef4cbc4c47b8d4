use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, sanitize_mentions};
use mewdeko_utils::formatting::truncate_chars;
use mewdeko_utils::time::discord_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "channelinfo",
    desc: "Show information about a channel.",
    category: "utility",
    usage: "!channelinfo [channel]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn channelinfo(
    ctx: Context<'_>,
    #[description = "Channel to inspect (defaults to this one)"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let channel = match channel {
        Some(channel) => channel,
        None => match ctx.channel_id().to_channel(ctx.http()).await?.guild() {
            Some(channel) => channel,
            None => {
                ctx.say(guild_only_message()).await?;
                return Ok(());
            }
        },
    };

    let topic = channel
        .topic
        .as_deref()
        .filter(|topic| !topic.is_empty())
        .map_or_else(|| "-".to_owned(), |topic| truncate_chars(&sanitize_mentions(topic), 1024));
    let slowmode = match channel.rate_limit_per_user.unwrap_or(0) {
        0 => "Off".to_owned(),
        seconds => format!("{seconds}s"),
    };
    let category = channel
        .parent_id
        .map_or_else(|| "-".to_owned(), |parent| format!("<#{}>", parent.get()));

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("#{}", channel.name))
        .field("ID", channel.id.get().to_string(), true)
        .field("Type", channel.kind.name(), true)
        .field("Category", category, true)
        .field("Position", channel.position.to_string(), true)
        .field("NSFW", if channel.nsfw { "Yes" } else { "No" }, true)
        .field("Slowmode", slowmode, true)
        .field(
            "Created",
            discord_timestamp(channel.id.created_at().unix_timestamp(), 'F'),
            true,
        )
        .field("Topic", topic, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
