use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::DEFAULT_EMBED_COLOR;
use mewdeko_utils::formatting::truncate_chars;
use mewdeko_utils::time::discord_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "serverinfo",
    desc: "Show information about this server.",
    category: "utility",
    usage: "!serverinfo",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild_with_counts(ctx.http()).await?;
    let channels = guild_id.channels(ctx.http()).await?;

    let text_channels = channels
        .values()
        .filter(|channel| channel.kind == serenity::ChannelType::Text)
        .count();
    let voice_channels = channels
        .values()
        .filter(|channel| channel.kind == serenity::ChannelType::Voice)
        .count();

    let members = guild
        .approximate_member_count
        .map_or_else(|| "Unknown".to_owned(), |count| count.to_string());
    let boosts = format!(
        "{} (tier {})",
        guild.premium_subscription_count.unwrap_or(0),
        u8::from(guild.premium_tier)
    );

    let mut embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(guild.name.clone())
        .field("ID", guild.id.get().to_string(), true)
        .field("Owner", format!("<@{}>", guild.owner_id.get()), true)
        .field("Members", members, true)
        .field("Text Channels", text_channels.to_string(), true)
        .field("Voice Channels", voice_channels.to_string(), true)
        .field("Roles", guild.roles.len().to_string(), true)
        .field("Emojis", guild.emojis.len().to_string(), true)
        .field("Boosts", boosts, true)
        .field(
            "Created",
            discord_timestamp(guild_id.created_at().unix_timestamp(), 'F'),
            true,
        );

    if !guild.features.is_empty() {
        embed = embed.field(
            "Features",
            truncate_chars(&guild.features.join(", "), 1024),
            false,
        );
    }

    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
