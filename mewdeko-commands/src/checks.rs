use poise::serenity_prelude as serenity;

use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_utils::permissions::has_user_permission;

/// The invoking guild when the author holds `required`. Outside a guild the
/// author is told so; a missing permission stays silent.
pub async fn guild_with_permission(
    ctx: Context<'_>,
    required: serenity::Permissions,
) -> Result<Option<serenity::GuildId>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(None);
    };

    let allowed = has_user_permission(ctx.http(), guild_id, ctx.author().id, required).await?;

    Ok(allowed.then_some(guild_id))
}
