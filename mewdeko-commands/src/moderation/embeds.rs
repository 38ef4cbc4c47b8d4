use poise::serenity_prelude as serenity;

use mewdeko_core::Context;
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, sanitize_mentions};

#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

pub fn target_profile_from_user(user: &serenity::User) -> TargetProfile {
    TargetProfile {
        display_name: user
            .global_name
            .clone()
            .unwrap_or_else(|| user.name.clone()),
        avatar_url: Some(user.face()),
    }
}

pub async fn fetch_target_profile(
    http: &serenity::Http,
    user_id: serenity::UserId,
) -> TargetProfile {
    match http.get_user(user_id).await {
        Ok(user) => target_profile_from_user(&user),
        Err(_) => TargetProfile {
            display_name: format!("User {}", user_id.get()),
            avatar_url: None,
        },
    }
}

/// Public confirmation for a moderation action, headed by the target's name
/// and avatar.
pub fn moderation_action_embed(
    target_profile: &TargetProfile,
    target_user_id: serenity::UserId,
    action_past_tense: &str,
    reason: Option<&str>,
) -> serenity::CreateEmbed {
    let reason = sanitize_mentions(reason.unwrap_or("-"));
    let heading = format!(
        "{} has been {}",
        target_profile.display_name, action_past_tense
    );

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(format!(
            "**Target :** <@{}>\n**Reason :** {}",
            target_user_id.get(),
            reason
        ));

    match target_profile.avatar_url.as_deref() {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(heading).icon_url(url)),
        None => embed.title(heading),
    }
}

pub fn moderation_target_dm_embed(
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
) -> serenity::CreateEmbed {
    let description = match reason {
        Some(reason) => format!("**Reason :** {}", sanitize_mentions(reason)),
        None => "No additional details were provided.".to_owned(),
    };

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!(
            "You have been {} in {}",
            action_past_tense, guild_name
        ))
        .description(description)
}

/// DM the target of an action. Callers usually ignore the result: users with
/// closed DMs are common.
pub async fn send_moderation_target_dm(
    http: &serenity::Http,
    target_user: &serenity::User,
    guild_id: serenity::GuildId,
    action_past_tense: &str,
    reason: Option<&str>,
) -> Result<(), serenity::Error> {
    let guild_name = match guild_id.to_partial_guild(http).await {
        Ok(guild) => guild.name,
        Err(_) => format!("Server {}", guild_id.get()),
    };

    let dm_channel = target_user.create_dm_channel(http).await?;
    dm_channel
        .send_message(
            http,
            serenity::CreateMessage::new().embed(moderation_target_dm_embed(
                &guild_name,
                action_past_tense,
                reason,
            )),
        )
        .await?;

    Ok(())
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

pub fn moderation_bot_target_message() -> &'static str {
    "You can't use moderation actions on bots or application accounts."
}

pub fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

/// Id of the message that invoked a prefix command. Slash commands have none.
pub fn invoking_message_id(ctx: Context<'_>) -> Option<serenity::MessageId> {
    match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg.id),
        poise::Context::Application(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{moderation_self_action_message, usage_message};

    #[test]
    fn messages_quote_their_input() {
        assert_eq!(usage_message("!warn <user>"), "Usage: `!warn <user>`");
        assert_eq!(moderation_self_action_message("warn"), "You can't warn yourself.");
    }
}
