use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::usage_message;
use crate::moderation::punish::describe_punishment;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::punishments::{
    LadderRejection, list_punishments, remove_punishment, set_punishment, validate_punishment,
};
use mewdeko_database::model::punishments::{PunishmentAction, WarnPunishment};
use mewdeko_utils::embed::{confirm_embed, error_embed, titled_embed};
use mewdeko_utils::parse::parse_duration_seconds;

pub const META: CommandMeta = CommandMeta {
    name: "warnpunish",
    desc: "Configure the punishment applied at a given warning count.",
    category: "moderation",
    usage: "!warnpunish <set|remove|list>",
};

const SET_USAGE: &str = "!warnpunish set <count> <action> [time] [role]";
const REMOVE_USAGE: &str = "!warnpunish remove <count>";

async fn can_configure(ctx: Context<'_>) -> Result<Option<serenity::GuildId>, Error> {
    guild_with_permission(ctx, serenity::Permissions::BAN_MEMBERS).await
}

/// Show the punishment ladder.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    subcommands("set", "remove", "list")
)]
pub async fn warnpunish(ctx: Context<'_>) -> Result<(), Error> {
    show_ladder(ctx).await
}

/// Set the punishment for a warning count.
#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Warning count that triggers the punishment"] count: Option<i32>,
    #[description = "mute, chatmute, voicemute, kick, ban, softban, removeroles or addrole"]
    action: Option<String>,
    #[description = "Duration (e.g. 1h, 7d); 0 or omitted for permanent"] time: Option<String>,
    #[description = "Role for addrole"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let Some(guild_id) = can_configure(ctx).await? else {
        return Ok(());
    };

    let (Some(count), Some(raw_action)) = (count, action.as_deref()) else {
        ctx.say(usage_message(SET_USAGE)).await?;
        return Ok(());
    };

    let Some(action) = PunishmentAction::parse(raw_action) else {
        let valid = PunishmentAction::ALL
            .iter()
            .map(|action| action.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ctx.say(format!("Unknown action `{raw_action}`. Valid actions: {valid}"))
            .await?;
        return Ok(());
    };

    let time_minutes = match time.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) if raw == "0" || raw.eq_ignore_ascii_case("permanent") => None,
        Some(raw) => {
            let Some(seconds) = parse_duration_seconds(raw) else {
                ctx.say(format!(
                    "Invalid duration. Usage: `{SET_USAGE}` (examples: 30m, 2h, 7d)"
                ))
                .await?;
                return Ok(());
            };
            Some(i64::try_from(seconds.div_ceil(60))?)
        }
        None => None,
    };

    let role_id = role.as_ref().map(|role| role.id.get());

    if let Err(rejection) = validate_punishment(count, action, time_minutes, role_id) {
        let embed = error_embed(rejection_message(rejection, action));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let punishment = WarnPunishment {
        warn_count: count,
        action,
        time_minutes: i32::try_from(time_minutes.unwrap_or(0))?,
        role_id,
    };
    set_punishment(&ctx.data().db, guild_id.get(), &punishment).await?;

    let embed = confirm_embed(format!(
        "Reaching **{}** warning(s) will now apply **{}**.",
        count,
        describe_punishment(&punishment)
    ));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Remove the punishment for a warning count.
#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Warning count to clear"] count: Option<i32>,
) -> Result<(), Error> {
    let Some(guild_id) = can_configure(ctx).await? else {
        return Ok(());
    };

    let Some(count) = count else {
        ctx.say(usage_message(REMOVE_USAGE)).await?;
        return Ok(());
    };

    let embed = if remove_punishment(&ctx.data().db, guild_id.get(), count).await? {
        confirm_embed(format!("Removed the punishment at **{count}** warning(s)."))
    } else {
        error_embed(format!("No punishment is set at **{count}** warning(s)."))
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// List the punishment ladder.
#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    show_ladder(ctx).await
}

async fn show_ladder(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = can_configure(ctx).await? else {
        return Ok(());
    };

    let ladder = list_punishments(&ctx.data().db, guild_id.get()).await?;
    let description = if ladder.is_empty() {
        "No punishments are configured.".to_owned()
    } else {
        ladder
            .iter()
            .map(|entry| format!("**{}** -> {}", entry.warn_count, describe_punishment(entry)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let embed = titled_embed("Warn Punishments", description).footer(
        serenity::CreateEmbedFooter::new("Subcommands: set, remove, list"),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn rejection_message(rejection: LadderRejection, action: PunishmentAction) -> String {
    match rejection {
        LadderRejection::NonPositiveCount => "Warning count must be at least 1.".to_owned(),
        LadderRejection::DurationTooLong => "Punishments can last at most 49 days.".to_owned(),
        LadderRejection::DurationNotAllowed => {
            format!("**{action}** is instantaneous and can't take a duration.")
        }
        LadderRejection::MissingRole => "The addrole punishment needs a role.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::rejection_message;
    use mewdeko_database::impls::punishments::LadderRejection;
    use mewdeko_database::model::punishments::PunishmentAction;

    #[test]
    fn rejection_names_the_offending_action() {
        assert_eq!(
            rejection_message(LadderRejection::DurationNotAllowed, PunishmentAction::Softban),
            "**Softban** is instantaneous and can't take a duration."
        );
    }
}
