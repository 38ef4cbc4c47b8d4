//! Warning escalation: record a warning, look up the guild's ladder, and
//! apply the punishment configured for the new warning count.

use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::time::sleep;
use tracing::{error, info, warn};

use mewdeko_database::Database;
use mewdeko_database::impls::punishments::{get_warn_config, list_punishments, punishment_for_count};
use mewdeko_database::impls::timers::schedule_timer;
use mewdeko_database::impls::warnings::record_warning;
use mewdeko_database::model::punishments::{PunishmentAction, TimerKind, WarnPunishment};
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, sanitize_mentions};
use mewdeko_utils::formatting::format_minutes;
use mewdeko_utils::time::now_unix_secs;

use crate::moderation::embeds::is_missing_permissions_error;

/// Discord refuses communication timeouts longer than 28 days.
pub const MAX_TIMEOUT_SECS: u64 = 28 * 24 * 60 * 60;
/// Days of message history a softban removes.
const SOFTBAN_DELETE_DAYS: u8 = 7;

#[derive(Clone, Debug)]
pub struct WarnOutcome {
    pub warn_count: i64,
    /// The ladder entry that was applied, if any.
    pub punishment: Option<WarnPunishment>,
}

/// Empty reasons are stored as `-`.
pub fn normalize_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim).filter(|value| !value.is_empty()) {
        Some(reason) => reason.to_owned(),
        None => "-".to_owned(),
    }
}

/// Length of a mute timeout. Zero means the longest timeout Discord allows.
pub fn timeout_seconds(time_minutes: i32) -> u64 {
    if time_minutes <= 0 {
        return MAX_TIMEOUT_SECS;
    }

    (u64::from(time_minutes.unsigned_abs()) * 60).min(MAX_TIMEOUT_SECS)
}

/// When a timed punishment should be reversed, or `None` when it is permanent.
pub fn reversal_at(now: u64, time_minutes: i32) -> Option<u64> {
    (time_minutes > 0).then(|| now + u64::from(time_minutes.unsigned_abs()) * 60)
}

pub fn describe_punishment(punishment: &WarnPunishment) -> String {
    let mut label = punishment.action.to_string();

    if let Some(role_id) = punishment.role_id
        && punishment.action == PunishmentAction::AddRole
    {
        label.push_str(&format!(" <@&{role_id}>"));
    }

    if punishment.action.accepts_duration() {
        label.push_str(&format!(" ({})", format_minutes(punishment.time_minutes)));
    }

    label
}

/// Record a warning and apply the ladder entry matching the new count.
pub async fn warn_user(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    target_user_id: serenity::UserId,
    moderator_id: serenity::UserId,
    moderator_name: &str,
    reason: Option<&str>,
) -> anyhow::Result<WarnOutcome> {
    let reason = normalize_reason(reason);

    let record = record_warning(
        db,
        guild_id.get(),
        target_user_id.get(),
        moderator_id.get(),
        moderator_name,
        &reason,
    )
    .await?;

    let ladder = list_punishments(db, guild_id.get()).await?;
    let mut applied = None;

    if let Some(punishment) = punishment_for_count(&ladder, record.warn_count) {
        let audit_reason = format!("Warned {} time(s): {}", record.warn_count, reason);
        if apply_punishment(http, db, guild_id, target_user_id, punishment, &audit_reason).await? {
            applied = Some(punishment.clone());
        }
    }

    let outcome = WarnOutcome {
        warn_count: record.warn_count,
        punishment: applied,
    };

    if let Err(source) =
        post_to_warnlog(http, db, guild_id, target_user_id, moderator_name, &reason, &outcome).await
    {
        if is_missing_permissions_error(&source) {
            warn!(guild_id = %guild_id, "missing permissions to post in warnlog channel");
        } else {
            error!(?source, "failed to post warning to warnlog channel");
        }
    }

    Ok(outcome)
}

async fn post_to_warnlog(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    target_user_id: serenity::UserId,
    moderator_name: &str,
    reason: &str,
    outcome: &WarnOutcome,
) -> Result<(), serenity::Error> {
    let channel_id = match get_warn_config(db, guild_id.get()).await {
        Ok(config) => config.warnlog_channel_id,
        Err(source) => {
            error!(?source, "failed to read warnlog channel");
            return Ok(());
        }
    };

    let Some(channel_id) = channel_id else {
        return Ok(());
    };

    let mut description = format!(
        "**User :** <@{}>\n**Moderator :** {}\n**Reason :** {}\n**Warnings :** {}",
        target_user_id.get(),
        sanitize_mentions(moderator_name),
        sanitize_mentions(reason),
        outcome.warn_count,
    );
    if let Some(punishment) = outcome.punishment.as_ref() {
        description.push_str(&format!("\n**Punishment :** {}", describe_punishment(punishment)));
    }

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("Warning #{}", outcome.warn_count))
        .description(description)
        .timestamp(serenity::Timestamp::now());

    serenity::ChannelId::new(channel_id)
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await?;

    Ok(())
}

/// Apply one ladder entry to a member. Returns `false` when nothing was
/// applied, either because the user is no longer a member or Discord refused.
pub async fn apply_punishment(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    punishment: &WarnPunishment,
    reason: &str,
) -> anyhow::Result<bool> {
    let member = match guild_id.member(http, user_id).await {
        Ok(member) => member,
        Err(source) => {
            info!(?source, user_id = %user_id, guild_id = %guild_id, "warned user is not a member, skipping punishment");
            return Ok(false);
        }
    };

    let now = now_unix_secs();
    let minutes = punishment.time_minutes;

    let result = match punishment.action {
        PunishmentAction::Mute | PunishmentAction::ChatMute => {
            let until_unix = now + timeout_seconds(minutes);
            let until = serenity::Timestamp::from_unix_timestamp(i64::try_from(until_unix)?)?;
            guild_id
                .edit_member(
                    http,
                    user_id,
                    serenity::EditMember::new()
                        .disable_communication_until_datetime(until)
                        .audit_log_reason(reason),
                )
                .await
                .map(|_| ())
        }
        PunishmentAction::VoiceMute => {
            let result = guild_id
                .edit_member(
                    http,
                    user_id,
                    serenity::EditMember::new().mute(true).audit_log_reason(reason),
                )
                .await
                .map(|_| ());
            if result.is_ok()
                && let Some(expires_at) = reversal_at(now, minutes)
            {
                schedule_timer(db, guild_id.get(), user_id.get(), TimerKind::VoiceUnmute, None, expires_at)
                    .await?;
            }
            result
        }
        PunishmentAction::Kick => guild_id.kick_with_reason(http, user_id, reason).await,
        PunishmentAction::Ban => {
            let result = guild_id.ban_with_reason(http, user_id, 0, reason).await;
            if result.is_ok()
                && let Some(expires_at) = reversal_at(now, minutes)
            {
                schedule_timer(db, guild_id.get(), user_id.get(), TimerKind::Unban, None, expires_at)
                    .await?;
            }
            result
        }
        PunishmentAction::Softban => softban(http, guild_id, user_id, reason).await,
        PunishmentAction::RemoveRoles => {
            for role_id in &member.roles {
                if let Err(source) = http
                    .remove_member_role(guild_id, user_id, *role_id, Some(reason))
                    .await
                {
                    warn!(?source, role_id = %role_id, "failed to remove role during punishment");
                }
            }
            Ok(())
        }
        PunishmentAction::AddRole => {
            let Some(role_id) = punishment.role_id.map(serenity::RoleId::new) else {
                warn!(guild_id = %guild_id, warn_count = punishment.warn_count, "addrole punishment has no role");
                return Ok(false);
            };

            let result = http
                .add_member_role(guild_id, user_id, role_id, Some(reason))
                .await;
            if result.is_ok()
                && let Some(expires_at) = reversal_at(now, minutes)
            {
                schedule_timer(
                    db,
                    guild_id.get(),
                    user_id.get(),
                    TimerKind::RemoveRole,
                    Some(role_id.get()),
                    expires_at,
                )
                .await?;
            }
            result
        }
    };

    match result {
        Ok(()) => {
            info!(
                guild_id = %guild_id,
                user_id = %user_id,
                action = punishment.action.as_str(),
                time_minutes = minutes,
                "applied warn punishment"
            );
            Ok(true)
        }
        Err(source) if is_missing_permissions_error(&source) => {
            warn!(
                guild_id = %guild_id,
                user_id = %user_id,
                action = punishment.action.as_str(),
                "missing permissions to apply warn punishment (check role hierarchy)"
            );
            Ok(false)
        }
        Err(source) => {
            error!(?source, action = punishment.action.as_str(), "failed to apply warn punishment");
            Ok(false)
        }
    }
}

/// Ban to wipe recent messages, then lift the ban. The unban is retried once.
async fn softban(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    reason: &str,
) -> Result<(), serenity::Error> {
    guild_id
        .ban_with_reason(http, user_id, SOFTBAN_DELETE_DAYS, reason)
        .await?;

    if let Err(source) = guild_id.unban(http, user_id).await {
        warn!(?source, user_id = %user_id, "softban unban failed, retrying");
        sleep(Duration::from_secs(1)).await;
        guild_id.unban(http, user_id).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MAX_TIMEOUT_SECS, describe_punishment, normalize_reason, reversal_at, timeout_seconds};
    use mewdeko_database::model::punishments::{PunishmentAction, WarnPunishment};

    #[test]
    fn blank_reasons_become_a_dash() {
        assert_eq!(normalize_reason(None), "-");
        assert_eq!(normalize_reason(Some("   ")), "-");
        assert_eq!(normalize_reason(Some(" spam ")), "spam");
    }

    #[test]
    fn timeouts_are_capped_at_discords_maximum() {
        assert_eq!(timeout_seconds(0), MAX_TIMEOUT_SECS);
        assert_eq!(timeout_seconds(90), 90 * 60);
        assert_eq!(timeout_seconds(49 * 24 * 60), MAX_TIMEOUT_SECS);
    }

    #[test]
    fn permanent_punishments_schedule_no_reversal() {
        assert_eq!(reversal_at(1_000, 0), None);
        assert_eq!(reversal_at(1_000, 2), Some(1_120));
    }

    #[test]
    fn describes_ladder_entries() {
        let mute = WarnPunishment {
            warn_count: 3,
            action: PunishmentAction::Mute,
            time_minutes: 60,
            role_id: None,
        };
        assert_eq!(describe_punishment(&mute), "Mute (1h)");

        let kick = WarnPunishment {
            warn_count: 4,
            action: PunishmentAction::Kick,
            time_minutes: 0,
            role_id: None,
        };
        assert_eq!(describe_punishment(&kick), "Kick");

        let role = WarnPunishment {
            warn_count: 5,
            action: PunishmentAction::AddRole,
            time_minutes: 0,
            role_id: Some(42),
        };
        assert_eq!(describe_punishment(&role), "Add Role <@&42> (permanent)");
    }
}
