use anyhow::Context as _;

use crate::cache::{CONFIG_CACHE_TTL, invalidate_warn_config, warn_config_key};
use crate::database::Database;
use crate::model::punishments::{PunishmentAction, WarnConfig, WarnExpireAction, WarnPunishment};

/// Longest duration a ladder entry may carry.
pub const MAX_PUNISHMENT_MINUTES: i64 = 49 * 24 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LadderRejection {
    NonPositiveCount,
    DurationTooLong,
    DurationNotAllowed,
    MissingRole,
}

/// Validate a ladder entry before it is stored.
pub fn validate_punishment(
    warn_count: i32,
    action: PunishmentAction,
    time_minutes: Option<i64>,
    role_id: Option<u64>,
) -> Result<(), LadderRejection> {
    if time_minutes.is_some() && !action.accepts_duration() {
        return Err(LadderRejection::DurationNotAllowed);
    }

    if warn_count <= 0 {
        return Err(LadderRejection::NonPositiveCount);
    }

    if time_minutes.is_some_and(|minutes| minutes > MAX_PUNISHMENT_MINUTES) {
        return Err(LadderRejection::DurationTooLong);
    }

    if action == PunishmentAction::AddRole && role_id.is_none() {
        return Err(LadderRejection::MissingRole);
    }

    Ok(())
}

/// Pick the ladder entry for an exact warning count.
pub fn punishment_for_count(ladder: &[WarnPunishment], warn_count: i64) -> Option<&WarnPunishment> {
    ladder
        .iter()
        .find(|entry| i64::from(entry.warn_count) == warn_count)
}

#[derive(sqlx::FromRow)]
struct PunishmentRow {
    warn_count: i32,
    action: String,
    time_minutes: i32,
    role_id: Option<i64>,
}

impl TryFrom<PunishmentRow> for WarnPunishment {
    type Error = anyhow::Error;

    fn try_from(row: PunishmentRow) -> anyhow::Result<Self> {
        let action = PunishmentAction::parse(&row.action)
            .with_context(|| format!("unknown punishment action `{}`", row.action))?;
        let role_id = row
            .role_id
            .map(u64::try_from)
            .transpose()
            .context("role_id row out of u64 range")?;

        Ok(Self {
            warn_count: row.warn_count,
            action,
            time_minutes: row.time_minutes,
            role_id,
        })
    }
}

/// The guild's punishment ladder ordered by warning count.
pub async fn list_punishments(db: &Database, guild_id: u64) -> anyhow::Result<Vec<WarnPunishment>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let rows: Vec<PunishmentRow> = sqlx::query_as(
        "SELECT warn_count, action, time_minutes, role_id
         FROM warn_punishments
         WHERE guild_id = $1
         ORDER BY warn_count ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(WarnPunishment::try_from).collect()
}

/// Store a ladder entry, replacing any entry at the same count.
pub async fn set_punishment(
    db: &Database,
    guild_id: u64,
    punishment: &WarnPunishment,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let role_id_i64 = punishment
        .role_id
        .map(i64::try_from)
        .transpose()
        .context("role_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO warn_punishments (guild_id, warn_count, action, time_minutes, role_id)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (guild_id, warn_count) DO UPDATE
         SET action = EXCLUDED.action,
             time_minutes = EXCLUDED.time_minutes,
             role_id = EXCLUDED.role_id",
    )
    .bind(guild_id_i64)
    .bind(punishment.warn_count)
    .bind(punishment.action.as_str())
    .bind(punishment.time_minutes)
    .bind(role_id_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Remove the ladder entry at `warn_count`. Returns `true` if one existed.
pub async fn remove_punishment(db: &Database, guild_id: u64, warn_count: i32) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let result = sqlx::query("DELETE FROM warn_punishments WHERE guild_id = $1 AND warn_count = $2")
        .bind(guild_id_i64)
        .bind(warn_count)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_warn_config(db: &Database, guild_id: u64) -> anyhow::Result<WarnConfig> {
    let cache_key = warn_config_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let row = sqlx::query_as::<_, (i32, String, Option<i64>)>(
                "SELECT warn_expire_hours, warn_expire_action, warnlog_channel_id
                 FROM guild_warn_config WHERE guild_id = $1",
            )
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?;

            let Some((hours, action, channel_id)) = row else {
                return Ok(WarnConfig {
                    guild_id,
                    ..Default::default()
                });
            };

            Ok(WarnConfig {
                guild_id,
                warn_expire_hours: hours,
                warn_expire_action: WarnExpireAction::parse(&action).unwrap_or_default(),
                warnlog_channel_id: channel_id
                    .map(u64::try_from)
                    .transpose()
                    .context("warnlog_channel_id out of u64 range")?,
            })
        })
        .await
}

pub async fn set_warn_expire(
    db: &Database,
    guild_id: u64,
    hours: i32,
    action: WarnExpireAction,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_warn_config (guild_id, warn_expire_hours, warn_expire_action)
         VALUES ($1, $2, $3)
         ON CONFLICT (guild_id) DO UPDATE
         SET warn_expire_hours = EXCLUDED.warn_expire_hours,
             warn_expire_action = EXCLUDED.warn_expire_action",
    )
    .bind(guild_id_i64)
    .bind(hours.max(0))
    .bind(action.as_str())
    .execute(db.pool())
    .await?;

    invalidate_warn_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_warnlog_channel(
    db: &Database,
    guild_id: u64,
    channel_id: Option<u64>,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = channel_id
        .map(i64::try_from)
        .transpose()
        .context("channel_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_warn_config (guild_id, warnlog_channel_id)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET warnlog_channel_id = EXCLUDED.warnlog_channel_id",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_warn_config(db.cache(), guild_id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LadderRejection, MAX_PUNISHMENT_MINUTES, punishment_for_count, validate_punishment};
    use crate::model::punishments::{PunishmentAction, WarnPunishment};

    fn entry(warn_count: i32, action: PunishmentAction) -> WarnPunishment {
        WarnPunishment {
            warn_count,
            action,
            time_minutes: 0,
            role_id: None,
        }
    }

    #[test]
    fn ladder_matches_exact_count_only() {
        let ladder = vec![
            entry(3, PunishmentAction::Mute),
            entry(5, PunishmentAction::Kick),
        ];

        assert_eq!(
            punishment_for_count(&ladder, 3).map(|p| p.action),
            Some(PunishmentAction::Mute)
        );
        assert!(punishment_for_count(&ladder, 4).is_none());
        assert!(punishment_for_count(&ladder, 6).is_none());
        assert_eq!(
            punishment_for_count(&ladder, 5).map(|p| p.action),
            Some(PunishmentAction::Kick)
        );
    }

    #[test]
    fn rejects_invalid_entries() {
        assert_eq!(
            validate_punishment(0, PunishmentAction::Ban, None, None),
            Err(LadderRejection::NonPositiveCount)
        );
        assert_eq!(
            validate_punishment(2, PunishmentAction::Kick, Some(10), None),
            Err(LadderRejection::DurationNotAllowed)
        );
        assert_eq!(
            validate_punishment(2, PunishmentAction::Ban, Some(MAX_PUNISHMENT_MINUTES + 1), None),
            Err(LadderRejection::DurationTooLong)
        );
        assert_eq!(
            validate_punishment(2, PunishmentAction::AddRole, None, None),
            Err(LadderRejection::MissingRole)
        );
    }

    #[test]
    fn accepts_valid_entries() {
        assert_eq!(validate_punishment(1, PunishmentAction::Kick, None, None), Ok(()));
        assert_eq!(
            validate_punishment(3, PunishmentAction::Ban, Some(MAX_PUNISHMENT_MINUTES), None),
            Ok(())
        );
        assert_eq!(
            validate_punishment(4, PunishmentAction::AddRole, Some(60), Some(99)),
            Ok(())
        );
    }
}
