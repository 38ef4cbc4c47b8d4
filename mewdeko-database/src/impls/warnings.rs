use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::{
    database::Database,
    model::warnings::{UserWarnCount, WarningEntry, WarningRecord},
};

/// Marker written to `forgiven_by` when the expiry job forgives a warning.
pub const EXPIRY_FORGIVER: &str = "Expiry";

#[derive(sqlx::FromRow)]
struct WarningRow {
    id: i64,
    user_id: i64,
    moderator_id: i64,
    moderator_name: String,
    reason: String,
    warned_at: i64,
    forgiven: bool,
    forgiven_by: Option<String>,
}

impl TryFrom<WarningRow> for WarningEntry {
    type Error = anyhow::Error;

    fn try_from(row: WarningRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: u64::try_from(row.id).context("id row out of u64 range")?,
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            moderator_id: u64::try_from(row.moderator_id)
                .context("moderator_id row out of u64 range")?,
            moderator_name: row.moderator_name,
            reason: row.reason,
            warned_at: u64::try_from(row.warned_at).context("warned_at row out of u64 range")?,
            forgiven: row.forgiven,
            forgiven_by: row.forgiven_by,
        })
    }
}

/// Record a warning and return the user's unforgiven warning count including it.
///
/// The count and insert run in one transaction so two concurrent warnings
/// never observe the same count.
pub async fn record_warning(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    moderator_id: u64,
    moderator_name: &str,
    reason: &str,
) -> anyhow::Result<WarningRecord> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let moderator_id_i64 = i64::try_from(moderator_id).context("moderator_id out of i64 range")?;
    let warned_at_i64 = i64::try_from(now_unix_secs()).context("warned_at out of i64 range")?;

    let mut tx = db.pool().begin().await?;

    // Serialises warnings for the same user inside this guild.
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind((guild_id_i64 & 0x7fff_ffff) as i32)
        .bind((user_id_i64 & 0x7fff_ffff) as i32)
        .execute(&mut *tx)
        .await?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM warnings WHERE guild_id = $1 AND user_id = $2 AND forgiven = FALSE",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO warnings (guild_id, user_id, moderator_id, moderator_name, reason, warned_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(moderator_id_i64)
    .bind(moderator_name)
    .bind(reason)
    .bind(warned_at_i64)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(WarningRecord {
        warn_count: existing + 1,
    })
}

pub async fn count_active_warnings(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<i64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM warnings WHERE guild_id = $1 AND user_id = $2 AND forgiven = FALSE",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .fetch_one(db.pool())
    .await?;

    Ok(count)
}

/// Every warning for a user, newest first. Indexes shown to moderators follow this order.
pub async fn warnings_for_user(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Vec<WarningEntry>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let rows: Vec<WarningRow> = sqlx::query_as(
        "SELECT id, user_id, moderator_id, moderator_name, reason, warned_at, forgiven, forgiven_by
         FROM warnings
         WHERE guild_id = $1 AND user_id = $2
         ORDER BY warned_at DESC, id DESC",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(WarningEntry::try_from).collect()
}

/// Warning counts grouped per user for the whole guild, most-warned first.
pub async fn warn_counts_for_guild(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<Vec<UserWarnCount>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let rows = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT user_id,
                COUNT(*) FILTER (WHERE forgiven = FALSE) AS active,
                COUNT(*) AS total
         FROM warnings
         WHERE guild_id = $1
         GROUP BY user_id
         ORDER BY active DESC, total DESC, user_id ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter()
        .map(|(user_id, active, total)| {
            Ok(UserWarnCount {
                user_id: u64::try_from(user_id).context("user_id row out of u64 range")?,
                active,
                total,
            })
        })
        .collect()
}

/// Forgive every unforgiven warning of a user. Returns the number forgiven.
pub async fn forgive_all(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    forgiven_by: &str,
) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let updated = sqlx::query(
        "UPDATE warnings SET forgiven = TRUE, forgiven_by = $3
         WHERE guild_id = $1 AND user_id = $2 AND forgiven = FALSE",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(forgiven_by)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated)
}

/// Forgive the `index`-th newest warning (zero based). Returns `false` when the
/// warning does not exist or was already forgiven.
pub async fn forgive_nth(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    index: usize,
    forgiven_by: &str,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let index_i64 = i64::try_from(index).context("index out of i64 range")?;

    let forgiven: Option<i64> = sqlx::query_scalar(
        "WITH target AS (
            SELECT id, forgiven
            FROM warnings
            WHERE guild_id = $1 AND user_id = $2
            ORDER BY warned_at DESC, id DESC
            OFFSET $3 LIMIT 1
        )
        UPDATE warnings w
        SET forgiven = TRUE, forgiven_by = $4
        FROM target t
        WHERE w.id = t.id AND t.forgiven = FALSE
        RETURNING w.id",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(index_i64)
    .bind(forgiven_by)
    .fetch_optional(db.pool())
    .await?;

    Ok(forgiven.is_some())
}

/// Apply every guild's warning expiry. Returns `(forgiven, deleted)`.
pub async fn expire_all_warnings(db: &Database) -> anyhow::Result<(u64, u64)> {
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let cleared = sqlx::query(
        "UPDATE warnings w
         SET forgiven = TRUE, forgiven_by = $2
         FROM guild_warn_config c
         WHERE c.guild_id = w.guild_id
           AND c.warn_expire_hours > 0
           AND c.warn_expire_action = 'clear'
           AND w.forgiven = FALSE
           AND w.warned_at < $1 - c.warn_expire_hours::BIGINT * 3600",
    )
    .bind(now)
    .bind(EXPIRY_FORGIVER)
    .execute(db.pool())
    .await?
    .rows_affected();

    let deleted = sqlx::query(
        "DELETE FROM warnings w
         USING guild_warn_config c
         WHERE c.guild_id = w.guild_id
           AND c.warn_expire_hours > 0
           AND c.warn_expire_action = 'delete'
           AND w.warned_at < $1 - c.warn_expire_hours::BIGINT * 3600",
    )
    .bind(now)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok((cleared, deleted))
}

/// Apply one guild's warning expiry using its stored configuration.
pub async fn expire_guild_warnings(db: &Database, guild_id: u64) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let config = sqlx::query_as::<_, (i32, String)>(
        "SELECT warn_expire_hours, warn_expire_action FROM guild_warn_config WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    let Some((hours, action)) = config else {
        return Ok(0);
    };

    if hours <= 0 {
        return Ok(0);
    }

    let cutoff = expiry_cutoff(now, hours);
    let affected = if action == "delete" {
        sqlx::query("DELETE FROM warnings WHERE guild_id = $1 AND warned_at < $2")
            .bind(guild_id_i64)
            .bind(cutoff)
            .execute(db.pool())
            .await?
            .rows_affected()
    } else {
        sqlx::query(
            "UPDATE warnings SET forgiven = TRUE, forgiven_by = $3
             WHERE guild_id = $1 AND forgiven = FALSE AND warned_at < $2",
        )
        .bind(guild_id_i64)
        .bind(cutoff)
        .bind(EXPIRY_FORGIVER)
        .execute(db.pool())
        .await?
        .rows_affected()
    };

    Ok(affected)
}

/// Oldest `warned_at` that survives an expiry of `hours`.
pub fn expiry_cutoff(now: i64, hours: i32) -> i64 {
    now.saturating_sub(i64::from(hours.max(0)) * 3_600)
}

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::expiry_cutoff;

    #[test]
    fn cutoff_moves_back_by_whole_hours() {
        assert_eq!(expiry_cutoff(100_000, 1), 96_400);
        assert_eq!(expiry_cutoff(100_000, 0), 100_000);
        assert_eq!(expiry_cutoff(100_000, -5), 100_000);
    }
}
