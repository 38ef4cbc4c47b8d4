use anyhow::Context as _;
use tracing::warn;

use crate::database::Database;
use crate::model::punishments::{PunishmentTimer, TimerKind};

#[derive(sqlx::FromRow)]
struct TimerRow {
    id: i64,
    guild_id: i64,
    user_id: i64,
    kind: String,
    role_id: Option<i64>,
    expires_at: i64,
}

impl TryFrom<TimerRow> for PunishmentTimer {
    type Error = anyhow::Error;

    fn try_from(row: TimerRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: row.id,
            guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            kind: TimerKind::parse(&row.kind)
                .with_context(|| format!("unknown timer kind `{}`", row.kind))?,
            role_id: row
                .role_id
                .map(u64::try_from)
                .transpose()
                .context("role_id row out of u64 range")?,
            expires_at: u64::try_from(row.expires_at).context("expires_at row out of u64 range")?,
        })
    }
}

/// Schedule a reversal. Any pending timer of the same kind for the same
/// target is replaced so re-punishing extends rather than stacks.
pub async fn schedule_timer(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    kind: TimerKind,
    role_id: Option<u64>,
    expires_at: u64,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let role_id_i64 = role_id
        .map(i64::try_from)
        .transpose()
        .context("role_id out of i64 range")?;
    let expires_at_i64 = i64::try_from(expires_at).context("expires_at out of i64 range")?;

    let mut tx = db.pool().begin().await?;

    sqlx::query(
        "DELETE FROM punishment_timers
         WHERE guild_id = $1 AND user_id = $2 AND kind = $3
           AND role_id IS NOT DISTINCT FROM $4",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(kind.as_str())
    .bind(role_id_i64)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO punishment_timers (guild_id, user_id, kind, role_id, expires_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(kind.as_str())
    .bind(role_id_i64)
    .bind(expires_at_i64)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Timers whose expiry is at or before `now`, oldest first.
pub async fn due_timers(db: &Database, now: u64) -> anyhow::Result<Vec<PunishmentTimer>> {
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let rows: Vec<TimerRow> = sqlx::query_as(
        "SELECT id, guild_id, user_id, kind, role_id, expires_at
         FROM punishment_timers
         WHERE expires_at <= $1
         ORDER BY expires_at ASC
         LIMIT 100",
    )
    .bind(now_i64)
    .fetch_all(db.pool())
    .await?;

    let (timers, rejected) = parse_timer_rows(rows);
    for (id, source) in rejected {
        warn!(timer_id = id, ?source, "dropping unreadable punishment timer");
        if let Err(source) = delete_timer(db, id).await {
            warn!(timer_id = id, ?source, "failed to delete unreadable punishment timer");
        }
    }

    Ok(timers)
}

/// Convert rows, returning the ids of unreadable rows separately.
fn parse_timer_rows(rows: Vec<TimerRow>) -> (Vec<PunishmentTimer>, Vec<(i64, anyhow::Error)>) {
    let mut timers = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        let id = row.id;
        match PunishmentTimer::try_from(row) {
            Ok(timer) => timers.push(timer),
            Err(source) => rejected.push((id, source)),
        }
    }

    (timers, rejected)
}

pub async fn delete_timer(db: &Database, id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM punishment_timers WHERE id = $1")
        .bind(id)
        .execute(db.pool())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{TimerRow, parse_timer_rows};
    use crate::model::punishments::TimerKind;

    fn row(id: i64, kind: &str) -> TimerRow {
        TimerRow {
            id,
            guild_id: 1,
            user_id: 2,
            kind: kind.to_owned(),
            role_id: None,
            expires_at: 100,
        }
    }

    #[test]
    fn unreadable_rows_are_set_aside() {
        let rows = vec![row(1, "unban"), row(2, "bogus"), row(3, "unban")];
        let (timers, rejected) = parse_timer_rows(rows);

        assert_eq!(timers.iter().map(|timer| timer.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(timers.iter().all(|timer| timer.kind == TimerKind::Unban));
        assert_eq!(rejected.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![2]);
    }
}
