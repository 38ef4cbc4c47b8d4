use anyhow::Context as _;

use crate::cache::{CONFIG_CACHE_TTL, invalidate_snipe_config, snipe_config_key};
use crate::database::Database;
use crate::model::snipes::SnipeEntry;

/// Snipes older than this are purged by the cleanup job.
pub const SNIPE_RETENTION_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(sqlx::FromRow)]
struct SnipeRow {
    id: i64,
    guild_id: i64,
    channel_id: i64,
    user_id: i64,
    content: String,
    edited: bool,
    created_at: i64,
}

impl TryFrom<SnipeRow> for SnipeEntry {
    type Error = anyhow::Error;

    fn try_from(row: SnipeRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: u64::try_from(row.id).context("id row out of u64 range")?,
            guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
            channel_id: u64::try_from(row.channel_id).context("channel_id row out of u64 range")?,
            user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
            content: row.content,
            edited: row.edited,
            created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
        })
    }
}

pub async fn is_snipe_enabled(db: &Database, guild_id: u64) -> anyhow::Result<bool> {
    let cache_key = snipe_config_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let enabled = sqlx::query_scalar::<_, bool>(
                "SELECT enabled FROM snipe_config WHERE guild_id = $1",
            )
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?;

            Ok(enabled.unwrap_or(false))
        })
        .await
}

pub async fn set_snipe_enabled(db: &Database, guild_id: u64, enabled: bool) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO snipe_config (guild_id, enabled)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET enabled = EXCLUDED.enabled",
    )
    .bind(guild_id_i64)
    .bind(enabled)
    .execute(db.pool())
    .await?;

    invalidate_snipe_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn record_snipe(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    user_id: u64,
    content: &str,
    edited: bool,
    created_at: u64,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let created_at_i64 = i64::try_from(created_at).context("created_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO snipes (guild_id, channel_id, user_id, content, edited, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .bind(user_id_i64)
    .bind(content)
    .bind(edited)
    .bind(created_at_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Most recent snipe in a channel, optionally limited to one author.
pub async fn latest_snipe(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    user_id: Option<u64>,
    edited: bool,
) -> anyhow::Result<Option<SnipeEntry>> {
    let mut entries = recent_snipes(db, guild_id, channel_id, user_id, edited, 1).await?;
    Ok(entries.pop())
}

/// Up to `limit` snipes in a channel, newest first.
pub async fn recent_snipes(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    user_id: Option<u64>,
    edited: bool,
    limit: i64,
) -> anyhow::Result<Vec<SnipeEntry>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;
    let user_id_i64 = user_id
        .map(i64::try_from)
        .transpose()
        .context("user_id out of i64 range")?;

    let rows: Vec<SnipeRow> = sqlx::query_as(
        "SELECT id, guild_id, channel_id, user_id, content, edited, created_at
         FROM snipes
         WHERE guild_id = $1 AND channel_id = $2 AND edited = $3
           AND ($4::BIGINT IS NULL OR user_id = $4)
         ORDER BY created_at DESC, id DESC
         LIMIT $5",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .bind(edited)
    .bind(user_id_i64)
    .bind(limit.max(1))
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(SnipeEntry::try_from).collect()
}

/// Delete snipes created before `cutoff`. Returns how many were removed.
pub async fn delete_snipes_older_than(db: &Database, cutoff: u64) -> anyhow::Result<u64> {
    let cutoff_i64 = i64::try_from(cutoff).context("cutoff out of i64 range")?;

    let removed = sqlx::query("DELETE FROM snipes WHERE created_at < $1")
        .bind(cutoff_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(removed)
}
