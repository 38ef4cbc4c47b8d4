use std::collections::HashSet;

use anyhow::Context as _;

use crate::cache::{FILTER_CACHE_TTL, filter_snapshot_key, invalidate_filter};
use crate::database::Database;
use crate::model::filter::{FilterKind, FilterSnapshot};

/// Load everything the message filter needs for one guild.
pub async fn get_filter_snapshot(db: &Database, guild_id: u64) -> anyhow::Result<FilterSnapshot> {
    let cache_key = filter_snapshot_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, FILTER_CACHE_TTL, || async {
            load_filter_snapshot(db, guild_id).await
        })
        .await
}

async fn load_filter_snapshot(db: &Database, guild_id: u64) -> anyhow::Result<FilterSnapshot> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let config = sqlx::query_as::<_, (bool, bool, bool, bool, bool, Option<i64>)>(
        "SELECT filter_words, filter_invites, filter_links,
                warn_on_filtered_word, warn_on_invite, staff_role_id
         FROM guild_filter_config WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    let mut snapshot = FilterSnapshot {
        guild_id,
        ..Default::default()
    };

    if let Some((words, invites, links, warn_word, warn_invite, staff_role)) = config {
        snapshot.filter_words = words;
        snapshot.filter_invites = invites;
        snapshot.filter_links = links;
        snapshot.warn_on_filtered_word = warn_word;
        snapshot.warn_on_invite = warn_invite;
        snapshot.staff_role_id = staff_role
            .map(u64::try_from)
            .transpose()
            .context("staff_role_id row out of u64 range")?;
    }

    let channels = sqlx::query_as::<_, (i64, String)>(
        "SELECT channel_id, kind FROM filter_channels WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    for (channel_id, kind) in channels {
        let channel_id = u64::try_from(channel_id).context("channel_id row out of u64 range")?;
        match FilterKind::parse(&kind) {
            Some(FilterKind::Words) => snapshot.word_channels.insert(channel_id),
            Some(FilterKind::Invites) => snapshot.invite_channels.insert(channel_id),
            Some(FilterKind::Links) => snapshot.link_channels.insert(channel_id),
            None => continue,
        };
    }

    snapshot.filtered_words = list_filtered_words(db, guild_id).await?;
    snapshot.autoban_words = list_autoban_words(db, guild_id).await?;

    Ok(snapshot)
}

/// Flip the server-wide toggle for `kind`. Returns the new state.
pub async fn toggle_server_filter(
    db: &Database,
    guild_id: u64,
    kind: FilterKind,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    // Column names come from a closed enum, never from user input.
    let column = match kind {
        FilterKind::Words => "filter_words",
        FilterKind::Invites => "filter_invites",
        FilterKind::Links => "filter_links",
    };

    let enabled: bool = sqlx::query_scalar(&format!(
        "INSERT INTO guild_filter_config (guild_id, {column})
         VALUES ($1, TRUE)
         ON CONFLICT (guild_id) DO UPDATE SET {column} = NOT guild_filter_config.{column}
         RETURNING {column}"
    ))
    .bind(guild_id_i64)
    .fetch_one(db.pool())
    .await?;

    invalidate_filter(db.cache(), guild_id).await?;

    Ok(enabled)
}

/// Flip whether `kind` is filtered in one channel. Returns the new state.
pub async fn toggle_channel_filter(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    kind: FilterKind,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;

    let removed = sqlx::query("DELETE FROM filter_channels WHERE channel_id = $1 AND kind = $2")
        .bind(channel_id_i64)
        .bind(kind.as_str())
        .execute(db.pool())
        .await?
        .rows_affected();

    let enabled = if removed > 0 {
        false
    } else {
        sqlx::query(
            "INSERT INTO filter_channels (guild_id, channel_id, kind)
             VALUES ($1, $2, $3)
             ON CONFLICT (channel_id, kind) DO NOTHING",
        )
        .bind(guild_id_i64)
        .bind(channel_id_i64)
        .bind(kind.as_str())
        .execute(db.pool())
        .await?;
        true
    };

    invalidate_filter(db.cache(), guild_id).await?;

    Ok(enabled)
}

/// Flip whether filtered words (`Words`) or invites (`Invites`) also warn the
/// author. Returns the new state.
pub async fn toggle_filter_warn(
    db: &Database,
    guild_id: u64,
    kind: FilterKind,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let column = match kind {
        FilterKind::Words => "warn_on_filtered_word",
        FilterKind::Invites => "warn_on_invite",
        FilterKind::Links => anyhow::bail!("link filtering has no warn toggle"),
    };

    let enabled: bool = sqlx::query_scalar(&format!(
        "INSERT INTO guild_filter_config (guild_id, {column})
         VALUES ($1, TRUE)
         ON CONFLICT (guild_id) DO UPDATE SET {column} = NOT guild_filter_config.{column}
         RETURNING {column}"
    ))
    .bind(guild_id_i64)
    .fetch_one(db.pool())
    .await?;

    invalidate_filter(db.cache(), guild_id).await?;

    Ok(enabled)
}

pub async fn set_staff_role(db: &Database, guild_id: u64, role_id: Option<u64>) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let role_id_i64 = role_id
        .map(i64::try_from)
        .transpose()
        .context("role_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_filter_config (guild_id, staff_role_id)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET staff_role_id = EXCLUDED.staff_role_id",
    )
    .bind(guild_id_i64)
    .bind(role_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_filter(db.cache(), guild_id).await?;

    Ok(())
}

/// Normalise a word before storage: trimmed and lowercased.
/// Lowercase with runs of whitespace collapsed, so phrase entries compare
/// against message text consistently.
pub fn normalize_word(word: &str) -> String {
    word.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub async fn list_filtered_words(db: &Database, guild_id: u64) -> anyhow::Result<Vec<String>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let words = sqlx::query_scalar::<_, String>(
        "SELECT word FROM filtered_words WHERE guild_id = $1 ORDER BY word ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    Ok(words)
}

/// Add a word. Returns `true` if inserted, `false` if it already existed.
pub async fn add_filtered_word(db: &Database, guild_id: u64, word: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let word = normalize_word(word);

    let inserted = sqlx::query(
        "INSERT INTO filtered_words (guild_id, word) VALUES ($1, $2)
         ON CONFLICT (guild_id, word) DO NOTHING",
    )
    .bind(guild_id_i64)
    .bind(&word)
    .execute(db.pool())
    .await?
    .rows_affected();

    if inserted > 0 {
        invalidate_filter(db.cache(), guild_id).await?;
    }

    Ok(inserted > 0)
}

pub async fn remove_filtered_word(db: &Database, guild_id: u64, word: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let word = normalize_word(word);

    let removed = sqlx::query("DELETE FROM filtered_words WHERE guild_id = $1 AND word = $2")
        .bind(guild_id_i64)
        .bind(&word)
        .execute(db.pool())
        .await?
        .rows_affected();

    if removed > 0 {
        invalidate_filter(db.cache(), guild_id).await?;
    }

    Ok(removed > 0)
}

/// Remove every filtered word. Returns how many were removed.
pub async fn clear_filtered_words(db: &Database, guild_id: u64) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let removed = sqlx::query("DELETE FROM filtered_words WHERE guild_id = $1")
        .bind(guild_id_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    invalidate_filter(db.cache(), guild_id).await?;

    Ok(removed)
}

pub async fn list_autoban_words(db: &Database, guild_id: u64) -> anyhow::Result<Vec<String>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let words = sqlx::query_scalar::<_, String>(
        "SELECT word FROM autoban_words WHERE guild_id = $1 ORDER BY id ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    Ok(words)
}

pub async fn add_autoban_word(db: &Database, guild_id: u64, word: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let word = normalize_word(word);

    let inserted = sqlx::query(
        "INSERT INTO autoban_words (guild_id, word) VALUES ($1, $2)
         ON CONFLICT (guild_id, word) DO NOTHING",
    )
    .bind(guild_id_i64)
    .bind(&word)
    .execute(db.pool())
    .await?
    .rows_affected();

    if inserted > 0 {
        invalidate_filter(db.cache(), guild_id).await?;
    }

    Ok(inserted > 0)
}

pub async fn remove_autoban_word(db: &Database, guild_id: u64, word: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let word = normalize_word(word);

    let removed = sqlx::query("DELETE FROM autoban_words WHERE guild_id = $1 AND word = $2")
        .bind(guild_id_i64)
        .bind(&word)
        .execute(db.pool())
        .await?
        .rows_affected();

    if removed > 0 {
        invalidate_filter(db.cache(), guild_id).await?;
    }

    Ok(removed > 0)
}

/// Channels with a per-channel toggle for `kind`.
pub async fn filter_channels(
    db: &Database,
    guild_id: u64,
    kind: FilterKind,
) -> anyhow::Result<HashSet<u64>> {
    let snapshot = get_filter_snapshot(db, guild_id).await?;
    Ok(match kind {
        FilterKind::Words => snapshot.word_channels,
        FilterKind::Invites => snapshot.invite_channels,
        FilterKind::Links => snapshot.link_channels,
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_word;

    #[test]
    fn words_are_stored_trimmed_and_lowercase() {
        assert_eq!(normalize_word("  BadWord "), "badword");
        assert_eq!(normalize_word("ÄRGER"), "ärger");
        assert_eq!(normalize_word(" Free \t  NITRO "), "free nitro");
    }
}
