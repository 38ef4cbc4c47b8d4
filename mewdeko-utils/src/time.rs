use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Discord timestamp markup, e.g. `<t:1700000000:R>`.
pub fn discord_timestamp(unix_secs: i64, style: char) -> String {
    format!("<t:{unix_secs}:{style}>")
}

#[cfg(test)]
mod tests {
    use super::discord_timestamp;

    #[test]
    fn formats_discord_markup() {
        assert_eq!(discord_timestamp(1_700_000_000, 'R'), "<t:1700000000:R>");
    }
}
