/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 2w 3d, 1h 30m).
///
/// At most the two most significant units are shown.
pub fn format_compact_duration(total_seconds: u64) -> String {
    const UNITS: [(u64, &str); 5] = [
        (7 * 86_400, "w"),
        (86_400, "d"),
        (3_600, "h"),
        (60, "m"),
        (1, "s"),
    ];

    let mut remaining = total_seconds;
    let mut parts = Vec::with_capacity(2);

    for (size, suffix) in UNITS {
        let amount = remaining / size;
        remaining %= size;

        if amount > 0 {
            parts.push(format!("{amount}{suffix}"));
        } else if !parts.is_empty() {
            break;
        }

        if parts.len() == 2 {
            break;
        }
    }

    if parts.is_empty() {
        return "0s".to_owned();
    }

    parts.join(" ")
}

/// Format a punishment length stored in minutes; zero is permanent.
pub fn format_minutes(minutes: i32) -> String {
    if minutes <= 0 {
        return "permanent".to_owned();
    }

    format_compact_duration(u64::from(minutes.unsigned_abs()) * 60)
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Upper-case the first character of a category or module name.
pub fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_category, format_compact_duration, format_minutes, truncate_chars};

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3605), "1h");
        assert_eq!(format_compact_duration(90000), "1d 1h");
        assert_eq!(format_compact_duration(9 * 86_400), "1w 2d");
    }

    #[test]
    fn punishment_minutes() {
        assert_eq!(format_minutes(0), "permanent");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 6), "abc...");
        assert_eq!(truncate_chars("ääääää", 5), "ää...");
    }

    #[test]
    fn categories_are_capitalised() {
        assert_eq!(display_category("moderation"), "Moderation");
        assert_eq!(display_category(""), "");
    }
}
