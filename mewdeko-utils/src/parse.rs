use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d{1,4})w)?(?:(\d{1,5})d)?(?:(\d{1,6})h)?(?:(\d{1,7})m)?(?:(\d{1,9})s)?$")
        .expect("duration pattern is valid")
});

/// Parse a compact duration like `30s`, `10m`, `2h`, `1d`, `1w2d3h`, or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if compact.bytes().all(|byte| byte.is_ascii_digit()) {
        return compact.parse::<u64>().ok().filter(|seconds| *seconds > 0);
    }

    let captures = DURATION_RE.captures(&compact)?;
    let multipliers = [7 * 86_400_u64, 86_400, 3_600, 60, 1];

    let mut total = 0_u64;
    for (index, multiplier) in multipliers.into_iter().enumerate() {
        let Some(part) = captures.get(index + 1) else {
            continue;
        };
        let amount = part.as_str().parse::<u64>().ok()?;
        total = total.checked_add(amount.checked_mul(multiplier)?)?;
    }

    (total > 0).then_some(total)
}

/// Parse `on`/`off` style toggles.
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "enable" | "enabled" | "true" | "yes" => Some(true),
        "off" | "disable" | "disabled" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_duration_seconds, parse_toggle};

    #[test]
    fn parses_single_and_combined_units() {
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("2H"), Some(7_200));
        assert_eq!(parse_duration_seconds("1w2d"), Some(9 * 86_400));
        assert_eq!(parse_duration_seconds("1d 12h"), Some(129_600));
        assert_eq!(parse_duration_seconds("45"), Some(45));
    }

    #[test]
    fn rejects_garbage_and_zero() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("0"), None);
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("5x"), None);
        assert_eq!(parse_duration_seconds("h"), None);
        assert_eq!(parse_duration_seconds("2h1d"), None);
    }

    #[test]
    fn toggles() {
        assert_eq!(parse_toggle("ON"), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("maybe"), None);
    }
}
