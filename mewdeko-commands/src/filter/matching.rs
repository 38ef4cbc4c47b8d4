//! Pure content checks used by the message filter.

use std::sync::LazyLock;

use regex::Regex;

static INVITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:discord(?:\.gg|\.io|\.me|\.li)|discord(?:app)?\.com/invite)/[\w-]+")
        .expect("invite pattern is valid")
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp)://[^\s/$.?#].[^\s]*").expect("link pattern is valid")
});

pub fn contains_invite(content: &str) -> bool {
    INVITE_RE.is_match(content)
}

pub fn contains_link(content: &str) -> bool {
    LINK_RE.is_match(content)
}

/// First configured entry found in `content`, compared case-insensitively.
/// Entries are stored lowercase. A single alphanumeric word must equal a
/// whole token; an entry with spaces or punctuation ("free nitro",
/// "discord.gift") matches anywhere as a substring.
pub fn find_word<'a>(content: &str, words: &'a [String]) -> Option<&'a str> {
    if words.is_empty() {
        return None;
    }

    let content = content.to_lowercase();
    let tokens: Vec<&str> = content
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    words
        .iter()
        .map(String::as_str)
        .filter(|word| !word.is_empty())
        .find(|word| {
            if is_plain_word(word) {
                tokens.contains(word)
            } else {
                content.contains(word)
            }
        })
}

fn is_plain_word(word: &str) -> bool {
    word.chars().all(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::{contains_invite, contains_link, find_word};

    #[test]
    fn detects_invite_variants() {
        assert!(contains_invite("join discord.gg/abc-123 now"));
        assert!(contains_invite("https://discord.com/invite/xyz"));
        assert!(contains_invite("DISCORDAPP.COM/INVITE/Xyz"));
        assert!(contains_invite("discord.me/server"));
        assert!(!contains_invite("discord is great"));
        assert!(!contains_invite("discord.com/channels/1/2"));
    }

    #[test]
    fn detects_links_by_scheme() {
        assert!(contains_link("see https://example.com/page"));
        assert!(contains_link("ftp://files.example.org"));
        assert!(contains_link("HTTP://EXAMPLE.COM"));
        assert!(!contains_link("example.com without scheme"));
        assert!(!contains_link("https:// nothing"));
    }

    #[test]
    fn words_match_whole_tokens_only() {
        let words = vec!["bad".to_owned(), "worse".to_owned()];

        assert_eq!(find_word("this is BAD!", &words), Some("bad"));
        assert_eq!(find_word("badge of honour", &words), None);
        assert_eq!(find_word("worse-case", &words), Some("worse"));
        assert_eq!(find_word("anything", &[]), None);
    }

    #[test]
    fn phrases_and_punctuated_entries_match_as_substrings() {
        let words = vec!["free nitro".to_owned(), "discord.gift".to_owned()];

        assert_eq!(find_word("get FREE NITRO here", &words), Some("free nitro"));
        assert_eq!(find_word("claim discord.gift/abc", &words), Some("discord.gift"));
        assert_eq!(find_word("free stuff, nitro later", &words), None);
        assert_eq!(find_word("discord gift", &words), None);
    }
}
