use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Words,
    Invites,
    Links,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Invites => "invites",
            Self::Links => "links",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "words" => Some(Self::Words),
            "invites" => Some(Self::Invites),
            "links" => Some(Self::Links),
            _ => None,
        }
    }
}

/// Everything the message filter needs for one guild, loaded as a unit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub guild_id: u64,
    pub filter_words: bool,
    pub filter_invites: bool,
    pub filter_links: bool,
    pub warn_on_filtered_word: bool,
    pub warn_on_invite: bool,
    pub staff_role_id: Option<u64>,
    pub word_channels: HashSet<u64>,
    pub invite_channels: HashSet<u64>,
    pub link_channels: HashSet<u64>,
    pub filtered_words: Vec<String>,
    pub autoban_words: Vec<String>,
}

impl FilterSnapshot {
    pub fn words_active_in(&self, channel_id: u64) -> bool {
        self.filter_words || self.word_channels.contains(&channel_id)
    }

    pub fn invites_active_in(&self, channel_id: u64) -> bool {
        self.filter_invites || self.invite_channels.contains(&channel_id)
    }

    pub fn links_active_in(&self, channel_id: u64) -> bool {
        self.filter_links || self.link_channels.contains(&channel_id)
    }

    /// True when no filter can ever fire for this guild.
    pub fn is_inert(&self) -> bool {
        !self.filter_invites
            && !self.filter_links
            && self.invite_channels.is_empty()
            && self.link_channels.is_empty()
            && (self.filtered_words.is_empty() || (!self.filter_words && self.word_channels.is_empty()))
            && self.autoban_words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FilterSnapshot;

    #[test]
    fn channel_toggle_enables_filter_without_server_toggle() {
        let mut snapshot = FilterSnapshot::default();
        snapshot.word_channels.insert(10);
        assert!(snapshot.words_active_in(10));
        assert!(!snapshot.words_active_in(11));

        snapshot.filter_words = true;
        assert!(snapshot.words_active_in(11));
    }

    #[test]
    fn inert_when_nothing_configured() {
        let mut snapshot = FilterSnapshot::default();
        assert!(snapshot.is_inert());

        snapshot.filtered_words.push("bad".to_owned());
        assert!(snapshot.is_inert(), "words without an active toggle never fire");

        snapshot.word_channels.insert(1);
        assert!(!snapshot.is_inert());

        let snapshot = FilterSnapshot {
            autoban_words: vec!["x".to_owned()],
            ..Default::default()
        };
        assert!(!snapshot.is_inert());
    }
}
