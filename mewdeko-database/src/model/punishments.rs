use std::fmt;

use serde::{Deserialize, Serialize};

/// Punishment applied when a user reaches a configured warning count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PunishmentAction {
    Mute,
    ChatMute,
    VoiceMute,
    Kick,
    Ban,
    Softban,
    RemoveRoles,
    AddRole,
}

impl PunishmentAction {
    pub const ALL: [PunishmentAction; 8] = [
        Self::Mute,
        Self::ChatMute,
        Self::VoiceMute,
        Self::Kick,
        Self::Ban,
        Self::Softban,
        Self::RemoveRoles,
        Self::AddRole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mute => "mute",
            Self::ChatMute => "chatmute",
            Self::VoiceMute => "voicemute",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::Softban => "softban",
            Self::RemoveRoles => "removeroles",
            Self::AddRole => "addrole",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let lookup = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == lookup)
    }

    /// Kick, softban and role stripping are instantaneous and take no duration.
    pub fn accepts_duration(self) -> bool {
        !matches!(self, Self::Kick | Self::Softban | Self::RemoveRoles)
    }
}

impl fmt::Display for PunishmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mute => "Mute",
            Self::ChatMute => "Chat Mute",
            Self::VoiceMute => "Voice Mute",
            Self::Kick => "Kick",
            Self::Ban => "Ban",
            Self::Softban => "Softban",
            Self::RemoveRoles => "Remove Roles",
            Self::AddRole => "Add Role",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarnPunishment {
    pub warn_count: i32,
    pub action: PunishmentAction,
    /// Zero means permanent.
    pub time_minutes: i32,
    pub role_id: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarnExpireAction {
    #[default]
    Clear,
    Delete,
}

impl WarnExpireAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Delete => "delete",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "clear" => Some(Self::Clear),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarnConfig {
    pub guild_id: u64,
    pub warn_expire_hours: i32,
    pub warn_expire_action: WarnExpireAction,
    pub warnlog_channel_id: Option<u64>,
}

/// Reversal scheduled for a timed punishment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Unban,
    VoiceUnmute,
    RemoveRole,
}

impl TimerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unban => "unban",
            Self::VoiceUnmute => "voice_unmute",
            Self::RemoveRole => "remove_role",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unban" => Some(Self::Unban),
            "voice_unmute" => Some(Self::VoiceUnmute),
            "remove_role" => Some(Self::RemoveRole),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PunishmentTimer {
    pub id: i64,
    pub guild_id: u64,
    pub user_id: u64,
    pub kind: TimerKind,
    pub role_id: Option<u64>,
    pub expires_at: u64,
}

#[cfg(test)]
mod tests {
    use super::{PunishmentAction, TimerKind, WarnExpireAction};

    #[test]
    fn actions_round_trip_through_their_names() {
        for action in PunishmentAction::ALL {
            assert_eq!(PunishmentAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(PunishmentAction::parse(" BAN "), Some(PunishmentAction::Ban));
        assert_eq!(PunishmentAction::parse("jail"), None);
    }

    #[test]
    fn instantaneous_actions_reject_durations() {
        assert!(!PunishmentAction::Kick.accepts_duration());
        assert!(!PunishmentAction::Softban.accepts_duration());
        assert!(!PunishmentAction::RemoveRoles.accepts_duration());
        assert!(PunishmentAction::Ban.accepts_duration());
        assert!(PunishmentAction::AddRole.accepts_duration());
    }

    #[test]
    fn parses_stored_kinds() {
        assert_eq!(TimerKind::parse("voice_unmute"), Some(TimerKind::VoiceUnmute));
        assert_eq!(TimerKind::parse("mute"), None);
        assert_eq!(WarnExpireAction::parse("delete"), Some(WarnExpireAction::Delete));
        assert_eq!(WarnExpireAction::default(), WarnExpireAction::Clear);
    }
}
