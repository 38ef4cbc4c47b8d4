#[derive(Clone, Debug)]
pub struct WarningEntry {
    pub id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub moderator_name: String,
    pub reason: String,
    pub warned_at: u64,
    pub forgiven: bool,
    pub forgiven_by: Option<String>,
}

/// Outcome of recording a warning: the user's unforgiven warning count including it.
#[derive(Clone, Copy, Debug)]
pub struct WarningRecord {
    pub warn_count: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserWarnCount {
    pub user_id: u64,
    pub active: i64,
    pub total: i64,
}
