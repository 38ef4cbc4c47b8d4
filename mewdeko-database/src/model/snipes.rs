#[derive(Clone, Debug)]
pub struct SnipeEntry {
    pub id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    pub content: String,
    pub edited: bool,
    pub created_at: u64,
}
