use poise::serenity_prelude as serenity;
use tokio::time::{Duration, sleep};
use tracing::{error, warn};

use crate::time::now_unix_secs;

/// Discord refuses bulk deletes of messages older than 14 days.
const BULK_DELETE_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;
const BULK_DELETE_SAFETY_BUFFER_SECS: u64 = 60 * 60;
const HISTORY_PAGE_SIZE: u8 = 50;
const BATCH_DELAY_MS: u64 = 1100;

/// Which messages a purge removes.
#[derive(Clone, Debug)]
pub enum PurgeFilter {
    All,
    User(serenity::UserId),
    Bots,
    Contains(String),
}

impl PurgeFilter {
    pub fn matches(&self, message: &serenity::Message) -> bool {
        match self {
            Self::All => true,
            Self::User(user_id) => message.author.id == *user_id,
            Self::Bots => message.author.bot,
            Self::Contains(needle) => message
                .content
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// Split message ids into those young enough for a bulk delete and the rest.
pub fn split_by_age(
    messages: &[(serenity::MessageId, i64)],
    now_secs: u64,
) -> (Vec<serenity::MessageId>, Vec<serenity::MessageId>) {
    let bulk_cutoff = now_secs
        .saturating_sub(BULK_DELETE_MAX_AGE_SECS.saturating_sub(BULK_DELETE_SAFETY_BUFFER_SECS))
        as i64;

    let mut bulk = Vec::new();
    let mut single = Vec::new();
    for (message_id, timestamp) in messages {
        if *timestamp >= bulk_cutoff {
            bulk.push(*message_id);
        } else {
            single.push(*message_id);
        }
    }

    (bulk, single)
}

/// How far back a purge looks: one history page per 50 requested messages,
/// ending early once enough messages matched or history ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanBudget {
    remaining: usize,
    pages_left: usize,
}

impl ScanBudget {
    pub fn new(amount: usize) -> Self {
        Self {
            remaining: amount,
            pages_left: amount.div_ceil(usize::from(HISTORY_PAGE_SIZE)),
        }
    }

    /// Messages still wanted.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Account for a fetched page. Returns whether another page should be
    /// fetched.
    pub fn record_page(&mut self, page_len: usize, matched: usize) -> bool {
        self.remaining = self.remaining.saturating_sub(matched);
        self.pages_left = self.pages_left.saturating_sub(1);

        self.remaining > 0 && self.pages_left > 0 && page_len >= usize::from(HISTORY_PAGE_SIZE)
    }
}

/// Delete up to `amount` messages in `channel_id` matching `filter`, newest
/// first, skipping `skip` (usually the invoking message). Returns how many
/// were deleted.
pub async fn purge_where(
    http: &serenity::Http,
    channel_id: serenity::ChannelId,
    amount: usize,
    filter: &PurgeFilter,
    skip: Option<serenity::MessageId>,
) -> anyhow::Result<u64> {
    let mut deleted = 0_u64;
    let mut budget = ScanBudget::new(amount);
    let mut before: Option<serenity::MessageId> = skip;

    while budget.remaining() > 0 {
        let request = match before {
            Some(before_id) => serenity::GetMessages::new()
                .before(before_id)
                .limit(HISTORY_PAGE_SIZE),
            None => serenity::GetMessages::new().limit(HISTORY_PAGE_SIZE),
        };

        let page = channel_id.messages(http, request).await?;
        if page.is_empty() {
            break;
        }

        before = page.last().map(|message| message.id);

        let targets: Vec<(serenity::MessageId, i64)> = page
            .iter()
            .filter(|message| Some(message.id) != skip && filter.matches(message))
            .take(budget.remaining())
            .map(|message| (message.id, message.timestamp.unix_timestamp()))
            .collect();
        let keep_scanning = budget.record_page(page.len(), targets.len());

        let (bulk, mut single) = split_by_age(&targets, now_unix_secs());

        for chunk in bulk.chunks(100) {
            if chunk.len() < 2 {
                single.extend_from_slice(chunk);
                continue;
            }

            match channel_id.delete_messages(http, chunk.to_vec()).await {
                Ok(()) => deleted = deleted.saturating_add(chunk.len() as u64),
                Err(source) => {
                    error!(
                        ?source,
                        channel_id = channel_id.get(),
                        count = chunk.len(),
                        "bulk delete failed, falling back to single delete"
                    );
                    single.extend_from_slice(chunk);
                }
            }
            sleep(Duration::from_millis(BATCH_DELAY_MS)).await;
        }

        for message_id in single {
            match channel_id.delete_message(http, message_id).await {
                Ok(()) => deleted = deleted.saturating_add(1),
                Err(source) => warn!(
                    ?source,
                    channel_id = channel_id.get(),
                    message_id = message_id.get(),
                    "single delete failed"
                ),
            }
        }

        if !keep_scanning {
            break;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{ScanBudget, split_by_age};

    #[test]
    fn old_messages_are_deleted_one_by_one() {
        let now = 100 * 24 * 60 * 60;
        let fresh = (serenity::MessageId::new(1), (now - 60) as i64);
        let stale = (serenity::MessageId::new(2), (now - 20 * 24 * 60 * 60) as i64);
        let edge = (serenity::MessageId::new(3), (now - 14 * 24 * 60 * 60 + 30) as i64);

        let (bulk, single) = split_by_age(&[fresh, stale, edge], now);
        assert_eq!(bulk, vec![serenity::MessageId::new(1)]);
        assert_eq!(
            single,
            vec![serenity::MessageId::new(2), serenity::MessageId::new(3)]
        );
    }

    #[test]
    fn sparse_matches_stop_after_the_page_budget() {
        let mut budget = ScanBudget::new(100);

        assert!(budget.record_page(50, 1));
        assert!(!budget.record_page(50, 2));
        assert_eq!(budget.remaining(), 97);
    }

    #[test]
    fn scan_ends_when_satisfied_or_history_runs_out() {
        let mut budget = ScanBudget::new(30);
        assert!(!budget.record_page(50, 30));
        assert_eq!(budget.remaining(), 0);

        let mut budget = ScanBudget::new(100);
        assert!(!budget.record_page(12, 3));
    }
}
