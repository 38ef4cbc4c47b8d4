use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Guilds with a purge in progress. At most one purge runs per guild.
#[derive(Debug, Default)]
pub struct ActivePurges {
    guilds: Mutex<HashSet<u64>>,
}

impl ActivePurges {
    /// Claim the guild's purge slot. `None` while another purge runs there.
    pub fn try_begin(&self, guild_id: u64) -> Option<PurgeGuard<'_>> {
        let mut guilds = self.guilds.lock().unwrap_or_else(PoisonError::into_inner);
        guilds.insert(guild_id).then_some(PurgeGuard {
            owner: self,
            guild_id,
        })
    }
}

/// Releases the guild's purge slot when dropped.
#[derive(Debug)]
pub struct PurgeGuard<'a> {
    owner: &'a ActivePurges,
    guild_id: u64,
}

impl Drop for PurgeGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .guilds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.guild_id);
    }
}

const MAX_SUPPRESSED: usize = 10_000;

/// Message ids the bot deleted itself, so their delete events are not sniped.
#[derive(Debug, Default)]
pub struct SuppressedDeletes {
    ids: Mutex<HashSet<u64>>,
}

impl SuppressedDeletes {
    pub fn suppress(&self, message_id: u64) {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        if ids.len() >= MAX_SUPPRESSED {
            ids.clear();
        }
        ids.insert(message_id);
    }

    /// Consume the suppression for `message_id`. Returns `true` if it was set.
    pub fn take(&self, message_id: u64) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivePurges, SuppressedDeletes};

    #[test]
    fn purge_slot_is_released_on_drop() {
        let purges = ActivePurges::default();

        let guard = purges.try_begin(1).unwrap();
        assert!(purges.try_begin(1).is_none());
        assert!(purges.try_begin(2).is_some());

        drop(guard);
        assert!(purges.try_begin(1).is_some());
    }

    #[test]
    fn suppression_is_consumed_once() {
        let suppressed = SuppressedDeletes::default();
        suppressed.suppress(9);
        assert!(suppressed.take(9));
        assert!(!suppressed.take(9));
    }
}
