use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::announcer::TriviaAnnouncer;
use crate::game::TriviaGame;

/// Running games keyed by guild. At most one game runs per guild.
pub struct TriviaRegistry<A> {
    games: Arc<RwLock<HashMap<u64, Arc<TriviaGame<A>>>>>,
}

impl<A> Clone for TriviaRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            games: Arc::clone(&self.games),
        }
    }
}

impl<A> Default for TriviaRegistry<A> {
    fn default() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<A: TriviaAnnouncer> TriviaRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, guild_id: u64) -> Option<Arc<TriviaGame<A>>> {
        self.games.read().await.get(&guild_id).cloned()
    }

    /// Register `game` and run it in the background. When the guild already
    /// has a game, that game is returned instead and nothing is started.
    pub async fn start(&self, game: TriviaGame<A>) -> Result<Arc<TriviaGame<A>>, Arc<TriviaGame<A>>> {
        let guild_id = game.guild_id();
        let game = {
            let mut games = self.games.write().await;
            if let Some(existing) = games.get(&guild_id) {
                return Err(Arc::clone(existing));
            }

            let game = Arc::new(game);
            games.insert(guild_id, Arc::clone(&game));
            game
        };

        info!(guild_id, channel_id = game.channel_id(), "trivia game started");

        let registry = self.clone();
        let running = Arc::clone(&game);
        tokio::spawn(async move {
            running.run().await;
            registry.remove(guild_id, &running).await;
            running.ensure_stopped().await;
            info!(guild_id, "trivia game finished");
        });

        Ok(game)
    }

    /// Forget `game` if it is still the guild's registered game.
    async fn remove(&self, guild_id: u64, game: &Arc<TriviaGame<A>>) {
        let mut games = self.games.write().await;
        if games
            .get(&guild_id)
            .is_some_and(|current| Arc::ptr_eq(current, game))
        {
            games.remove(&guild_id);
        }
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::TriviaRegistry;
    use crate::announcer::{Announcement, DeliveryError, TriviaAnnouncer};
    use crate::game::TriviaGame;
    use crate::options::TriviaOptions;
    use crate::pool::QuestionPool;
    use crate::question::TriviaQuestion;

    struct Silent(mpsc::UnboundedSender<Announcement>);

    impl TriviaAnnouncer for Silent {
        async fn post_question(&self, _: &TriviaQuestion, _: bool) -> Result<u64, DeliveryError> {
            Ok(1)
        }

        async fn show_hint(&self, _: u64, _: &TriviaQuestion) -> Result<(), DeliveryError> {
            Ok(())
        }

        async fn announce(&self, announcement: Announcement) -> Result<(), DeliveryError> {
            let _ = self.0.send(announcement);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_game_per_guild_and_removed_when_finished() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pool = Arc::new(QuestionPool::from_questions(vec![TriviaQuestion::new(
            "Science", "H2O is?", "Water",
        )]));
        let options = TriviaOptions {
            timeout: 1,
            ..Default::default()
        };
        let registry = TriviaRegistry::new();

        let first = registry
            .start(TriviaGame::new(5, 6, options, Arc::clone(&pool), Silent(tx.clone())))
            .await
            .ok()
            .unwrap();
        let second = registry
            .start(TriviaGame::new(5, 7, options, Arc::clone(&pool), Silent(tx)))
            .await
            .err()
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);

        loop {
            match rx.recv().await {
                Some(Announcement::FinalResults { leaderboard }) => {
                    assert_eq!(leaderboard, "No results.");
                    break;
                }
                Some(_) => continue,
                None => panic!("game ended without final results"),
            }
        }

        assert!(registry.get(5).await.is_none());
    }
}
