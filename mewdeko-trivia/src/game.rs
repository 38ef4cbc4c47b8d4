use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::sleep;
use tracing::warn;

use crate::announcer::{Announcement, DeliveryError, TriviaAnnouncer};
use crate::options::TriviaOptions;
use crate::pool::QuestionPool;
use crate::question::TriviaQuestion;

const BETWEEN_ROUNDS: Duration = Duration::from_secs(5);
const POST_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
struct Player {
    name: String,
    points: u32,
}

struct Round {
    question: TriviaQuestion,
    /// Guesses are only considered while the round is open.
    open: bool,
    answered: bool,
    /// Wakes the round loop when someone answers.
    answered_signal: Arc<Notify>,
}

#[derive(Default)]
struct GameState {
    round: Option<Round>,
    players: HashMap<u64, Player>,
    asked: HashSet<usize>,
}

/// One trivia game bound to a guild channel.
///
/// The state mutex doubles as the guess lock: a round is resolved by the
/// first correct guess that observes it open and unanswered.
pub struct TriviaGame<A> {
    guild_id: u64,
    channel_id: u64,
    options: TriviaOptions,
    pool: Arc<QuestionPool>,
    announcer: A,
    state: Mutex<GameState>,
    should_stop: AtomicBool,
}

impl<A: TriviaAnnouncer> TriviaGame<A> {
    pub fn new(
        guild_id: u64,
        channel_id: u64,
        options: TriviaOptions,
        pool: Arc<QuestionPool>,
        announcer: A,
    ) -> Self {
        Self {
            guild_id,
            channel_id,
            options: options.normalized(),
            pool,
            announcer,
            state: Mutex::new(GameState::default()),
            should_stop: AtomicBool::new(false),
        }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn options(&self) -> TriviaOptions {
        self.options
    }

    pub fn is_stopping(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }

    /// Play rounds until a stop condition is reached.
    pub async fn run(&self) {
        let mut show_quit_hint = false;
        let mut unanswered_rounds = 0_u32;

        while !self.is_stopping() {
            show_quit_hint = !show_quit_hint;

            let Some(question) = self.next_question().await else {
                self.announce(Announcement::FailedLoading).await;
                return;
            };

            let message_id = match self.announcer.post_question(&question, show_quit_hint).await {
                Ok(message_id) => message_id,
                Err(DeliveryError::Gone) => return,
                Err(DeliveryError::Other(source)) => {
                    warn!(?source, guild_id = self.guild_id, "failed to post trivia question");
                    sleep(POST_RETRY_DELAY).await;
                    continue;
                }
            };

            let answered_signal = self.open_round(question.clone()).await;
            let channel_gone = self
                .play_round(message_id, &question, &answered_signal)
                .await;
            let answered = self.close_round().await;

            if channel_gone {
                break;
            }

            if answered {
                unanswered_rounds = 0;
            } else {
                self.announce(Announcement::TimesUp(question)).await;
                unanswered_rounds += 1;
                if self.options.timeout != 0 && unanswered_rounds >= self.options.timeout {
                    self.stop().await;
                }
            }

            sleep(BETWEEN_ROUNDS).await;
        }
    }

    /// Wait out both halves of the round, editing in the hint between them.
    /// Returns `true` when the hint edit found the channel gone.
    async fn play_round(
        &self,
        message_id: u64,
        question: &TriviaQuestion,
        answered_signal: &Notify,
    ) -> bool {
        let half = self.options.half_round();

        tokio::select! {
            _ = answered_signal.notified() => return false,
            _ = sleep(half) => {}
        }

        if !self.options.no_hint {
            match self.announcer.show_hint(message_id, question).await {
                Ok(()) => {}
                Err(DeliveryError::Gone) => return true,
                Err(DeliveryError::Other(source)) => {
                    warn!(?source, guild_id = self.guild_id, "failed to edit trivia hint");
                }
            }
        }

        tokio::select! {
            _ = answered_signal.notified() => {}
            _ = sleep(half) => {}
        }

        false
    }

    async fn next_question(&self) -> Option<TriviaQuestion> {
        let mut state = self.state.lock().await;
        let (index, question) = self.pool.random_question(&state.asked)?;
        if !question.is_playable() {
            return None;
        }

        state.asked.insert(index);
        Some(question.clone())
    }

    async fn open_round(&self, question: TriviaQuestion) -> Arc<Notify> {
        let answered_signal = Arc::new(Notify::new());
        self.state.lock().await.round = Some(Round {
            question,
            open: true,
            answered: false,
            answered_signal: Arc::clone(&answered_signal),
        });
        answered_signal
    }

    async fn close_round(&self) -> bool {
        let mut state = self.state.lock().await;
        match state.round.as_mut() {
            Some(round) => {
                round.open = false;
                round.answered
            }
            None => false,
        }
    }

    /// Consider a chat message as a guess. Returns `true` if it scored.
    pub async fn guess(&self, user_id: u64, user_name: &str, content: &str) -> bool {
        let (question, points, answered_signal) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;

            let Some(round) = state.round.as_mut() else {
                return false;
            };

            if !round.open || round.answered || !round.question.is_answer_correct(content) {
                return false;
            }

            round.answered = true;

            let player = state.players.entry(user_id).or_insert_with(|| Player {
                name: user_name.to_owned(),
                points: 0,
            });
            player.points += 1;
            player.name = user_name.to_owned();

            (
                round.question.clone(),
                player.points,
                Arc::clone(&round.answered_signal),
            )
        };

        answered_signal.notify_one();

        let requirement = self.options.win_requirement;
        if requirement != 0 && points == requirement {
            self.should_stop.store(true, Ordering::SeqCst);
            self.announce(Announcement::Won { user_id, question }).await;
        } else {
            self.announce(Announcement::Correct { user_id, question })
                .await;
        }

        true
    }

    /// Stop after the current question. Only the first request is announced.
    pub async fn stop(&self) {
        if !self.should_stop.swap(true, Ordering::SeqCst) {
            self.announce(Announcement::Stopping).await;
        }
    }

    /// Stop the game and post the final standings.
    pub async fn ensure_stopped(&self) {
        self.should_stop.store(true, Ordering::SeqCst);
        let leaderboard = self.leaderboard().await;
        self.announce(Announcement::FinalResults { leaderboard })
            .await;
    }

    pub async fn leaderboard(&self) -> String {
        let state = self.state.lock().await;
        if state.players.is_empty() {
            return "No results.".to_owned();
        }

        let mut players: Vec<&Player> = state.players.values().collect();
        players.sort_by(|left, right| {
            right
                .points
                .cmp(&left.points)
                .then_with(|| left.name.cmp(&right.name))
        });

        players
            .into_iter()
            .map(|player| {
                let unit = if player.points == 1 { "point" } else { "points" };
                format!("**{}** has {} {}", player.name, player.points, unit)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn announce(&self, announcement: Announcement) {
        if let Err(source) = self.announcer.announce(announcement).await {
            warn!(?source, guild_id = self.guild_id, "failed to send trivia announcement");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::TriviaGame;
    use crate::announcer::{Announcement, DeliveryError, TriviaAnnouncer};
    use crate::options::TriviaOptions;
    use crate::pool::QuestionPool;
    use crate::question::TriviaQuestion;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Posted { quit_hint: bool },
        Hint,
        Announced(Announcement),
    }

    struct RecordingAnnouncer {
        events: mpsc::UnboundedSender<Event>,
        channel_gone: AtomicBool,
    }

    impl TriviaAnnouncer for RecordingAnnouncer {
        async fn post_question(
            &self,
            _question: &TriviaQuestion,
            show_quit_hint: bool,
        ) -> Result<u64, DeliveryError> {
            if self.channel_gone.load(Ordering::SeqCst) {
                return Err(DeliveryError::Gone);
            }
            let _ = self.events.send(Event::Posted {
                quit_hint: show_quit_hint,
            });
            Ok(1)
        }

        async fn show_hint(
            &self,
            _message_id: u64,
            _question: &TriviaQuestion,
        ) -> Result<(), DeliveryError> {
            let _ = self.events.send(Event::Hint);
            Ok(())
        }

        async fn announce(&self, announcement: Announcement) -> Result<(), DeliveryError> {
            let _ = self.events.send(Event::Announced(announcement));
            Ok(())
        }
    }

    fn capital() -> TriviaQuestion {
        TriviaQuestion::new("Geography", "Capital of France?", "Paris")
    }

    fn game(
        options: TriviaOptions,
    ) -> (
        Arc<TriviaGame<RecordingAnnouncer>>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let announcer = RecordingAnnouncer {
            events: tx,
            channel_gone: AtomicBool::new(false),
        };
        let pool = Arc::new(QuestionPool::from_questions(vec![capital()]));
        (Arc::new(TriviaGame::new(1, 2, options, pool, announcer)), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_rounds_time_out_the_game() {
        let (game, mut rx) = game(TriviaOptions {
            timeout: 2,
            question_timer: 10,
            ..Default::default()
        });

        game.run().await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Event::Posted { quit_hint: true },
                Event::Hint,
                Event::Announced(Announcement::TimesUp(capital())),
                Event::Posted { quit_hint: false },
                Event::Hint,
                Event::Announced(Announcement::TimesUp(capital())),
                Event::Announced(Announcement::Stopping),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_correct_guess_wins_the_round_once() {
        let (game, mut rx) = game(TriviaOptions {
            timeout: 0,
            win_requirement: 0,
            ..Default::default()
        });

        let runner = tokio::spawn({
            let game = Arc::clone(&game);
            async move { game.run().await }
        });

        assert_eq!(rx.recv().await, Some(Event::Posted { quit_hint: true }));
        assert!(!game.guess(10, "alice", "London").await);
        assert!(game.guess(10, "alice", "paris").await);
        assert!(!game.guess(11, "bob", "Paris").await);

        assert_eq!(
            rx.recv().await,
            Some(Event::Announced(Announcement::Correct {
                user_id: 10,
                question: capital(),
            }))
        );

        // The round ends early: no hint and no time's up follow.
        assert_eq!(rx.recv().await, Some(Event::Posted { quit_hint: false }));

        game.stop().await;
        game.stop().await;
        runner.await.unwrap();

        let rest = drain(&mut rx);
        assert_eq!(
            rest.iter()
                .filter(|event| **event == Event::Announced(Announcement::Stopping))
                .count(),
            1
        );
        assert_eq!(game.leaderboard().await, "**alice** has 1 point");
    }

    #[tokio::test(start_paused = true)]
    async fn reaching_the_win_requirement_ends_the_game() {
        let (game, mut rx) = game(TriviaOptions {
            win_requirement: 1,
            no_hint: true,
            ..Default::default()
        });

        let runner = tokio::spawn({
            let game = Arc::clone(&game);
            async move { game.run().await }
        });

        assert_eq!(rx.recv().await, Some(Event::Posted { quit_hint: true }));
        assert!(game.guess(7, "carol", "Paris").await);
        runner.await.unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![Event::Announced(Announcement::Won {
                user_id: 7,
                question: capital(),
            })]
        );
        assert!(game.is_stopping());
    }

    #[tokio::test(start_paused = true)]
    async fn guesses_after_the_round_closes_never_score() {
        let (game, mut rx) = game(TriviaOptions {
            timeout: 1,
            no_hint: true,
            ..Default::default()
        });

        game.run().await;
        assert!(!game.guess(1, "late", "Paris").await);

        let events = drain(&mut rx);
        assert!(!events.contains(&Event::Hint));
        assert_eq!(game.leaderboard().await, "No results.");
    }

    #[tokio::test(start_paused = true)]
    async fn gone_channel_ends_the_game_silently() {
        let (game, mut rx) = game(TriviaOptions::default());
        game.announcer.channel_gone.store(true, Ordering::SeqCst);

        tokio::time::timeout(Duration::from_secs(1), game.run())
            .await
            .expect("game should end immediately");

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_questions_fail_loading() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let announcer = RecordingAnnouncer {
            events: tx,
            channel_gone: AtomicBool::new(false),
        };
        let pool = Arc::new(QuestionPool::from_questions(vec![TriviaQuestion::new(
            "Broken", "", "",
        )]));
        let game = TriviaGame::new(1, 2, TriviaOptions::default(), pool, announcer);

        game.run().await;
        game.ensure_stopped().await;

        assert_eq!(
            drain(&mut rx),
            vec![
                Event::Announced(Announcement::FailedLoading),
                Event::Announced(Announcement::FinalResults {
                    leaderboard: "No results.".to_owned(),
                }),
            ]
        );
    }
}
