use std::fmt;
use std::future::Future;

use crate::question::TriviaQuestion;

/// Why a message could not be delivered.
#[derive(Debug)]
pub enum DeliveryError {
    /// The channel or message no longer accepts our writes (deleted,
    /// missing access, bad request). The game cannot continue.
    Gone,
    /// Anything else; the round is retried.
    Other(anyhow::Error),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gone => f.write_str("trivia channel is gone"),
            Self::Other(source) => write!(f, "trivia delivery failed: {source}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Game events shown to players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    FailedLoading,
    TimesUp(TriviaQuestion),
    Correct {
        user_id: u64,
        question: TriviaQuestion,
    },
    Won {
        user_id: u64,
        question: TriviaQuestion,
    },
    Stopping,
    FinalResults {
        leaderboard: String,
    },
}

/// Where a game sends its output. The engine never talks to Discord directly.
pub trait TriviaAnnouncer: Send + Sync + 'static {
    /// Post a question and return the id of the posted message.
    fn post_question(
        &self,
        question: &TriviaQuestion,
        show_quit_hint: bool,
    ) -> impl Future<Output = Result<u64, DeliveryError>> + Send;

    /// Edit the hint into a previously posted question.
    fn show_hint(
        &self,
        message_id: u64,
        question: &TriviaQuestion,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    fn announce(
        &self,
        announcement: Announcement,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
