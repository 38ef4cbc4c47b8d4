//! Trivia game engine: question judging, the timed round loop and the
//! per-guild registry of running games.

mod announcer;
mod discord;
mod game;
mod options;
mod pool;
mod question;
mod registry;

pub use announcer::{Announcement, DeliveryError, TriviaAnnouncer};
pub use discord::ChannelAnnouncer;
pub use game::TriviaGame;
pub use options::TriviaOptions;
pub use pool::QuestionPool;
pub use question::TriviaQuestion;
pub use registry::TriviaRegistry;
