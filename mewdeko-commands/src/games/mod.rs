pub mod poll;
pub mod pollend;
pub mod tl;
pub mod tq;
pub mod trivia;

pub use poll::handle_poll_button;
pub use trivia::handle_trivia_guess;

pub(crate) const NO_TRIVIA_MESSAGE: &str = "No trivia game is running in this server.";
