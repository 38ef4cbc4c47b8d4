pub mod guards;
pub mod polls;

use std::sync::Arc;

use mewdeko_database::Database;
use mewdeko_services::{ConverterService, RedditClient};
use mewdeko_trivia::{ChannelAnnouncer, QuestionPool, TriviaRegistry};

use crate::guards::{ActivePurges, SuppressedDeletes};
use crate::polls::PollRegistry;

pub type Error = anyhow::Error;

pub type TriviaGames = TriviaRegistry<ChannelAnnouncer>;

pub struct Data {
    pub db: Database,
    pub http_client: reqwest::Client,
    pub trivia: TriviaGames,
    pub trivia_questions: Arc<QuestionPool>,
    pub polls: PollRegistry,
    pub purges: ActivePurges,
    pub suppressed_deletes: SuppressedDeletes,
    pub converter: Arc<ConverterService>,
    pub reddit: Arc<RedditClient>,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data").finish_non_exhaustive()
    }
}
