use std::sync::Arc;

use poise::serenity_prelude as serenity;

use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, ERROR_EMBED_COLOR};

use crate::announcer::{Announcement, DeliveryError, TriviaAnnouncer};
use crate::question::TriviaQuestion;

const TITLE: &str = "Trivia Game";

/// Posts a game's output into a guild text channel.
#[derive(Clone)]
pub struct ChannelAnnouncer {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    quit_command: String,
}

impl ChannelAnnouncer {
    pub fn new(
        http: Arc<serenity::Http>,
        channel_id: serenity::ChannelId,
        quit_command: impl Into<String>,
    ) -> Self {
        Self {
            http,
            channel_id,
            quit_command: quit_command.into(),
        }
    }

    fn question_embed(&self, question: &TriviaQuestion, footer: Option<String>) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new()
            .title(TITLE)
            .color(DEFAULT_EMBED_COLOR)
            .field("Category", &question.category, false)
            .field("Question", &question.question, false);

        if let Some(url) = question.image_url.as_deref().filter(|url| is_absolute_url(url)) {
            embed = embed.image(url);
        }

        if let Some(footer) = footer {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }

        embed
    }

    fn quit_footer(&self) -> String {
        format!("Type {} to quit trivia.", self.quit_command)
    }

    async fn send(&self, embed: serenity::CreateEmbed) -> Result<(), DeliveryError> {
        self.channel_id
            .send_message(self.http.as_ref(), serenity::CreateMessage::new().embed(embed))
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

fn answer_embed(color: u32, description: String, question: &TriviaQuestion) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title(TITLE)
        .color(color)
        .description(description);

    match question
        .answer_image_url
        .as_deref()
        .filter(|url| is_absolute_url(url))
    {
        Some(url) => embed.image(url),
        None => embed,
    }
}

impl TriviaAnnouncer for ChannelAnnouncer {
    async fn post_question(
        &self,
        question: &TriviaQuestion,
        show_quit_hint: bool,
    ) -> Result<u64, DeliveryError> {
        let footer = show_quit_hint.then(|| self.quit_footer());
        let message = self
            .channel_id
            .send_message(
                self.http.as_ref(),
                serenity::CreateMessage::new().embed(self.question_embed(question, footer)),
            )
            .await
            .map_err(classify)?;

        Ok(message.id.get())
    }

    async fn show_hint(&self, message_id: u64, question: &TriviaQuestion) -> Result<(), DeliveryError> {
        self.channel_id
            .edit_message(
                self.http.as_ref(),
                serenity::MessageId::new(message_id),
                serenity::EditMessage::new().embed(self.question_embed(question, Some(question.hint()))),
            )
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn announce(&self, announcement: Announcement) -> Result<(), DeliveryError> {
        let embed = match announcement {
            Announcement::FailedLoading => serenity::CreateEmbed::new()
                .title(TITLE)
                .color(ERROR_EMBED_COLOR)
                .description("Failed loading a question."),
            Announcement::TimesUp(question) => answer_embed(
                ERROR_EMBED_COLOR,
                format!("Time's up! The correct answer was **{}**", question.answer),
                &question,
            ),
            Announcement::Correct { user_id, question } => answer_embed(
                DEFAULT_EMBED_COLOR,
                format!("<@{user_id}> guessed it! The answer was: **{}**", question.answer),
                &question,
            ),
            Announcement::Won { user_id, question } => answer_embed(
                DEFAULT_EMBED_COLOR,
                format!(
                    "<@{user_id}> guessed it and WON the game! The answer was: **{}**",
                    question.answer
                ),
                &question,
            ),
            Announcement::Stopping => serenity::CreateEmbed::new()
                .title(TITLE)
                .color(DEFAULT_EMBED_COLOR)
                .description("Stopping after this question."),
            Announcement::FinalResults { leaderboard } => serenity::CreateEmbed::new()
                .author(serenity::CreateEmbedAuthor::new("Trivia Game Ended"))
                .title("Final Results")
                .color(DEFAULT_EMBED_COLOR)
                .description(leaderboard),
        };

        self.send(embed).await
    }
}

fn is_absolute_url(raw: &str) -> bool {
    raw.starts_with("https://") || raw.starts_with("http://")
}

/// 404, 403 and 400 mean the channel or message is unusable for good.
fn classify(source: serenity::Error) -> DeliveryError {
    if let serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) = &source
        && matches!(response.status_code.as_u16(), 400 | 403 | 404)
    {
        return DeliveryError::Gone;
    }

    DeliveryError::Other(source.into())
}
