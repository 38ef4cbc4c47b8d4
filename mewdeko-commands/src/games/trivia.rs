use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Data, Error};
use mewdeko_trivia::{ChannelAnnouncer, TriviaGame, TriviaOptions};
use mewdeko_utils::embed::{error_embed, titled_embed};

pub const META: CommandMeta = CommandMeta {
    name: "trivia",
    desc: "Start a trivia game in this channel.",
    category: "games",
    usage: "!trivia [nohint] [win_requirement] [question_timer] [timeout]",
};

const QUIT_COMMAND: &str = "!tq";

#[poise::command(prefix_command, slash_command, category = "Games", aliases("t"))]
pub async fn trivia(
    ctx: Context<'_>,
    #[description = "Skip the hint halfway through each question"] nohint: Option<bool>,
    #[description = "Points needed to win (0 plays until stopped)"] win_requirement: Option<u32>,
    #[description = "Seconds per question (10-300)"] question_timer: Option<u64>,
    #[description = "Unanswered questions before the game stops (0 never stops)"]
    timeout: Option<u32>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let data = ctx.data();
    if data.trivia_questions.is_empty() {
        ctx.send(poise::CreateReply::default().embed(error_embed(
            "No trivia questions are loaded.",
        )))
        .await?;
        return Ok(());
    }

    let defaults = TriviaOptions::default();
    let options = TriviaOptions {
        no_hint: nohint.unwrap_or(defaults.no_hint),
        win_requirement: win_requirement.unwrap_or(defaults.win_requirement),
        question_timer: question_timer.unwrap_or(defaults.question_timer),
        timeout: timeout.unwrap_or(defaults.timeout),
    }
    .normalized();

    let announcer = ChannelAnnouncer::new(
        ctx.serenity_context().http.clone(),
        ctx.channel_id(),
        QUIT_COMMAND,
    );
    let game = TriviaGame::new(
        guild_id.get(),
        ctx.channel_id().get(),
        options,
        data.trivia_questions.clone(),
        announcer,
    );

    let embed = match data.trivia.start(game).await {
        Ok(_) => titled_embed("Trivia Game", start_description(options)),
        Err(running) => titled_embed(
            "Trivia Game",
            format!(
                "A trivia game is already running in <#{}>.\n\n{}",
                running.channel_id(),
                running.leaderboard().await
            ),
        ),
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn start_description(options: TriviaOptions) -> String {
    let win = match options.win_requirement {
        0 => "Play until stopped".to_owned(),
        points => format!("First to **{points}** point(s) wins"),
    };
    let timeout = match options.timeout {
        0 => "Unanswered questions never end the game.".to_owned(),
        rounds => format!("The game stops after {rounds} unanswered question(s) in a row."),
    };
    let hints = if options.no_hint { "off" } else { "on" };

    format!(
        "Starting trivia!\n{win}.\nEach question lasts **{}s**, hints are **{hints}**.\n{timeout}",
        options.question_timer
    )
}

/// Feed a guild message to that guild's running game, if any.
pub async fn handle_trivia_guess(data: &Data, message: &serenity::Message) {
    let Some(guild_id) = guess_guild(message.author.bot, message.guild_id) else {
        return;
    };

    let Some(game) = data.trivia.get(guild_id.get()).await else {
        return;
    };

    game.guess(
        message.author.id.get(),
        message.author.display_name(),
        &message.content,
    )
    .await;
}

/// The guild whose game a message may answer. Any channel in the guild
/// counts; bots never guess.
fn guess_guild(
    author_bot: bool,
    guild_id: Option<serenity::GuildId>,
) -> Option<serenity::GuildId> {
    if author_bot { None } else { guild_id }
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{guess_guild, start_description};
    use mewdeko_trivia::TriviaOptions;

    #[test]
    fn describes_default_options() {
        let description = start_description(TriviaOptions::default());
        assert!(description.contains("First to **10** point(s) wins"));
        assert!(description.contains("**30s**"));
        assert!(description.contains("hints are **on**"));
        assert!(description.contains("after 10 unanswered question(s) in a row"));
    }

    #[test]
    fn describes_unlimited_games() {
        let description = start_description(TriviaOptions {
            no_hint: true,
            win_requirement: 0,
            question_timer: 45,
            timeout: 0,
        });
        assert!(description.contains("Play until stopped"));
        assert!(description.contains("hints are **off**"));
        assert!(description.ends_with("Unanswered questions never end the game."));
    }

    #[test]
    fn guesses_come_from_humans_in_a_guild() {
        let guild = serenity::GuildId::new(7);

        assert_eq!(guess_guild(false, Some(guild)), Some(guild));
        assert_eq!(guess_guild(true, Some(guild)), None);
        assert_eq!(guess_guild(false, None), None);
    }
}
