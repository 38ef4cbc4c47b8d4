use poise::serenity_prelude as serenity;
use tracing::warn;

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use mewdeko_core::polls::Poll;
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::{error_embed, sanitize_mentions, titled_embed};

pub const META: CommandMeta = CommandMeta {
    name: "pollend",
    desc: "End the running poll and show its results.",
    category: "games",
    usage: "!pollend",
};

#[poise::command(prefix_command, slash_command, category = "Games")]
pub async fn pollend(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let Some(poll) = ctx.data().polls.end(guild_id.get()).await else {
        ctx.send(poise::CreateReply::default().embed(error_embed("No poll is running in this server.")))
            .await?;
        return Ok(());
    };

    if poll.message_id != 0 {
        let cleared = serenity::ChannelId::new(poll.channel_id)
            .edit_message(
                ctx.http(),
                serenity::MessageId::new(poll.message_id),
                serenity::EditMessage::new().components(Vec::new()),
            )
            .await;
        if let Err(source) = cleared {
            warn!(?source, "failed to remove poll buttons");
        }
    }

    let embed = titled_embed(
        &format!("Results: {}", sanitize_mentions(&poll.question)),
        results_description(&poll),
    )
    .footer(serenity::CreateEmbedFooter::new(format!(
        "{} vote(s) in total",
        poll.total_votes()
    )));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn results_description(poll: &Poll) -> String {
    poll.results()
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "`{}.` **{}** - {} vote(s) ({:.1}%)",
                index + 1,
                sanitize_mentions(&result.option),
                result.votes,
                result.percent
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::results_description;
    use mewdeko_core::polls::{Poll, PollType};

    #[test]
    fn lists_votes_and_percentages() {
        let mut poll = Poll::new(
            "Tea or coffee?".to_owned(),
            vec!["tea".to_owned(), "coffee".to_owned()],
            PollType::SingleAnswer,
        );
        poll.vote(1, 0);
        poll.vote(2, 0);
        poll.vote(3, 1);

        assert_eq!(
            results_description(&poll),
            "`1.` **tea** - 2 vote(s) (66.7%)\n`2.` **coffee** - 1 vote(s) (33.3%)"
        );
    }
}
