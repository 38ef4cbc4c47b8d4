use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::CommandMeta;
use crate::checks::guild_with_permission;
use crate::moderation::embeds::usage_message;
use mewdeko_core::polls::{POLL_BUTTON_PREFIX, Poll, PollType, parse_poll_button, parse_poll_input};
use mewdeko_core::{Context, Data, Error};
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, error_embed, sanitize_mentions};

pub const META: CommandMeta = CommandMeta {
    name: "poll",
    desc: "Start a button poll. Separate the question and 2-10 options with `;`.",
    category: "games",
    usage: "!poll [single|allowchange|multi] <question;option1;option2;...>",
};

const BUTTONS_PER_ROW: usize = 5;

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum PollKind {
    #[name = "single"]
    Single,
    #[name = "allowchange"]
    AllowChange,
    #[name = "multi"]
    Multi,
}

impl From<PollKind> for PollType {
    fn from(kind: PollKind) -> Self {
        match kind {
            PollKind::Single => PollType::SingleAnswer,
            PollKind::AllowChange => PollType::AllowChange,
            PollKind::Multi => PollType::MultiAnswer,
        }
    }
}

#[poise::command(prefix_command, slash_command, category = "Games")]
pub async fn poll(
    ctx: Context<'_>,
    #[description = "How votes work (defaults to single)"] kind: Option<PollKind>,
    #[description = "question;option1;option2;..."]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guild_with_permission(ctx, serenity::Permissions::MANAGE_MESSAGES).await?
    else {
        return Ok(());
    };

    let Some((question, options)) = input.as_deref().and_then(parse_poll_input) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let poll_type = kind.map_or(PollType::SingleAnswer, PollType::from);
    let poll = Poll::new(question, options, poll_type);
    let embed = poll_embed(&poll);
    let components = poll_buttons(poll.options.len());

    let polls = &ctx.data().polls;
    if !polls.create(guild_id.get(), poll).await {
        let embed = error_embed("A poll is already running in this server. End it with `!pollend`.");
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let reply = match ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(components),
        )
        .await
    {
        Ok(reply) => reply,
        Err(source) => {
            polls.end(guild_id.get()).await;
            return Err(source.into());
        }
    };

    match reply.message().await {
        Ok(message) => {
            polls
                .set_message(guild_id.get(), message.channel_id.get(), message.id.get())
                .await;
        }
        Err(source) => warn!(?source, "failed to resolve poll message"),
    }

    info!(guild_id = %guild_id, ?poll_type, "poll started");
    Ok(())
}

fn poll_embed(poll: &Poll) -> serenity::CreateEmbed {
    let options = poll
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| format!("`{}.` {}", index + 1, sanitize_mentions(option)))
        .collect::<Vec<_>>()
        .join("\n");

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(sanitize_mentions(&poll.question))
        .description(options)
        .footer(serenity::CreateEmbedFooter::new(type_footer(poll.poll_type)))
}

fn type_footer(poll_type: PollType) -> &'static str {
    match poll_type {
        PollType::SingleAnswer => "One vote per person. Votes are final.",
        PollType::AllowChange => "One vote per person. Press another option to change it.",
        PollType::MultiAnswer => "Vote for as many options as you like. Press again to remove.",
        PollType::PollEnded => "This poll has ended.",
    }
}

/// One numbered button per option, five to a row.
fn poll_buttons(option_count: usize) -> Vec<serenity::CreateActionRow> {
    (1..=option_count)
        .map(|number| {
            serenity::CreateButton::new(format!("{POLL_BUTTON_PREFIX}{number}"))
                .label(number.to_string())
                .style(serenity::ButtonStyle::Primary)
        })
        .collect::<Vec<_>>()
        .chunks(BUTTONS_PER_ROW)
        .map(|row| serenity::CreateActionRow::Buttons(row.to_vec()))
        .collect()
}

fn vote_reply(allowed: bool, poll_type: PollType) -> &'static str {
    match (poll_type, allowed) {
        (PollType::PollEnded, _) => "That poll has already ended!",
        (PollType::SingleAnswer, true) => "Voted!",
        (PollType::SingleAnswer, false) => "You can't change your vote!",
        (PollType::AllowChange, true) => "Vote changed.",
        (PollType::AllowChange, false) => "That's already your vote!",
        (PollType::MultiAnswer, true) => "Vote added!",
        (PollType::MultiAnswer, false) => "Removed that vote!",
    }
}

/// Record a vote from a poll button press and answer it privately.
pub async fn handle_poll_button(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) {
    let Some(index) = parse_poll_button(&interaction.data.custom_id) else {
        return;
    };

    let Some(guild_id) = interaction.guild_id else {
        return;
    };

    let (allowed, poll_type) = data
        .polls
        .try_vote(guild_id.get(), index, interaction.user.id.get())
        .await;

    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(vote_reply(allowed, poll_type))
            .ephemeral(true),
    );

    if let Err(source) = interaction.create_response(ctx, response).await {
        warn!(?source, "failed to answer poll vote");
    }
}

#[cfg(test)]
mod tests {
    use super::{poll_buttons, vote_reply};
    use mewdeko_core::polls::PollType;

    #[test]
    fn buttons_wrap_after_five() {
        assert_eq!(poll_buttons(2).len(), 1);
        assert_eq!(poll_buttons(5).len(), 1);
        assert_eq!(poll_buttons(6).len(), 2);
        assert_eq!(poll_buttons(10).len(), 2);
    }

    #[test]
    fn vote_replies_follow_the_poll_type() {
        assert_eq!(vote_reply(true, PollType::SingleAnswer), "Voted!");
        assert_eq!(
            vote_reply(false, PollType::SingleAnswer),
            "You can't change your vote!"
        );
        assert_eq!(vote_reply(false, PollType::AllowChange), "That's already your vote!");
        assert_eq!(vote_reply(false, PollType::MultiAnswer), "Removed that vote!");
        assert_eq!(vote_reply(true, PollType::PollEnded), "That poll has already ended!");
    }
}
