use crate::CommandMeta;
use crate::games::NO_TRIVIA_MESSAGE;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "tq",
    desc: "Stop the running trivia game after the current question.",
    category: "games",
    usage: "!tq",
};

#[poise::command(prefix_command, slash_command, category = "Games")]
pub async fn tq(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(game) = ctx.data().trivia.get(guild_id.get()).await else {
        ctx.say(NO_TRIVIA_MESSAGE).await?;
        return Ok(());
    };

    game.stop().await;

    // The game posts the stop notice in its own channel; slash invocations
    // still need an interaction response.
    if let poise::Context::Application(_) = ctx {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content("Trivia will stop after this question."),
        )
        .await?;
    }

    Ok(())
}
