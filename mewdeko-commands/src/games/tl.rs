use crate::CommandMeta;
use crate::games::NO_TRIVIA_MESSAGE;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::titled_embed;

pub const META: CommandMeta = CommandMeta {
    name: "tl",
    desc: "Show the running trivia game's leaderboard.",
    category: "games",
    usage: "!tl",
};

#[poise::command(prefix_command, slash_command, category = "Games")]
pub async fn tl(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(game) = ctx.data().trivia.get(guild_id.get()).await else {
        ctx.say(NO_TRIVIA_MESSAGE).await?;
        return Ok(());
    };

    let embed = titled_embed("Leaderboard", game.leaderboard().await);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
