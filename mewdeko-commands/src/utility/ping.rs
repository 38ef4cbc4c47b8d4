use std::time::Instant;

use mewdeko_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Show gateway and round-trip latency.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let gateway = ctx.ping().await;
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let round_trip = started.elapsed();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!(
                "Pong! Gateway: {}ms | Round trip: {}ms",
                gateway.as_millis(),
                round_trip.as_millis()
            )),
        )
        .await?;
    Ok(())
}
