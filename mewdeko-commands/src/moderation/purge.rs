use tokio::time::{Duration, sleep};
use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, invoking_message_id, usage_message};
use mewdeko_core::guards::SuppressedDeletes;
use mewdeko_core::{Context, Error};
use mewdeko_utils::permissions::has_user_permission;
use mewdeko_utils::purge::{PurgeFilter, purge_where};

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete recent messages in this channel, optionally only from one user.",
    category: "moderation",
    usage: "!purge <amount> [user]",
};

pub(crate) const MAX_PURGE: usize = 100;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge"] amount: Option<usize>,
    #[description = "Only delete this user's messages"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let filter = match user {
        Some(user) => PurgeFilter::User(user.id),
        None => PurgeFilter::All,
    };

    run_purge(ctx, amount, filter, META.usage).await
}

/// Shared body of the purge commands: checks, the per-guild guard, the
/// deletion itself and a short-lived confirmation.
pub(crate) async fn run_purge(
    ctx: Context<'_>,
    amount: Option<usize>,
    filter: PurgeFilter,
    usage: &str,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        return Ok(());
    }

    let Some(requested) = amount else {
        ctx.say(usage_message(usage)).await?;
        return Ok(());
    };

    if requested == 0 {
        ctx.say("Amount must be at least 1.").await?;
        return Ok(());
    }

    let Some(_guard) = ctx.data().purges.try_begin(guild_id.get()) else {
        ctx.say("A purge is already running in this server. Please wait for it to finish.")
            .await?;
        return Ok(());
    };

    let amount = requested.min(MAX_PURGE);
    let channel_id = ctx.channel_id();
    let invoking = invoking_message_id(ctx);

    let deleted = match purge_where(ctx.http(), channel_id, amount, &filter, invoking).await {
        Ok(deleted) => deleted,
        Err(source) => {
            error!(?source, "purge failed");
            ctx.say("I couldn't delete messages. I likely need the 'Manage Messages' permission.")
                .await?;
            return Ok(());
        }
    };

    info!(guild_id = %guild_id, channel_id = %channel_id, deleted, ?filter, "purged messages");

    if let Some(message_id) = suppress_invoking(&ctx.data().suppressed_deletes, invoking) {
        let _ = channel_id.delete_message(ctx.http(), message_id).await;
    }

    let confirmation = ctx.say(format!("Purged {deleted} message(s).")).await?;
    sleep(Duration::from_secs(3)).await;
    let _ = confirmation.message().await?.delete(ctx.http()).await;

    Ok(())
}

/// Mark the command message as a bot delete so it never shows up in snipes.
fn suppress_invoking(
    suppressed: &SuppressedDeletes,
    invoking: Option<serenity::MessageId>,
) -> Option<serenity::MessageId> {
    let message_id = invoking?;
    suppressed.suppress(message_id.get());
    Some(message_id)
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::suppress_invoking;
    use mewdeko_core::guards::SuppressedDeletes;

    #[test]
    fn command_message_is_hidden_from_snipes() {
        let suppressed = SuppressedDeletes::default();
        let invoking = serenity::MessageId::new(42);

        assert_eq!(suppress_invoking(&suppressed, Some(invoking)), Some(invoking));
        assert!(suppressed.take(42));
        assert_eq!(suppress_invoking(&suppressed, None), None);
    }
}
