use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use mewdeko_database::Database;
use mewdeko_database::impls::timers::{delete_timer, due_timers};
use mewdeko_database::model::punishments::{PunishmentTimer, TimerKind};
use mewdeko_utils::time::now_unix_secs;

use crate::moderation::embeds::is_missing_permissions_error;

/// Reverse every timed punishment that has expired. A timer is dropped once
/// processed whether or not Discord accepted the reversal. Returns how many
/// timers were handled.
pub async fn process_due_timers(http: &serenity::Http, db: &Database) -> anyhow::Result<usize> {
    let timers = due_timers(db, now_unix_secs()).await?;
    let handled = timers.len();

    for timer in timers {
        if let Err(source) = reverse(http, &timer).await {
            if is_missing_permissions_error(&source) {
                warn!(
                    guild_id = timer.guild_id,
                    user_id = timer.user_id,
                    kind = timer.kind.as_str(),
                    "missing permissions to reverse timed punishment"
                );
            } else {
                error!(?source, kind = timer.kind.as_str(), "failed to reverse timed punishment");
            }
        }

        if let Err(source) = delete_timer(db, timer.id).await {
            error!(?source, timer_id = timer.id, "failed to delete punishment timer");
        }
    }

    if handled > 0 {
        info!(handled, "processed expired punishment timers");
    }

    Ok(handled)
}

async fn reverse(http: &serenity::Http, timer: &PunishmentTimer) -> Result<(), serenity::Error> {
    let guild_id = serenity::GuildId::new(timer.guild_id);
    let user_id = serenity::UserId::new(timer.user_id);

    match timer.kind {
        TimerKind::Unban => guild_id.unban(http, user_id).await,
        TimerKind::VoiceUnmute => guild_id
            .edit_member(http, user_id, serenity::EditMember::new().mute(false))
            .await
            .map(|_| ()),
        TimerKind::RemoveRole => {
            let Some(role_id) = timer.role_id else {
                warn!(timer_id = timer.id, "remove_role timer has no role");
                return Ok(());
            };
            http.remove_member_role(
                guild_id,
                user_id,
                serenity::RoleId::new(role_id),
                Some("Timed role expired"),
            )
            .await
        }
    }
}
