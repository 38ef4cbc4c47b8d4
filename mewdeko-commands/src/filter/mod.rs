pub mod matching;
pub mod pipeline;

pub mod autobanword;
pub mod filterinvites;
pub mod filterlinks;
pub mod filterwords;
pub mod staffrole;

pub use pipeline::run_filters;

use mewdeko_core::{Context, Error};
use mewdeko_utils::embed::confirm_embed;

/// Reply to a filter toggle with its new state.
pub(crate) async fn toggle_reply(
    ctx: Context<'_>,
    feature: &str,
    scope: &str,
    enabled: bool,
) -> Result<(), Error> {
    let state = if enabled { "enabled" } else { "disabled" };
    ctx.send(poise::CreateReply::default().embed(confirm_embed(format!(
        "{feature} is now **{state}** in {scope}."
    ))))
    .await?;

    Ok(())
}
