use poise::serenity_prelude as serenity;

use mewdeko_commands::games::handle_poll_button;
use mewdeko_core::Data;

/// Poll vote buttons. Other component ids belong to the pagination and
/// confirmation collectors and are ignored here.
pub async fn handle_interaction(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::Interaction,
) {
    if let serenity::Interaction::Component(component) = interaction {
        handle_poll_button(ctx, data, component).await;
    }
}
