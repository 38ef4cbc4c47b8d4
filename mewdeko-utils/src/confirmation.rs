use std::time::Duration;

use poise::serenity_prelude as serenity;

pub const CONFIRMATION_TIMEOUT_SECS: u64 = 30;

/// Ask the invoking author to confirm a destructive action.
///
/// Returns `true` only when the author pressed "Confirm" before the timeout.
/// The prompt's buttons are removed once it resolves.
pub async fn confirm_action<U, E>(
    ctx: poise::Context<'_, U, E>,
    prompt: serenity::CreateEmbed,
) -> Result<bool, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{ctx_id}_confirm");
    let decline_id = format!("{ctx_id}_decline");

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(prompt)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new(&confirm_id)
                        .label("Confirm")
                        .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(&decline_id)
                        .label("Cancel")
                        .style(serenity::ButtonStyle::Secondary),
                ])]),
        )
        .await?;

    let message = reply.message().await?.into_owned();
    let press = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(Duration::from_secs(CONFIRMATION_TIMEOUT_SECS))
        .await;

    let (confirmed, note) = match &press {
        Some(interaction) if interaction.data.custom_id == confirm_id => (true, "Confirmed."),
        Some(_) => (false, "Cancelled."),
        None => (false, "Timed out."),
    };

    match press {
        Some(interaction) => {
            interaction
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(note)
                            .components(vec![]),
                    ),
                )
                .await?;
        }
        None => {
            message
                .channel_id
                .edit_message(
                    ctx.http(),
                    message.id,
                    serenity::EditMessage::new().content(note).components(vec![]),
                )
                .await?;
        }
    }

    Ok(confirmed)
}
