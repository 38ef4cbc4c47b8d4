use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::DEFAULT_EMBED_COLOR;

pub const PAGINATION_TIMEOUT_SECS: u64 = 60 * 3;

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Half-open `(start, end)` item range for a 1-based `page`.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

/// Join lines into page bodies of `per_page` lines each.
pub fn chunk_lines(lines: &[String], per_page: usize) -> Vec<String> {
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

fn page_embed(
    title: &str,
    description: &str,
    page: usize,
    total_pages: usize,
    author_icon_url: Option<&str>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description.to_owned());

    if total_pages > 1 {
        embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            page + 1,
            total_pages
        )));
    }

    match author_icon_url {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(title).icon_url(url)),
        None => embed.title(title.to_owned()),
    }
}

struct PageButtons {
    first: String,
    prev: String,
    next: String,
    last: String,
}

impl PageButtons {
    fn new(ctx_id: u64) -> Self {
        Self {
            first: format!("{ctx_id}_first"),
            prev: format!("{ctx_id}_prev"),
            next: format!("{ctx_id}_next"),
            last: format!("{ctx_id}_last"),
        }
    }

    fn row(&self, current_page: usize, total_pages: usize) -> Vec<serenity::CreateActionRow> {
        let at_start = current_page == 0;
        let at_end = current_page + 1 >= total_pages;
        let button = |id: &str, label: &str, disabled: bool| {
            serenity::CreateButton::new(id)
                .label(label)
                .disabled(disabled)
                .style(serenity::ButtonStyle::Secondary)
        };

        vec![serenity::CreateActionRow::Buttons(vec![
            button(&self.first, "<<", at_start),
            button(&self.prev, "<", at_start),
            button(&self.next, ">", at_end),
            button(&self.last, ">>", at_end),
        ])]
    }

    /// Page index after pressing `custom_id`, or `None` for a foreign button.
    fn target(&self, custom_id: &str, current_page: usize, total_pages: usize) -> Option<usize> {
        let last_page = total_pages.saturating_sub(1);
        if custom_id == self.first {
            Some(0)
        } else if custom_id == self.prev {
            Some(current_page.saturating_sub(1))
        } else if custom_id == self.next {
            Some((current_page + 1).min(last_page))
        } else if custom_id == self.last {
            Some(last_page)
        } else {
            None
        }
    }
}

pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    paginate_embed_pages_with_icon(ctx, title, pages, start_page, None).await
}

/// Send `pages` as one embed with first/prev/next/last buttons. Only the
/// invoking author can turn pages; the buttons are removed after
/// [`PAGINATION_TIMEOUT_SECS`] of inactivity.
pub async fn paginate_embed_pages_with_icon<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    author_icon_url: Option<&str>,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total_pages = pages.len();
    let mut current_page = start_page.clamp(1, total_pages) - 1;
    let render =
        |page: usize| page_embed(title, &pages[page], page, total_pages, author_icon_url);

    if total_pages == 1 {
        ctx.send(poise::CreateReply::default().embed(render(current_page)))
            .await?;
        return Ok(());
    }

    let ctx_id = ctx.id();
    let buttons = PageButtons::new(ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(render(current_page))
                .components(buttons.row(current_page, total_pages)),
        )
        .await?;

    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .filter({
            let prefix = ctx_id.to_string();
            let author_id = ctx.author().id;
            move |interaction| {
                interaction.data.custom_id.starts_with(&prefix)
                    && interaction.user.id == author_id
                    && interaction.message.id == message_id
            }
        })
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        let Some(target) = buttons.target(&press.data.custom_id, current_page, total_pages) else {
            continue;
        };
        current_page = target;

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(render(current_page))
                        .components(buttons.row(current_page, total_pages)),
                ),
            )
            .await?;
    }

    let _ = channel_id
        .edit_message(
            ctx.http(),
            message_id,
            serenity::EditMessage::new()
                .embed(render(current_page))
                .components(vec![]),
        )
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PageButtons, chunk_lines, page_window, total_pages};

    #[test]
    fn windows_cover_every_item_once() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(page_window(21, 10, 1), (0, 10));
        assert_eq!(page_window(21, 10, 3), (20, 21));
        assert_eq!(page_window(21, 10, 9), (21, 21));
    }

    #[test]
    fn lines_are_grouped_per_page() {
        let lines: Vec<String> = (1..=5).map(|n| n.to_string()).collect();
        assert_eq!(chunk_lines(&lines, 2), vec!["1\n2", "3\n4", "5"]);
    }

    #[test]
    fn buttons_move_within_bounds() {
        let buttons = PageButtons::new(7);
        assert_eq!(buttons.target("7_next", 2, 3), Some(2));
        assert_eq!(buttons.target("7_prev", 0, 3), Some(0));
        assert_eq!(buttons.target("7_last", 0, 3), Some(2));
        assert_eq!(buttons.target("7_first", 2, 3), Some(0));
        assert_eq!(buttons.target("8_next", 0, 3), None);
    }
}
