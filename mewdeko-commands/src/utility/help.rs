use crate::utility::embeds::{
    command_card, grouped_help_description, page_out_of_range_message, unknown_category_message,
};
use crate::{COMMANDS, CommandMeta, find_command};
use mewdeko_core::{Context, Error};
use mewdeko_utils::pagination::{page_window, paginate_embed_pages, total_pages};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List commands, a module's commands, or one command's usage.",
    category: "utility",
    usage: "!help [page|module|command]",
};

const HELP_COMMANDS_PER_PAGE: usize = 20;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number, module or command"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));

    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };

    if let Some(wanted) = category.as_deref() {
        let categories = categories();
        if !categories.contains(&wanted) {
            match find_command(wanted) {
                Some(command) => {
                    ctx.send(poise::CreateReply::default().embed(command_card(command)))
                        .await?;
                }
                None => {
                    ctx.say(unknown_category_message(wanted, &categories)).await?;
                }
            }
            return Ok(());
        }
    }

    let commands = sorted_commands(category.as_deref());
    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total)).await?;
        return Ok(());
    }

    let pages = (1..=total)
        .map(|page| {
            let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
            grouped_help_description(&commands[start..end])
        })
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "Available Commands", &pages, requested_page).await?;
    Ok(())
}

/// Every module name, sorted and deduplicated.
pub(crate) fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::{categories, sorted_commands};

    #[test]
    fn every_category_lists_its_commands_sorted() {
        for category in categories() {
            let commands = sorted_commands(Some(category));
            assert!(!commands.is_empty());
            assert!(commands.windows(2).all(|pair| pair[0].name <= pair[1].name));
        }
    }
}
