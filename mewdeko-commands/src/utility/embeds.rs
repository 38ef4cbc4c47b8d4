use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use mewdeko_utils::embed::DEFAULT_EMBED_COLOR;
use mewdeko_utils::formatting::{display_category, truncate_chars};

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category or command: {}\nValid categories: {}",
        wanted_category, valid
    )
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

/// Usage card for a single command.
pub fn command_card(command: &CommandMeta) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("!{}", command.name))
        .description(command.desc)
        .field("Usage", format!("`{}`", command.usage), false)
        .field("Module", display_category(command.category), true)
}

/// One line per search hit with the description cut short.
pub fn search_result_line(command: &CommandMeta) -> String {
    format!("`{}`: {}", command.name, truncate_chars(command.desc, 50))
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, search_result_line};
    use crate::CommandMeta;

    const A: CommandMeta = CommandMeta {
        name: "ping",
        desc: "Replies with the gateway latency.",
        category: "utility",
        usage: "!ping",
    };
    const B: CommandMeta = CommandMeta {
        name: "warn",
        desc: "Warn a user. Reaching a configured warning count applies a punishment.",
        category: "moderation",
        usage: "!warn <user> [reason]",
    };

    #[test]
    fn groups_under_category_headings() {
        let text = grouped_help_description(&[&B, &A]);
        assert_eq!(
            text,
            "**Moderation**\n`warn`: Warn a user. Reaching a configured warning count applies a punishment.\n\n**Utility**\n`ping`: Replies with the gateway latency."
        );
        assert_eq!(grouped_help_description(&[]), "No commands available.");
    }

    #[test]
    fn search_lines_truncate_descriptions() {
        assert_eq!(
            search_result_line(&B),
            "`warn`: Warn a user. Reaching a configured warning coun..."
        );
    }
}
