use crate::moderation::embeds::usage_message;
use crate::utility::embeds::search_result_line;
use crate::{COMMANDS, CommandMeta};
use mewdeko_core::{Context, Error};
use mewdeko_utils::pagination::{chunk_lines, paginate_embed_pages};

pub const META: CommandMeta = CommandMeta {
    name: "searchcommand",
    desc: "Find commands whose name contains some text.",
    category: "utility",
    usage: "!searchcommand <text>",
};

const RESULTS_PER_PAGE: usize = 15;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn searchcommand(
    ctx: Context<'_>,
    #[description = "Text to search for"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let Some(needle) = text
        .as_deref()
        .map(|text| text.trim().to_ascii_lowercase())
        .filter(|text| !text.is_empty())
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let lines = matching_commands(&needle)
        .into_iter()
        .map(search_result_line)
        .collect::<Vec<_>>();

    if lines.is_empty() {
        ctx.say(format!("No commands match `{needle}`.")).await?;
        return Ok(());
    }

    let pages = chunk_lines(&lines, RESULTS_PER_PAGE);
    paginate_embed_pages(ctx, "Command Search", &pages, 1).await?;
    Ok(())
}

fn matching_commands(needle: &str) -> Vec<&'static CommandMeta> {
    let mut hits: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|command| command.name.contains(needle))
        .collect();
    hits.sort_unstable_by_key(|command| command.name);
    hits
}

#[cfg(test)]
mod tests {
    use super::matching_commands;

    #[test]
    fn finds_commands_by_name_fragment() {
        let names: Vec<&str> = matching_commands("snipe")
            .into_iter()
            .map(|command| command.name)
            .collect();
        assert_eq!(
            names,
            vec!["editsnipe", "editsnipelist", "snipe", "snipelist", "snipeset"]
        );
        assert!(matching_commands("zzz").is_empty());
    }
}
