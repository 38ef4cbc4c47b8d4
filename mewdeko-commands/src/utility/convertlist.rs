use std::collections::BTreeMap;

use crate::CommandMeta;
use mewdeko_core::{Context, Error};
use mewdeko_services::ConvertUnit;
use mewdeko_utils::formatting::{display_category, truncate_chars};
use mewdeko_utils::pagination::paginate_embed_pages;

pub const META: CommandMeta = CommandMeta {
    name: "convertlist",
    desc: "List the units the converter understands, one kind per page.",
    category: "utility",
    usage: "!convertlist [page]",
};

const MAX_PAGE_CHARS: usize = 4000;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn convertlist(
    ctx: Context<'_>,
    #[description = "Page to open"] page: Option<usize>,
) -> Result<(), Error> {
    let units = ctx.data().converter.units().await;
    if units.is_empty() {
        ctx.say("No units are loaded.").await?;
        return Ok(());
    }

    let pages = unit_pages(&units);
    paginate_embed_pages(ctx, "Convertible Units", &pages, page.unwrap_or(1)).await?;

    Ok(())
}

/// One page per unit type, each unit shown as its `/`-joined triggers.
fn unit_pages(units: &[ConvertUnit]) -> Vec<String> {
    let mut by_type: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for unit in units {
        by_type
            .entry(unit.unit_type.as_str())
            .or_default()
            .push(format!("`{}`", unit.triggers.join("/")));
    }

    by_type
        .into_iter()
        .map(|(unit_type, entries)| {
            truncate_chars(
                &format!("**{}**\n{}", display_category(unit_type), entries.join(", ")),
                MAX_PAGE_CHARS,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::unit_pages;
    use mewdeko_services::ConvertUnit;

    fn unit(triggers: &[&str], unit_type: &str) -> ConvertUnit {
        ConvertUnit {
            triggers: triggers.iter().map(|trigger| (*trigger).to_owned()).collect(),
            unit_type: unit_type.to_owned(),
            modifier: 1.0,
        }
    }

    #[test]
    fn groups_units_by_type() {
        let pages = unit_pages(&[
            unit(&["m", "meter"], "length"),
            unit(&["usd"], "currency"),
            unit(&["km"], "length"),
        ]);

        assert_eq!(
            pages,
            vec![
                "**Currency**\n`usd`".to_owned(),
                "**Length**\n`m/meter`, `km`".to_owned(),
            ]
        );
    }
}
