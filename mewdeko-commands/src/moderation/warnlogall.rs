use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::warnings::warn_counts_for_guild;
use mewdeko_database::model::warnings::UserWarnCount;
use mewdeko_utils::pagination::{chunk_lines, paginate_embed_pages};
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnlogall",
    desc: "Show warning counts for every warned user in this server.",
    category: "moderation",
    usage: "!warnlogall [page]",
};

const USERS_PER_PAGE: usize = 15;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warnlogall(
    ctx: Context<'_>,
    #[description = "Page to open"] page: Option<usize>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::BAN_MEMBERS,
    )
    .await?
    {
        return Ok(());
    }

    let counts = warn_counts_for_guild(&ctx.data().db, guild_id.get()).await?;
    let lines = count_lines(&counts);
    if lines.is_empty() {
        ctx.say("No users in this server have active warnings.").await?;
        return Ok(());
    }

    let pages = chunk_lines(&lines, USERS_PER_PAGE);
    paginate_embed_pages(ctx, "Warnlog", &pages, page.unwrap_or(1)).await?;

    Ok(())
}

/// One line per user with unforgiven warnings.
fn count_lines(counts: &[UserWarnCount]) -> Vec<String> {
    counts
        .iter()
        .filter(|count| count.active > 0)
        .map(|count| {
            format!(
                "<@{}> | {} active | {} total",
                count.user_id, count.active, count.total
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::count_lines;
    use mewdeko_database::model::warnings::UserWarnCount;

    #[test]
    fn users_without_active_warnings_are_hidden() {
        let counts = [
            UserWarnCount {
                user_id: 1,
                active: 2,
                total: 3,
            },
            UserWarnCount {
                user_id: 2,
                active: 0,
                total: 4,
            },
        ];

        assert_eq!(count_lines(&counts), vec!["<@1> | 2 active | 3 total".to_owned()]);
    }
}
