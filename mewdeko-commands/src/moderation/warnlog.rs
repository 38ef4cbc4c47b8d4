use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{fetch_target_profile, guild_only_message};
use mewdeko_core::{Context, Error};
use mewdeko_database::model::warnings::WarningEntry;
use mewdeko_database::impls::warnings::warnings_for_user;
use mewdeko_utils::embed::sanitize_mentions;
use mewdeko_utils::pagination::{page_window, paginate_embed_pages_with_icon, total_pages};
use mewdeko_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnlog",
    desc: "Show a user's warnings, newest first.",
    category: "moderation",
    usage: "!warnlog [user]",
};

const WARNINGS_PER_PAGE: usize = 5;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warnlog(
    ctx: Context<'_>,
    #[description = "The user to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let target_id = user.as_ref().map_or(ctx.author().id, |user| user.id);

    // Anyone may read their own log; other users' logs are for moderators.
    if target_id != ctx.author().id
        && !has_user_permission(
            ctx.http(),
            guild_id,
            ctx.author().id,
            serenity::Permissions::BAN_MEMBERS,
        )
        .await?
    {
        return Ok(());
    }

    let entries = warnings_for_user(&ctx.data().db, guild_id.get(), target_id.get()).await?;
    let target_profile = fetch_target_profile(ctx.http(), target_id).await;
    let title = format!("Warnlog for {}", target_profile.display_name);

    let pages = warnlog_pages(&entries);
    paginate_embed_pages_with_icon(ctx, &title, &pages, 1, target_profile.avatar_url.as_deref())
        .await?;

    Ok(())
}

fn warnlog_pages(entries: &[WarningEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["This user has no warnings.".to_owned()];
    }

    let active = entries.iter().filter(|entry| !entry.forgiven).count();
    let total = entries.len();

    (1..=total_pages(total, WARNINGS_PER_PAGE))
        .map(|page| {
            let (start, end) = page_window(total, WARNINGS_PER_PAGE, page);
            let mut out = format!("Active warnings: **{active}** of {total}\n\n");

            for (index, entry) in entries.iter().enumerate().take(end).skip(start) {
                out.push_str(&format_entry(index + 1, entry));
                out.push_str("\n\n");
            }

            out.trim_end().to_owned()
        })
        .collect()
}

fn format_entry(position: usize, entry: &WarningEntry) -> String {
    let header = format!(
        "`#{position}` <t:{ts}:d> by **{moderator}**",
        ts = entry.warned_at,
        moderator = sanitize_mentions(&entry.moderator_name),
    );
    let reason = sanitize_mentions(&entry.reason);

    if entry.forgiven {
        let by = entry.forgiven_by.as_deref().unwrap_or("unknown");
        format!(
            "~~{header}~~\n~~{reason}~~\n*Forgiven by {}*",
            sanitize_mentions(by)
        )
    } else {
        format!("{header}\n{reason}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_entry, warnlog_pages};
    use mewdeko_database::model::warnings::WarningEntry;

    fn entry(id: u64, forgiven: bool) -> WarningEntry {
        WarningEntry {
            id,
            user_id: 1,
            moderator_id: 2,
            moderator_name: "mod".to_owned(),
            reason: format!("reason {id}"),
            warned_at: 1_700_000_000,
            forgiven,
            forgiven_by: forgiven.then(|| "Expiry".to_owned()),
        }
    }

    #[test]
    fn forgiven_entries_are_struck_through() {
        let line = format_entry(2, &entry(7, true));
        assert!(line.starts_with("~~`#2`"));
        assert!(line.ends_with("*Forgiven by Expiry*"));

        let line = format_entry(1, &entry(8, false));
        assert_eq!(line, "`#1` <t:1700000000:d> by **mod**\nreason 8");
    }

    #[test]
    fn pages_number_entries_across_pages() {
        let entries: Vec<_> = (0..7).map(|id| entry(id, id == 0)).collect();
        let pages = warnlog_pages(&entries);

        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("Active warnings: **6** of 7"));
        assert!(pages[1].contains("`#6`"));
        assert!(pages[1].contains("`#7`"));
    }

    #[test]
    fn empty_log_has_one_page() {
        assert_eq!(warnlog_pages(&[]), vec!["This user has no warnings.".to_owned()]);
    }
}
