use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use mewdeko_core::{Context, Error};
use mewdeko_database::impls::warnings::count_active_warnings;
use mewdeko_utils::embed::{DEFAULT_EMBED_COLOR, sanitize_mentions};
use mewdeko_utils::formatting::truncate_chars;
use mewdeko_utils::permissions::{permission_names, resolve_user_permissions};
use mewdeko_utils::time::discord_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "userinfo",
    desc: "Show information about a member.",
    category: "utility",
    usage: "!userinfo [user]",
};

const MAX_LISTED_ROLES: usize = 20;

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "User to inspect (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user = user.unwrap_or_else(|| ctx.author().clone());
    let member = guild_id.member(ctx.http(), user.id).await.ok();

    let mut embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(serenity::CreateEmbedAuthor::new(user.tag()).icon_url(user.face()))
        .thumbnail(user.face())
        .field("ID", user.id.get().to_string(), true)
        .field("Bot", if user.bot { "Yes" } else { "No" }, true)
        .field(
            "Created",
            discord_timestamp(user.id.created_at().unix_timestamp(), 'F'),
            true,
        );

    if let Some(member) = member.as_ref() {
        if let Some(nick) = member.nick.as_deref() {
            embed = embed.field("Nickname", sanitize_mentions(nick), true);
        }

        if let Some(joined_at) = member.joined_at {
            embed = embed.field(
                "Joined",
                discord_timestamp(joined_at.unix_timestamp(), 'F'),
                true,
            );
        }

        embed = embed.field(
            format!("Roles ({})", member.roles.len()),
            role_list(&member.roles),
            false,
        );

        let permissions = resolve_user_permissions(ctx.http(), guild_id, user.id).await?;
        let names = permission_names(permissions);
        if !names.is_empty() {
            embed = embed.field("Permissions", truncate_chars(&names.join(", "), 1024), false);
        }
    }

    let warnings = count_active_warnings(&ctx.data().db, guild_id.get(), user.id.get()).await?;
    embed = embed.field("Active Warnings", warnings.to_string(), true);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn role_list(roles: &[serenity::RoleId]) -> String {
    if roles.is_empty() {
        return "None".to_owned();
    }

    let mut listed = roles
        .iter()
        .take(MAX_LISTED_ROLES)
        .map(|role| format!("<@&{}>", role.get()))
        .collect::<Vec<_>>()
        .join(" ");

    if roles.len() > MAX_LISTED_ROLES {
        listed.push_str(&format!(" and {} more", roles.len() - MAX_LISTED_ROLES));
    }

    listed
}

#[cfg(test)]
mod tests {
    use super::role_list;
    use poise::serenity_prelude as serenity;

    #[test]
    fn long_role_lists_are_cut() {
        assert_eq!(role_list(&[]), "None");

        let roles: Vec<_> = (1..=22).map(serenity::RoleId::new).collect();
        let listed = role_list(&roles);
        assert!(listed.starts_with("<@&1> <@&2>"));
        assert!(listed.ends_with("<@&20> and 2 more"));
    }
}
