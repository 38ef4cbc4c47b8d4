use poise::serenity_prelude as serenity;

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: serenity::Permissions) -> Vec<String> {
    if perms.contains(serenity::Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}

struct ResolvedMember {
    roles: Vec<serenity::RoleId>,
    permissions: serenity::Permissions,
}

async fn resolve_member(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<ResolvedMember> {
    let guild = guild_id.to_partial_guild(http).await?;
    let member = guild_id.member(http, user_id).await?;

    if guild.owner_id == user_id {
        return Ok(ResolvedMember {
            roles: member.roles,
            permissions: serenity::Permissions::all(),
        });
    }

    let everyone_role_id = serenity::RoleId::new(guild_id.get());
    let permissions = guild
        .roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| {
            acc | role.permissions
        });

    Ok(ResolvedMember {
        roles: member.roles,
        permissions,
    })
}

/// Resolve a member's effective guild-level permissions.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    Ok(resolve_member(http, guild_id, user_id).await?.permissions)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Whether the member holds the guild's staff role or is an administrator.
pub async fn is_staff_or_admin(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    staff_role_id: Option<u64>,
) -> anyhow::Result<bool> {
    let member = resolve_member(http, guild_id, user_id).await?;
    Ok(staff_exempt(&member.roles, member.permissions, staff_role_id))
}

fn staff_exempt(
    roles: &[serenity::RoleId],
    permissions: serenity::Permissions,
    staff_role_id: Option<u64>,
) -> bool {
    if permissions.contains(serenity::Permissions::ADMINISTRATOR) {
        return true;
    }

    staff_role_id.is_some_and(|staff| roles.iter().any(|role| role.get() == staff))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{permission_names, staff_exempt};

    #[test]
    fn administrator_collapses_permission_list() {
        let perms = serenity::Permissions::ADMINISTRATOR | serenity::Permissions::KICK_MEMBERS;
        assert_eq!(permission_names(perms), vec!["ADMINISTRATOR".to_owned()]);

        let perms = serenity::Permissions::KICK_MEMBERS | serenity::Permissions::BAN_MEMBERS;
        assert_eq!(
            permission_names(perms),
            vec!["BAN_MEMBERS".to_owned(), "KICK_MEMBERS".to_owned()]
        );
    }

    #[test]
    fn staff_role_or_admin_is_exempt() {
        let roles = [serenity::RoleId::new(5), serenity::RoleId::new(9)];

        assert!(staff_exempt(&roles, serenity::Permissions::empty(), Some(9)));
        assert!(!staff_exempt(&roles, serenity::Permissions::empty(), Some(7)));
        assert!(!staff_exempt(&roles, serenity::Permissions::empty(), None));
        assert!(staff_exempt(&[], serenity::Permissions::ADMINISTRATOR, None));
    }
}
