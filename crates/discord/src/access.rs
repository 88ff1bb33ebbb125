//! Role gating for bot commands.

use feedwatch_config::DiscordConfig;

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTier {
    Anyone,
    /// Normal or advanced roles.
    Normal,
    Advanced,
}

/// Role allowlists. Entries match a role id or, case-insensitively, a role
/// name; `*` in a name matches any sequence.
#[derive(Debug, Clone, Default)]
pub struct RoleConfig {
    pub advanced: Vec<String>,
    pub normal: Vec<String>,
}

impl RoleConfig {
    pub fn from_config(config: &DiscordConfig) -> Self {
        Self {
            advanced: config.advanced_roles.clone(),
            normal: config.normal_roles.clone(),
        }
    }
}

/// A role held by the message author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRole {
    pub id: u64,
    /// Resolved from the guild cache; missing when the guild is not cached.
    pub name: Option<String>,
}

/// Reason a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// Gated commands only run inside a guild.
    NotInGuild,
    MissingRole,
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInGuild => write!(f, "command used outside a guild"),
            Self::MissingRole => write!(f, "author lacks a required role"),
        }
    }
}

/// Decide whether an author with `member_roles` may run a command of `tier`.
///
/// `member_roles` is `None` for direct messages. An empty allowlist grants
/// nobody.
pub fn check_access(
    roles: &RoleConfig,
    tier: CommandTier,
    member_roles: Option<&[MemberRole]>,
) -> Result<(), AccessDenied> {
    if tier == CommandTier::Anyone {
        return Ok(());
    }
    let Some(member_roles) = member_roles else {
        return Err(AccessDenied::NotInGuild);
    };

    let holds = |allowlist: &[String]| {
        member_roles
            .iter()
            .any(|role| allowlist.iter().any(|pattern| role_matches(pattern, role)))
    };

    let allowed = match tier {
        CommandTier::Anyone => true,
        CommandTier::Normal => holds(&roles.advanced) || holds(&roles.normal),
        CommandTier::Advanced => holds(&roles.advanced),
    };
    if allowed {
        Ok(())
    } else {
        Err(AccessDenied::MissingRole)
    }
}

fn role_matches(pattern: &str, role: &MemberRole) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return false;
    }
    if pattern == role.id.to_string() {
        return true;
    }
    let Some(name) = &role.name else {
        return false;
    };
    let pat = pattern.to_lowercase();
    let name = name.to_lowercase();
    if pat.contains('*') {
        glob_match(&pat, &name)
    } else {
        pat == name
    }
}

/// `*` matches any run of characters. The first segment anchors at the
/// start of `text`, the last one at its end, and the segments between are
/// found left to right in what remains.
fn glob_match(pattern: &str, text: &str) -> bool {
    let Some((head, rest)) = pattern.split_once('*') else {
        return pattern == text;
    };
    let Some(mut remaining) = text.strip_prefix(head) else {
        return false;
    };
    let (middle, tail) = rest.rsplit_once('*').unwrap_or(("", rest));
    let Some(body) = remaining.strip_suffix(tail) else {
        return false;
    };
    remaining = body;
    for segment in middle.split('*').filter(|s| !s.is_empty()) {
        match remaining.find(segment) {
            Some(idx) => remaining = &remaining[idx + segment.len()..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn roles() -> RoleConfig {
        RoleConfig {
            advanced: vec!["Moderators".into(), "1001".into()],
            normal: vec!["Members".into(), "Tier *".into()],
        }
    }

    fn role(id: u64, name: &str) -> MemberRole {
        MemberRole {
            id,
            name: Some(name.into()),
        }
    }

    #[test]
    fn anyone_needs_nothing() {
        assert!(check_access(&RoleConfig::default(), CommandTier::Anyone, None).is_ok());
    }

    #[test]
    fn direct_messages_refused_for_gated_commands() {
        assert_eq!(
            check_access(&roles(), CommandTier::Normal, None),
            Err(AccessDenied::NotInGuild)
        );
    }

    #[rstest]
    #[case(role(1, "moderators"), CommandTier::Advanced, true)]
    #[case(role(1001, "renamed"), CommandTier::Advanced, true)]
    #[case(role(2, "Members"), CommandTier::Advanced, false)]
    #[case(role(2, "Members"), CommandTier::Normal, true)]
    #[case(role(1, "Moderators"), CommandTier::Normal, true)]
    #[case(role(3, "Tier 2"), CommandTier::Normal, true)]
    #[case(role(4, "Guests"), CommandTier::Normal, false)]
    fn role_tiers(#[case] held: MemberRole, #[case] tier: CommandTier, #[case] allowed: bool) {
        assert_eq!(check_access(&roles(), tier, Some(&[held][..])).is_ok(), allowed);
    }

    #[test]
    fn uncached_role_matches_by_id_only() {
        let held = [MemberRole {
            id: 1001,
            name: None,
        }];
        assert!(check_access(&roles(), CommandTier::Advanced, Some(&held[..])).is_ok());
        let held = [MemberRole { id: 7, name: None }];
        assert_eq!(
            check_access(&roles(), CommandTier::Normal, Some(&held[..])),
            Err(AccessDenied::MissingRole)
        );
    }

    #[test]
    fn empty_allowlists_grant_nobody() {
        let held = [role(1, "Moderators")];
        assert_eq!(
            check_access(&RoleConfig::default(), CommandTier::Normal, Some(&held[..])),
            Err(AccessDenied::MissingRole)
        );
    }

    #[rstest]
    #[case("tier *", "tier 1", true)]
    #[case("*mod*", "the moderators", true)]
    #[case("mod*", "admin", false)]
    #[case("*ors", "moderator", false)]
    #[case("*er", "power user", true)]
    #[case("*er", "powers", false)]
    #[case("a*b*c", "abc", true)]
    #[case("a*b*c", "axbyc", true)]
    #[case("a*b*c", "acb", false)]
    #[case("ab*ba", "aba", false)]
    #[case("*", "", true)]
    fn glob_patterns(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(glob_match(pattern, text), expected);
    }

    #[test]
    fn suffix_pattern_grants_role() {
        let roles = RoleConfig {
            advanced: vec!["*er".into()],
            normal: Vec::new(),
        };
        let held = [role(9, "Power User")];
        assert!(check_access(&roles, CommandTier::Advanced, Some(&held[..])).is_ok());
    }
}
