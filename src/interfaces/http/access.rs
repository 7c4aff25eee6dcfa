//! Authorization predicates
//!
//! The access boundary sits entirely outside the services: handlers evaluate
//! these predicates against the authenticated caller before delegating, and
//! the services never see the actor. Each predicate takes the actor plus the
//! resource-owner id it guards and returns allow/deny.

use super::middleware::AuthenticatedUser;

pub const ROLE_USER: &str = "USER";
pub const ROLE_ORGANIZER: &str = "ORGANIZER";
pub const ROLE_ADMIN: &str = "ADMIN";

pub fn is_admin(actor: &AuthenticatedUser) -> bool {
    actor.has_role(ROLE_ADMIN)
}

/// Admin, or acting on their own account.
pub fn can_act_as(actor: &AuthenticatedUser, user_id: &str) -> bool {
    is_admin(actor) || actor.user_id == user_id
}

/// Event creation is restricted to organizers and admins.
pub fn can_create_events(actor: &AuthenticatedUser) -> bool {
    is_admin(actor) || actor.has_role(ROLE_ORGANIZER)
}

/// Admin, or the organizer owning the event.
pub fn can_manage_event(actor: &AuthenticatedUser, organizer_id: &str) -> bool {
    is_admin(actor) || actor.user_id == organizer_id
}

/// Admin, the registered user, or the organizer of the event.
pub fn can_view_registration(
    actor: &AuthenticatedUser,
    registrant_id: &str,
    organizer_id: &str,
) -> bool {
    is_admin(actor) || actor.user_id == registrant_id || actor.user_id == organizer_id
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(user_id: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user_id.into(),
            username: format!("{}-name", user_id),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn admin_passes_every_predicate() {
        let admin = actor("a-1", &[ROLE_ADMIN]);
        assert!(can_act_as(&admin, "someone-else"));
        assert!(can_create_events(&admin));
        assert!(can_manage_event(&admin, "someone-else"));
        assert!(can_view_registration(&admin, "x", "y"));
    }

    #[test]
    fn plain_user_only_acts_on_self() {
        let user = actor("u-1", &[ROLE_USER]);
        assert!(can_act_as(&user, "u-1"));
        assert!(!can_act_as(&user, "u-2"));
        assert!(!can_create_events(&user));
        assert!(!can_manage_event(&user, "u-2"));
    }

    #[test]
    fn organizer_manages_only_own_events() {
        let organizer = actor("org-1", &[ROLE_ORGANIZER]);
        assert!(can_create_events(&organizer));
        assert!(can_manage_event(&organizer, "org-1"));
        assert!(!can_manage_event(&organizer, "org-2"));
    }

    #[test]
    fn registration_visible_to_registrant_and_organizer() {
        let registrant = actor("u-1", &[ROLE_USER]);
        let organizer = actor("org-1", &[ROLE_ORGANIZER]);
        let stranger = actor("u-9", &[ROLE_USER]);

        assert!(can_view_registration(&registrant, "u-1", "org-1"));
        assert!(can_view_registration(&organizer, "u-1", "org-1"));
        assert!(!can_view_registration(&stranger, "u-1", "org-1"));
    }
}
