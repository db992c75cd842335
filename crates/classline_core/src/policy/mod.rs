//! Access policy engine.
//!
//! # Responsibility
//! - Decide, for every (actor, action) pair, whether the action is allowed.
//!   This is the single source of truth for authorization; no service keeps
//!   its own role checks.
//!
//! # Invariants
//! - `decide` is pure: no store access, no side effects, deterministic.
//! - The rule table is total; any pair it does not list is denied.
//! - Denial is reported as Forbidden by callers, distinct from NotFound, so
//!   a denied caller learns nothing about whether the target exists.

use crate::model::enums::{NotificationType, Role};
use crate::model::identity::{Actor, IdentityId};

/// Outcome of a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Every action the portal exposes, with the ownership context the rule
/// needs where scoping applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Register a new parent account together with its first student.
    RegisterParentAndStudent,
    /// Create, update, delete, list or search student records.
    ManageStudents,
    /// Add a student under an existing parent.
    AddChild,
    /// Post a notification of the given category.
    CreateNotification(NotificationType),
    /// View notifications the actor created (teacher dashboard).
    ViewOwnCreatedNotifications,
    /// View every notification regardless of creator (office dashboard).
    ViewAllNotifications,
    /// View notifications for the children owned by `owner`.
    ViewChildNotifications { owner: IdentityId },
    /// Mark one notification of `owner`'s children as read.
    MarkNotificationRead { owner: IdentityId },
    /// Mark every unread notification of the actor's own children as read.
    MarkAllNotificationsRead,
}

/// Applies the role/action rule table.
pub fn decide(actor: &Actor, action: &Action) -> Decision {
    let allowed = match (actor.role, action) {
        (Role::Office, Action::RegisterParentAndStudent)
        | (Role::Office, Action::ManageStudents)
        | (Role::Office, Action::AddChild)
        | (Role::Office, Action::ViewAllNotifications) => true,

        (role, Action::CreateNotification(kind)) => kind.producible_by(role),

        (Role::Teacher, Action::ViewOwnCreatedNotifications) => true,

        (Role::Parent, Action::ViewChildNotifications { owner })
        | (Role::Parent, Action::MarkNotificationRead { owner }) => *owner == actor.id,
        (Role::Parent, Action::MarkAllNotificationsRead) => true,

        _ => false,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::{decide, Action, Decision};
    use crate::model::enums::{NotificationType, Role};
    use crate::model::identity::Actor;
    use uuid::Uuid;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn office_owns_student_management() {
        for action in [
            Action::RegisterParentAndStudent,
            Action::ManageStudents,
            Action::AddChild,
        ] {
            assert_eq!(decide(&actor(Role::Office), &action), Decision::Allow);
            assert_eq!(decide(&actor(Role::Teacher), &action), Decision::Deny);
            assert_eq!(decide(&actor(Role::Parent), &action), Decision::Deny);
        }
    }

    #[test]
    fn notification_creation_follows_role_lanes() {
        let teacher = actor(Role::Teacher);
        let office = actor(Role::Office);
        let parent = actor(Role::Parent);

        for kind in [NotificationType::Attendance, NotificationType::Academic] {
            assert_eq!(
                decide(&teacher, &Action::CreateNotification(kind)),
                Decision::Allow
            );
            assert_eq!(
                decide(&office, &Action::CreateNotification(kind)),
                Decision::Deny
            );
        }
        for kind in [
            NotificationType::Administrative,
            NotificationType::Health,
        ] {
            assert_eq!(
                decide(&office, &Action::CreateNotification(kind)),
                Decision::Allow
            );
            assert_eq!(
                decide(&teacher, &Action::CreateNotification(kind)),
                Decision::Deny
            );
        }
        for kind in NotificationType::ALL {
            assert_eq!(
                decide(&parent, &Action::CreateNotification(kind)),
                Decision::Deny
            );
        }
    }

    #[test]
    fn parent_scope_requires_matching_owner() {
        let parent = actor(Role::Parent);
        let other = Uuid::new_v4();

        assert_eq!(
            decide(&parent, &Action::ViewChildNotifications { owner: parent.id }),
            Decision::Allow
        );
        assert_eq!(
            decide(&parent, &Action::ViewChildNotifications { owner: other }),
            Decision::Deny
        );
        assert_eq!(
            decide(&parent, &Action::MarkNotificationRead { owner: parent.id }),
            Decision::Allow
        );
        assert_eq!(
            decide(&parent, &Action::MarkNotificationRead { owner: other }),
            Decision::Deny
        );
        assert_eq!(
            decide(&parent, &Action::MarkAllNotificationsRead),
            Decision::Allow
        );
    }

    #[test]
    fn dashboards_split_by_role() {
        assert_eq!(
            decide(&actor(Role::Teacher), &Action::ViewOwnCreatedNotifications),
            Decision::Allow
        );
        assert_eq!(
            decide(&actor(Role::Office), &Action::ViewOwnCreatedNotifications),
            Decision::Deny
        );
        assert_eq!(
            decide(&actor(Role::Office), &Action::ViewAllNotifications),
            Decision::Allow
        );
        assert_eq!(
            decide(&actor(Role::Teacher), &Action::ViewAllNotifications),
            Decision::Deny
        );
    }

    #[test]
    fn decide_is_deterministic() {
        let caller = actor(Role::Parent);
        let action = Action::MarkNotificationRead { owner: caller.id };
        let first = decide(&caller, &action);
        for _ in 0..10 {
            assert_eq!(decide(&caller, &action), first);
        }
    }

    #[test]
    fn unlisted_pairs_are_denied() {
        let teacher = actor(Role::Teacher);
        let office = actor(Role::Office);

        assert_eq!(
            decide(&teacher, &Action::ViewChildNotifications { owner: teacher.id }),
            Decision::Deny
        );
        assert_eq!(
            decide(&office, &Action::MarkNotificationRead { owner: office.id }),
            Decision::Deny
        );
        assert_eq!(
            decide(&teacher, &Action::MarkAllNotificationsRead),
            Decision::Deny
        );
    }
}
