//! Notification lifecycle service.
//!
//! # Responsibility
//! - Posting notifications within the creator's role lane.
//! - The unread-to-read transition and its batch form.
//! - Role-scoped listing with the statistics each dashboard shows.
//!
//! # Invariants
//! - Creator name and creation time are captured server-side; callers never
//!   supply them.
//! - The read transition is one-way and idempotent; `read_at` is stamped at
//!   most once per notification.
//! - A notification created after the batch statement commits stays unread;
//!   that race is accepted, not repaired.

use crate::identity::IdentityProvider;
use crate::model::enums::{NotificationType, Priority};
use crate::model::identity::Actor;
use crate::model::notification::{NewNotification, Notification, NotificationId};
use crate::model::ValidationError;
use crate::policy::{decide, Action};
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::student_repo::StudentRepository;
use crate::service::{authorize, PortalError, PortalResult};
use log::{info, warn};

/// Inbox statistics shown on the parent view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentInboxStats {
    pub total: usize,
    pub unread: usize,
    pub urgent_unread: usize,
}

impl ParentInboxStats {
    fn from_items(items: &[Notification]) -> Self {
        Self {
            total: items.len(),
            unread: items.iter().filter(|n| !n.is_read).count(),
            urgent_unread: items
                .iter()
                .filter(|n| !n.is_read && n.priority == Priority::Urgent)
                .count(),
        }
    }
}

/// Parent inbox: newest-first notifications plus derived statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInbox {
    pub items: Vec<Notification>,
    pub stats: ParentInboxStats,
}

/// Use-case service for the notification lifecycle.
pub struct NotificationLifecycleService<I, S, N>
where
    I: IdentityProvider,
    S: StudentRepository,
    N: NotificationRepository,
{
    identities: I,
    students: S,
    notifications: N,
}

impl<I, S, N> NotificationLifecycleService<I, S, N>
where
    I: IdentityProvider,
    S: StudentRepository,
    N: NotificationRepository,
{
    pub fn new(identities: I, students: S, notifications: N) -> Self {
        Self {
            identities,
            students,
            notifications,
        }
    }

    /// Posts a notification about one student.
    ///
    /// # Contract
    /// - The category must be in the actor's lane: a staff account posting
    ///   outside its lane gets a `Validation` error, an account with no
    ///   posting rights at all gets `Forbidden`.
    /// - `StudentNotFound` when the student id does not resolve.
    /// - The stored creator name is the actor's directory display name.
    pub fn create(&self, actor: &Actor, input: &NewNotification) -> PortalResult<NotificationId> {
        if !decide(actor, &Action::CreateNotification(input.kind)).is_allowed() {
            if NotificationType::allowed_for(actor.role).is_empty() {
                warn!(
                    "event=access_denied module=policy status=deny role={} action=create_notification",
                    actor.role
                );
                return Err(PortalError::Forbidden);
            }
            return Err(PortalError::Validation(
                ValidationError::TypeNotAllowedForRole {
                    kind: input.kind,
                    role: actor.role,
                },
            ));
        }
        input.validate()?;

        if self.students.get_student(input.student_id)?.is_none() {
            return Err(PortalError::StudentNotFound(input.student_id));
        }

        let creator = self
            .identities
            .get_identity(actor.id)?
            .ok_or(PortalError::Forbidden)?;

        let id = self
            .notifications
            .create_notification(input, &creator.display_name)?;
        info!(
            "event=notification_created module=notification_service status=ok notification_id={id} student_id={} type={} priority={}",
            input.student_id, input.kind, input.priority
        );
        Ok(id)
    }

    /// Marks one notification read on behalf of the owning parent.
    ///
    /// Resolution order follows the record chain: unknown ids are
    /// `NotificationNotFound`, a foreign parent gets `Forbidden`. Marking an
    /// already-read notification is a no-op.
    pub fn mark_read(&self, actor: &Actor, id: NotificationId) -> PortalResult<()> {
        let owner = self
            .notifications
            .resolve_owner(id)?
            .ok_or(PortalError::NotificationNotFound(id))?;
        authorize(actor, &Action::MarkNotificationRead { owner })?;

        let transitioned = self.notifications.mark_read(id)?;
        if transitioned {
            info!(
                "event=notification_read module=notification_service status=ok notification_id={id}"
            );
        }
        Ok(())
    }

    /// Marks every unread notification of the actor's children read, as one
    /// store batch. Returns how many notifications transitioned.
    pub fn mark_all_read(&self, actor: &Actor) -> PortalResult<usize> {
        authorize(actor, &Action::MarkAllNotificationsRead)?;

        let transitioned = self.notifications.mark_all_read_for_parent(actor.id)?;
        info!(
            "event=notifications_read_all module=notification_service status=ok parent_id={} count={transitioned}",
            actor.id
        );
        Ok(transitioned)
    }

    /// Notifications the acting teacher created, newest first.
    pub fn list_for_teacher(
        &self,
        actor: &Actor,
        limit: Option<u32>,
    ) -> PortalResult<Vec<Notification>> {
        authorize(actor, &Action::ViewOwnCreatedNotifications)?;
        let creator = self.creator_name(actor)?;
        Ok(self.notifications.list_for_creator(&creator, limit)?)
    }

    /// Total count of the acting teacher's notifications.
    pub fn count_for_teacher(&self, actor: &Actor) -> PortalResult<u64> {
        authorize(actor, &Action::ViewOwnCreatedNotifications)?;
        let creator = self.creator_name(actor)?;
        Ok(self.notifications.count_for_creator(&creator)?)
    }

    /// All notifications regardless of creator, newest first.
    pub fn list_for_office(
        &self,
        actor: &Actor,
        limit: Option<u32>,
    ) -> PortalResult<Vec<Notification>> {
        authorize(actor, &Action::ViewAllNotifications)?;
        Ok(self.notifications.list_all(limit)?)
    }

    /// Total notification count for the office dashboard.
    pub fn count_all(&self, actor: &Actor) -> PortalResult<u64> {
        authorize(actor, &Action::ViewAllNotifications)?;
        Ok(self.notifications.count_all()?)
    }

    /// Inbox for the acting parent: every notification of their children,
    /// newest first, with derived statistics.
    pub fn list_for_parent(&self, actor: &Actor) -> PortalResult<ParentInbox> {
        authorize(actor, &Action::ViewChildNotifications { owner: actor.id })?;

        let items = self.notifications.list_for_parent(actor.id)?;
        let stats = ParentInboxStats::from_items(&items);
        Ok(ParentInbox { items, stats })
    }

    fn creator_name(&self, actor: &Actor) -> PortalResult<String> {
        let identity = self
            .identities
            .get_identity(actor.id)?
            .ok_or(PortalError::Forbidden)?;
        Ok(identity.display_name)
    }
}
