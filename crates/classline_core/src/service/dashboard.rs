//! Role-specific dashboard aggregation.
//!
//! # Responsibility
//! - Compose the directory and lifecycle services into the summary each
//!   role's landing view renders.
//!
//! # Invariants
//! - Read-only; holds no state of its own and performs no authorization
//!   beyond what the composed services already enforce.
//! - The parent summary is scoped by the actor's own identity; the owner
//!   constraint is threaded through, never widened.

use crate::identity::IdentityProvider;
use crate::model::identity::Actor;
use crate::model::notification::Notification;
use crate::model::student::Student;
use crate::repo::notification_repo::NotificationRepository;
use crate::repo::student_repo::StudentRepository;
use crate::service::notification_service::{NotificationLifecycleService, ParentInbox};
use crate::service::student_service::StudentDirectoryService;
use crate::service::PortalResult;

/// Teacher landing view: own recent notifications plus own total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherDashboard {
    pub recent: Vec<Notification>,
    pub total_sent: u64,
}

/// Office landing view: recent notifications from all creators plus
/// roster-wide counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeDashboard {
    pub recent: Vec<Notification>,
    pub total_notifications: u64,
    pub total_students: u64,
    pub total_grades: u64,
}

/// Parent landing view: children plus the full inbox with statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentDashboard {
    pub children: Vec<Student>,
    pub inbox: ParentInbox,
}

/// Builds the teacher landing summary.
pub fn teacher_dashboard<I, S, N>(
    notifications: &NotificationLifecycleService<I, S, N>,
    actor: &Actor,
    recent_limit: u32,
) -> PortalResult<TeacherDashboard>
where
    I: IdentityProvider,
    S: StudentRepository,
    N: NotificationRepository,
{
    Ok(TeacherDashboard {
        recent: notifications.list_for_teacher(actor, Some(recent_limit))?,
        total_sent: notifications.count_for_teacher(actor)?,
    })
}

/// Builds the office landing summary.
pub fn office_dashboard<DI, DR, I, S, N>(
    students: &StudentDirectoryService<DI, DR>,
    notifications: &NotificationLifecycleService<I, S, N>,
    actor: &Actor,
    recent_limit: u32,
) -> PortalResult<OfficeDashboard>
where
    DI: IdentityProvider,
    DR: StudentRepository,
    I: IdentityProvider,
    S: StudentRepository,
    N: NotificationRepository,
{
    let totals = students.directory_totals(actor)?;
    Ok(OfficeDashboard {
        recent: notifications.list_for_office(actor, Some(recent_limit))?,
        total_notifications: notifications.count_all(actor)?,
        total_students: totals.students,
        total_grades: totals.grades,
    })
}

/// Builds the parent landing summary, scoped to the actor's own children.
pub fn parent_dashboard<DI, DR, I, S, N>(
    students: &StudentDirectoryService<DI, DR>,
    notifications: &NotificationLifecycleService<I, S, N>,
    actor: &Actor,
) -> PortalResult<ParentDashboard>
where
    DI: IdentityProvider,
    DR: StudentRepository,
    I: IdentityProvider,
    S: StudentRepository,
    N: NotificationRepository,
{
    Ok(ParentDashboard {
        children: students.list_children(actor)?,
        inbox: notifications.list_for_parent(actor)?,
    })
}
