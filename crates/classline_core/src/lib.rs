//! Core domain logic for the Classline school-to-parent notification portal.
//! This crate is the single source of truth for authorization and
//! notification-lifecycle invariants.

pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use identity::{IdentityError, IdentityProvider, IdentityResult, SqliteIdentityDirectory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::enums::{Grade, NotificationType, Priority, Role};
pub use model::identity::{Actor, Identity, IdentityId, NewParent};
pub use model::notification::{NewNotification, Notification, NotificationId};
pub use model::student::{NewStudent, Student, StudentId, StudentWithParent};
pub use model::ValidationError;
pub use policy::{decide, Action, Decision};
pub use repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository, StudentSearchQuery};
pub use repo::{RepoError, RepoResult};
pub use service::dashboard::{
    office_dashboard, parent_dashboard, teacher_dashboard, OfficeDashboard, ParentDashboard,
    TeacherDashboard,
};
pub use service::notification_service::{
    NotificationLifecycleService, ParentInbox, ParentInboxStats,
};
pub use service::student_service::{
    DirectoryByGrade, DirectoryTotals, FamilyRegistration, GradeRoster, StudentDirectoryService,
    StudentSearchResult,
};
pub use service::{PortalError, PortalResult, StoreFailure};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
