//! Sample-data initializer for demos and local development.
//!
//! # Responsibility
//! - Populate an empty database with the standard demo accounts: one
//!   teacher, one office admin, three parents with one student each, and a
//!   few notifications.
//!
//! # Invariants
//! - Idempotent: accounts are keyed by email, notifications are only
//!   inserted into an empty table.
//! - Works directly against the directory and repositories; seeding is
//!   store bootstrap, not an actor-gated operation.

use crate::db::DbError;
use crate::identity::{IdentityError, IdentityProvider, SqliteIdentityDirectory};
use crate::model::enums::{Grade, NotificationType, Priority, Role};
use crate::model::identity::IdentityId;
use crate::model::notification::{NewNotification, NotificationId};
use crate::model::student::NewStudent;
use crate::repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository};
use crate::repo::RepoError;
use log::info;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug)]
pub enum SeedError {
    Identity(IdentityError),
    Repo(RepoError),
    Db(DbError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Identity(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<IdentityError> for SeedError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for SeedError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

struct SeedParent {
    email: &'static str,
    name: &'static str,
    student_name: &'static str,
    grade: Grade,
}

const SEED_PARENTS: &[SeedParent] = &[
    SeedParent {
        email: "parent1@gmail.com",
        name: "Mohammed Ahmed",
        student_name: "Ali Ahmed",
        grade: Grade::Grade1,
    },
    SeedParent {
        email: "parent2@gmail.com",
        name: "Aisha Mohammed",
        student_name: "Sara Mohammed",
        grade: Grade::Grade2,
    },
    SeedParent {
        email: "parent3@gmail.com",
        name: "Hassan Ibrahim",
        student_name: "Omar Hassan",
        grade: Grade::Grade3,
    },
];

/// Seeds the demo accounts, students and notifications.
pub fn seed_sample_data(conn: &Connection) -> Result<(), SeedError> {
    let directory = SqliteIdentityDirectory::try_new(conn)?;
    let students = SqliteStudentRepository::try_new(conn)?;
    let notifications = SqliteNotificationRepository::try_new(conn)?;

    let teacher_name = "Ahmed Hassan (Teacher)";
    ensure_account(
        &directory,
        "teacher@school.com",
        teacher_name,
        "Teacher@123",
        Role::Teacher,
    )?;
    ensure_account(
        &directory,
        "office@school.com",
        "Fatima Ali (Office Admin)",
        "Office@123",
        Role::Office,
    )?;

    let mut first_parent_id = None;
    let mut second_parent_id = None;
    for (index, parent) in SEED_PARENTS.iter().enumerate() {
        let parent_id = match directory.find_by_email(parent.email)? {
            Some(existing) => existing.id,
            None => {
                let id =
                    directory.create_identity(parent.email, parent.name, "Parent@123")?;
                directory.assign_role(id, Role::Parent)?;
                students.create_student(
                    id,
                    &NewStudent {
                        name: parent.student_name.to_string(),
                        grade: parent.grade,
                    },
                )?;
                id
            }
        };
        if index == 0 {
            first_parent_id = Some(parent_id);
        } else if index == 1 {
            second_parent_id = Some(parent_id);
        }
    }

    if notifications.count_all()? == 0 {
        if let (Some(first_parent), Some(second_parent)) = (first_parent_id, second_parent_id) {
            seed_notifications(
                conn,
                &students,
                &notifications,
                teacher_name,
                first_parent,
                second_parent,
            )?;
        }
    }

    info!(
        "event=seed module=db status=ok identities={} students={} notifications={}",
        count_identities(conn)?,
        students.count_students()?,
        notifications.count_all()?
    );
    Ok(())
}

fn ensure_account(
    directory: &SqliteIdentityDirectory<'_>,
    email: &str,
    display_name: &str,
    credential: &str,
    role: Role,
) -> Result<IdentityId, SeedError> {
    if let Some(existing) = directory.find_by_email(email)? {
        return Ok(existing.id);
    }
    let id = directory.create_identity(email, display_name, credential)?;
    directory.assign_role(id, role)?;
    Ok(id)
}

fn seed_notifications(
    conn: &Connection,
    students: &SqliteStudentRepository<'_>,
    notifications: &SqliteNotificationRepository<'_>,
    teacher_name: &str,
    first_parent: IdentityId,
    second_parent: IdentityId,
) -> Result<(), SeedError> {
    let first_children = students.list_for_parent(first_parent)?;
    let second_children = students.list_for_parent(second_parent)?;
    let (Some(ali), Some(sara)) = (first_children.first(), second_children.first()) else {
        return Ok(());
    };

    let attendance = notifications.create_notification(
        &NewNotification {
            student_id: ali.id,
            title: "Attendance - Present Today".to_string(),
            message: "Your child Ali Ahmed was present and participated well in class activities today."
                .to_string(),
            kind: NotificationType::Attendance,
            priority: Priority::Normal,
        },
        teacher_name,
    )?;
    let exam = notifications.create_notification(
        &NewNotification {
            student_id: ali.id,
            title: "Monthly Exam Results".to_string(),
            message: "Total Marks: 450/500. Average: 90%. Excellent performance!".to_string(),
            kind: NotificationType::Academic,
            priority: Priority::Normal,
        },
        teacher_name,
    )?;
    notifications.create_notification(
        &NewNotification {
            student_id: sara.id,
            title: "School Holiday - Eid Break".to_string(),
            message: "School will be closed from 15th to 20th for Eid holidays. Classes resume on 21st."
                .to_string(),
            kind: NotificationType::Administrative,
            priority: Priority::Info,
        },
        "School Office",
    )?;

    // Spread creation times so newest-first views show an order out of the box.
    backdate(conn, attendance, 2 * MILLIS_PER_DAY)?;
    backdate(conn, exam, MILLIS_PER_DAY)?;

    Ok(())
}

fn backdate(conn: &Connection, id: NotificationId, millis: i64) -> Result<(), SeedError> {
    conn.execute(
        "UPDATE notifications SET created_at = created_at - ?1 WHERE id = ?2;",
        params![millis, id],
    )?;
    Ok(())
}

fn count_identities(conn: &Connection) -> Result<i64, SeedError> {
    let count = conn.query_row("SELECT COUNT(*) FROM identities;", [], |row| row.get(0))?;
    Ok(count)
}
