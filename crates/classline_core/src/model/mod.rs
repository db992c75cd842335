//! Domain model for the school-to-parent notification portal.
//!
//! # Responsibility
//! - Define canonical data structures shared by policy, repos and services.
//! - Hold the single enumeration module consulted by both validation and
//!   query filtering.
//!
//! # Invariants
//! - Field constraints (`validate_*`) are checked before every store write.
//! - A notification's `is_read` flag is true iff `read_at` is set.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod enums;
pub mod identity;
pub mod notification;
pub mod student;

pub const STUDENT_NAME_MAX_CHARS: usize = 100;
pub const PARENT_NAME_MAX_CHARS: usize = 100;
pub const TITLE_MAX_CHARS: usize = 200;
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Field-level constraint violation for any portal input.
///
/// Always recoverable by the caller re-prompting; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyStudentName,
    StudentNameTooLong { len: usize, max: usize },
    EmptyParentName,
    ParentNameTooLong { len: usize, max: usize },
    InvalidEmail(String),
    EmptyTitle,
    TitleTooLong { len: usize, max: usize },
    EmptyMessage,
    MessageTooLong { len: usize, max: usize },
    TypeNotAllowedForRole {
        kind: enums::NotificationType,
        role: enums::Role,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStudentName => write!(f, "student name cannot be empty"),
            Self::StudentNameTooLong { len, max } => {
                write!(f, "student name is {len} chars, max is {max}")
            }
            Self::EmptyParentName => write!(f, "parent name cannot be empty"),
            Self::ParentNameTooLong { len, max } => {
                write!(f, "parent name is {len} chars, max is {max}")
            }
            Self::InvalidEmail(email) => write!(f, "invalid email address: `{email}`"),
            Self::EmptyTitle => write!(f, "notification title cannot be empty"),
            Self::TitleTooLong { len, max } => {
                write!(f, "notification title is {len} chars, max is {max}")
            }
            Self::EmptyMessage => write!(f, "notification message cannot be empty"),
            Self::MessageTooLong { len, max } => {
                write!(f, "notification message is {len} chars, max is {max}")
            }
            Self::TypeNotAllowedForRole { kind, role } => {
                write!(f, "{role} accounts cannot send {kind} notifications")
            }
        }
    }
}

impl Error for ValidationError {}
