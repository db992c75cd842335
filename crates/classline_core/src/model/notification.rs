//! Notification records and read-state lifecycle.
//!
//! # Responsibility
//! - Define the persisted notification shape and its creation input.
//!
//! # Invariants
//! - `is_read == true` iff `read_at.is_some()`.
//! - The unread-to-read transition happens at most once per notification;
//!   `read_at` is stamped on that transition and never rewritten.
//! - `created_by` and `created_at` are captured server-side at creation and
//!   are immutable.

use crate::model::enums::{NotificationType, Priority};
use crate::model::student::StudentId;
use crate::model::{ValidationError, MESSAGE_MAX_CHARS, TITLE_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// Store-assigned notification identifier, monotonically increasing.
pub type NotificationId = i64;

/// Persisted notification, joined with the student name it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub student_id: StudentId,
    pub student_name: String,
    pub title: String,
    pub message: String,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priority: Priority,
    pub is_read: bool,
    /// Read time in epoch milliseconds; set iff `is_read`.
    pub read_at: Option<i64>,
    /// Creator display name captured when the notification was posted.
    pub created_by: String,
    /// Creation time in epoch milliseconds, stamped by the store.
    pub created_at: i64,
}

/// Input for posting a notification about one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub student_id: StudentId,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub priority: Priority,
}

impl NewNotification {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_chars = self.title.trim().chars().count();
        if title_chars == 0 {
            return Err(ValidationError::EmptyTitle);
        }
        if title_chars > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong {
                len: title_chars,
                max: TITLE_MAX_CHARS,
            });
        }

        let message_chars = self.message.trim().chars().count();
        if message_chars == 0 {
            return Err(ValidationError::EmptyMessage);
        }
        if message_chars > MESSAGE_MAX_CHARS {
            return Err(ValidationError::MessageTooLong {
                len: message_chars,
                max: MESSAGE_MAX_CHARS,
            });
        }

        Ok(())
    }
}
