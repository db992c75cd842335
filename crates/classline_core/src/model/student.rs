//! Student records.
//!
//! # Responsibility
//! - Define the persisted student shape and its creation input.
//!
//! # Invariants
//! - `parent_id` must resolve to an identity with role Parent.
//! - `parent_id` never changes after creation; re-homing a student means
//!   delete plus recreate.

use crate::model::identity::IdentityId;
use crate::model::enums::Grade;
use crate::model::{ValidationError, STUDENT_NAME_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// Store-assigned student identifier, monotonically increasing.
pub type StudentId = i64;

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub grade: Grade,
    pub parent_id: IdentityId,
    /// Creation time in epoch milliseconds, stamped by the store.
    pub created_at: i64,
}

/// Student record joined with its parent's directory data, as shown on
/// office roster and search pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithParent {
    #[serde(flatten)]
    pub student: Student,
    pub parent_name: String,
    pub parent_email: String,
}

/// Input for creating a student, under a new or an existing parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub grade: Grade,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let chars = self.name.trim().chars().count();
        if chars == 0 {
            return Err(ValidationError::EmptyStudentName);
        }
        if chars > STUDENT_NAME_MAX_CHARS {
            return Err(ValidationError::StudentNameTooLong {
                len: chars,
                max: STUDENT_NAME_MAX_CHARS,
            });
        }
        Ok(())
    }
}
