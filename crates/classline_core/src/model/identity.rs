//! Identity and actor records.
//!
//! # Responsibility
//! - Define the identity shape shared with the identity directory.
//! - Define the authenticated [`Actor`] handed to every service call.
//!
//! # Invariants
//! - `IdentityId` is stable and never reused for another account.
//! - An identity's role is assigned once and never changes afterwards.

use crate::model::enums::Role;
use crate::model::{ValidationError, PARENT_NAME_MAX_CHARS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every account in the identity directory.
pub type IdentityId = Uuid;

// Shape check only; deliverability is the mail system's problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Directory record for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub display_name: String,
    /// `None` until a role has been assigned.
    pub role: Option<Role>,
}

/// Authenticated caller of a service operation.
///
/// Session establishment and credential verification happen outside the
/// core; by the time an `Actor` exists, both are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: IdentityId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: IdentityId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Input for registering a new parent account.
///
/// The credential is opaque to the core; hashing and verification belong to
/// the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParent {
    pub full_name: String,
    pub email: String,
    pub credential: String,
}

impl NewParent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_chars = self.full_name.trim().chars().count();
        if name_chars == 0 {
            return Err(ValidationError::EmptyParentName);
        }
        if name_chars > PARENT_NAME_MAX_CHARS {
            return Err(ValidationError::ParentNameTooLong {
                len: name_chars,
                max: PARENT_NAME_MAX_CHARS,
            });
        }
        validate_email(&self.email)?;
        Ok(())
    }
}

/// Validates the lexical shape of an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_email, NewParent};
    use crate::model::ValidationError;

    #[test]
    fn email_shape_check() {
        assert!(validate_email("parent1@gmail.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        assert!(matches!(
            validate_email("not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("two@at@signs.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("spaces in@mail.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn new_parent_rejects_blank_and_oversized_names() {
        let mut parent = NewParent {
            full_name: "   ".to_string(),
            email: "p@x.com".to_string(),
            credential: "secret".to_string(),
        };
        assert_eq!(parent.validate(), Err(ValidationError::EmptyParentName));

        parent.full_name = "x".repeat(101);
        assert!(matches!(
            parent.validate(),
            Err(ValidationError::ParentNameTooLong { len: 101, max: 100 })
        ));
    }
}
