//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate policy, identity and repository calls into the operations
//!   the presentation layer consumes.
//! - Map layer-specific failures onto the single [`PortalError`] surface.
//!
//! # Invariants
//! - Every operation checks the policy engine before touching the store.
//! - Mutations either succeed returning the affected id(s)/counts, or fail
//!   with exactly one error kind and no unreported partial effect.

use crate::identity::IdentityError;
use crate::model::enums::Role;
use crate::model::identity::Actor;
use crate::model::notification::NotificationId;
use crate::model::student::StudentId;
use crate::model::ValidationError;
use crate::policy::{decide, Action};
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dashboard;
pub mod notification_service;
pub mod student_service;

pub type PortalResult<T> = Result<T, PortalError>;

/// Unified error surface exposed to the presentation layer.
///
/// All variants are locally recoverable; `Store` wraps opaque persistence
/// failures that the core does not retry.
#[derive(Debug)]
pub enum PortalError {
    Validation(ValidationError),
    StudentNotFound(StudentId),
    NotificationNotFound(NotificationId),
    /// No identity is registered under the given email.
    ParentNotFound(String),
    /// The policy engine denied the action. Distinct from the not-found
    /// kinds so callers can avoid leaking record existence.
    Forbidden,
    DuplicateIdentity(String),
    /// The referenced identity exists but does not carry the Parent role.
    RoleMismatch {
        email: String,
        actual: Option<Role>,
    },
    Store(StoreFailure),
}

/// Opaque store-level failure, preserved for diagnostics.
#[derive(Debug)]
pub enum StoreFailure {
    Repo(RepoError),
    Identity(IdentityError),
}

impl Display for PortalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
            Self::ParentNotFound(email) => write!(f, "no parent registered under `{email}`"),
            Self::Forbidden => write!(f, "action not permitted for this account"),
            Self::DuplicateIdentity(email) => write!(f, "email already registered: `{email}`"),
            Self::RoleMismatch { email, actual } => match actual {
                Some(role) => write!(f, "`{email}` is a {role} account, not a Parent"),
                None => write!(f, "`{email}` has no role assigned yet"),
            },
            Self::Store(failure) => write!(f, "{failure}"),
        }
    }
}

impl Display for StoreFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Identity(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PortalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(StoreFailure::Repo(err)) => Some(err),
            Self::Store(StoreFailure::Identity(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for PortalError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PortalError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::StudentNotFound(id) => Self::StudentNotFound(id),
            RepoError::NotificationNotFound(id) => Self::NotificationNotFound(id),
            other => Self::Store(StoreFailure::Repo(other)),
        }
    }
}

impl From<IdentityError> for PortalError {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::DuplicateEmail(email) => Self::DuplicateIdentity(email),
            other => Self::Store(StoreFailure::Identity(other)),
        }
    }
}

/// Gate every service operation through the policy engine.
pub(crate) fn authorize(actor: &Actor, action: &Action) -> PortalResult<()> {
    if decide(actor, action).is_allowed() {
        Ok(())
    } else {
        warn!(
            "event=access_denied module=policy status=deny role={} action={:?}",
            actor.role, action
        );
        Err(PortalError::Forbidden)
    }
}
