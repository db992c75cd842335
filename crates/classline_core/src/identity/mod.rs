//! Identity provider boundary and SQLite-backed directory.
//!
//! # Responsibility
//! - Define the [`IdentityProvider`] contract the core consumes: email
//!   lookup, identity creation and one-time role assignment.
//! - Provide the SQLite-backed directory used by seed data and tests.
//!
//! # Invariants
//! - Emails are unique, compared case-insensitively.
//! - A role is assigned at most once; re-assigning the same role is a
//!   no-op, switching roles is rejected.
//! - Credentials are opaque to the core; hashing and verification happen
//!   outside it, as does session establishment (the `Actor` handed to
//!   services is the output of that step).

use crate::db::DbError;
use crate::model::enums::Role;
use crate::model::identity::{Identity, IdentityId};
use crate::repo::{ensure_connection_ready, RepoResult, RequiredTable};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const IDENTITY_SELECT_SQL: &str = "SELECT id, email, display_name, role FROM identities";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "identities",
    columns: &["id", "email", "display_name", "credential", "role"],
}];

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Error surface of the identity directory.
#[derive(Debug)]
pub enum IdentityError {
    /// The email is already registered to another identity.
    DuplicateEmail(String),
    /// The identity id does not resolve.
    UnknownIdentity(IdentityId),
    /// The identity already carries a different role.
    RoleAlreadyAssigned { id: IdentityId, existing: Role },
    Db(DbError),
    InvalidData(String),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => write!(f, "email already registered: `{email}`"),
            Self::UnknownIdentity(id) => write!(f, "unknown identity: {id}"),
            Self::RoleAlreadyAssigned { id, existing } => {
                write!(f, "identity {id} already has role {existing}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted identity data: {message}"),
        }
    }
}

impl Error for IdentityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for IdentityError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for IdentityError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Contract the core consumes from the identity system.
pub trait IdentityProvider {
    fn find_by_email(&self, email: &str) -> IdentityResult<Option<Identity>>;
    fn get_identity(&self, id: IdentityId) -> IdentityResult<Option<Identity>>;
    /// Creates an identity with no role yet and returns its id.
    fn create_identity(
        &self,
        email: &str,
        display_name: &str,
        credential: &str,
    ) -> IdentityResult<IdentityId>;
    /// Fixes the identity's role. One-shot; same-role repeats are no-ops.
    fn assign_role(&self, id: IdentityId, role: Role) -> IdentityResult<()>;
}

/// SQLite-backed identity directory.
pub struct SqliteIdentityDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIdentityDirectory<'conn> {
    /// Constructs a directory from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl IdentityProvider for SqliteIdentityDirectory<'_> {
    fn find_by_email(&self, email: &str) -> IdentityResult<Option<Identity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IDENTITY_SELECT_SQL} WHERE email = ?1;"))?;

        let mut rows = stmt.query(params![email.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_identity_row(row)?));
        }

        Ok(None)
    }

    fn get_identity(&self, id: IdentityId) -> IdentityResult<Option<Identity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IDENTITY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_identity_row(row)?));
        }

        Ok(None)
    }

    fn create_identity(
        &self,
        email: &str,
        display_name: &str,
        credential: &str,
    ) -> IdentityResult<IdentityId> {
        let email = email.trim();
        if self.find_by_email(email)?.is_some() {
            return Err(IdentityError::DuplicateEmail(email.to_string()));
        }

        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO identities (id, email, display_name, credential)
                 VALUES (?1, ?2, ?3, ?4);",
                params![id.to_string(), email, display_name, credential],
            )
            .map_err(|err| map_insert_error(err, email))?;

        Ok(id)
    }

    fn assign_role(&self, id: IdentityId, role: Role) -> IdentityResult<()> {
        let identity = self
            .get_identity(id)?
            .ok_or(IdentityError::UnknownIdentity(id))?;

        match identity.role {
            Some(existing) if existing == role => Ok(()),
            Some(existing) => Err(IdentityError::RoleAlreadyAssigned { id, existing }),
            None => {
                self.conn.execute(
                    "UPDATE identities SET role = ?1 WHERE id = ?2;",
                    params![role.as_label(), id.to_string()],
                )?;
                Ok(())
            }
        }
    }
}

fn parse_identity_row(row: &Row<'_>) -> IdentityResult<Identity> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        IdentityError::InvalidData(format!("invalid uuid value `{id_text}` in identities.id"))
    })?;

    let role = match row.get::<_, Option<String>>("role")? {
        Some(value) => Some(Role::parse_label(&value).ok_or_else(|| {
            IdentityError::InvalidData(format!("invalid role `{value}` in identities.role"))
        })?),
        None => None,
    };

    Ok(Identity {
        id,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        role,
    })
}

/// Maps a unique-constraint failure on the email column to the semantic
/// duplicate error, covering the lost race between check and insert.
fn map_insert_error(err: rusqlite::Error, email: &str) -> IdentityError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return IdentityError::DuplicateEmail(email.to_string());
        }
    }
    IdentityError::Db(DbError::Sqlite(err))
}
