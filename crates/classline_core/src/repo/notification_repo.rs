//! Notification repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide creation, read-state transition and query APIs over the
//!   `notifications` table.
//!
//! # Invariants
//! - Read-state transitions are guarded by `is_read = 0` in SQL, so a
//!   duplicate invocation never rewrites `read_at`.
//! - `mark_all_read_for_parent` is a single UPDATE statement; the store
//!   applies it as one atomic batch.
//! - "Newest first" is `created_at DESC, id DESC` everywhere.

use crate::model::enums::{NotificationType, Priority};
use crate::model::identity::IdentityId;
use crate::model::notification::{NewNotification, Notification, NotificationId};
use crate::repo::{ensure_connection_ready, int_to_bool, RepoError, RepoResult, RequiredTable};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    n.id,
    n.student_id,
    s.name AS student_name,
    n.title,
    n.message,
    n.type,
    n.priority,
    n.is_read,
    n.read_at,
    n.created_by,
    n.created_at
FROM notifications n
JOIN students s ON s.id = n.student_id";

const NEWEST_FIRST: &str = " ORDER BY n.created_at DESC, n.id DESC";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "notifications",
        columns: &[
            "id",
            "student_id",
            "title",
            "message",
            "type",
            "priority",
            "is_read",
            "read_at",
            "created_by",
            "created_at",
        ],
    },
    RequiredTable {
        name: "students",
        columns: &["id", "name", "parent_id"],
    },
];

/// Repository interface for notification lifecycle operations.
pub trait NotificationRepository {
    /// Persists a new unread notification and returns its id.
    fn create_notification(
        &self,
        input: &NewNotification,
        created_by: &str,
    ) -> RepoResult<NotificationId>;
    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<Notification>>;
    /// Resolves notification -> student -> parent identity, or `None` when
    /// the id does not exist.
    fn resolve_owner(&self, id: NotificationId) -> RepoResult<Option<IdentityId>>;
    /// Transitions unread -> read, stamping `read_at` once. Returns whether
    /// this call performed the transition.
    fn mark_read(&self, id: NotificationId) -> RepoResult<bool>;
    /// Transitions every unread notification of the parent's students in one
    /// statement. Returns the number of rows transitioned.
    fn mark_all_read_for_parent(&self, parent_id: IdentityId) -> RepoResult<usize>;
    fn list_for_creator(
        &self,
        created_by: &str,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Notification>>;
    fn count_for_creator(&self, created_by: &str) -> RepoResult<u64>;
    fn list_all(&self, limit: Option<u32>) -> RepoResult<Vec<Notification>>;
    fn count_all(&self) -> RepoResult<u64>;
    fn list_for_parent(&self, parent_id: IdentityId) -> RepoResult<Vec<Notification>>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn create_notification(
        &self,
        input: &NewNotification,
        created_by: &str,
    ) -> RepoResult<NotificationId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO notifications (student_id, title, message, type, priority, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                input.student_id,
                input.title.trim(),
                input.message.trim(),
                input.kind.as_label(),
                input.priority.as_label(),
                created_by,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_notification(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTIFICATION_SELECT_SQL} WHERE n.id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notification_row(row)?));
        }

        Ok(None)
    }

    fn resolve_owner(&self, id: NotificationId) -> RepoResult<Option<IdentityId>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.parent_id
             FROM notifications n
             JOIN students s ON s.id = n.student_id
             WHERE n.id = ?1;",
        )?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            let parent_text: String = row.get("parent_id")?;
            let parent_id = Uuid::parse_str(&parent_text).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid uuid value `{parent_text}` in students.parent_id"
                ))
            })?;
            return Ok(Some(parent_id));
        }

        Ok(None)
    }

    fn mark_read(&self, id: NotificationId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notifications
             SET is_read = 1, read_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND is_read = 0;",
            params![id],
        )?;

        Ok(changed > 0)
    }

    fn mark_all_read_for_parent(&self, parent_id: IdentityId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE notifications
             SET is_read = 1, read_at = (strftime('%s', 'now') * 1000)
             WHERE is_read = 0
               AND student_id IN (SELECT id FROM students WHERE parent_id = ?1);",
            params![parent_id.to_string()],
        )?;

        Ok(changed)
    }

    fn list_for_creator(
        &self,
        created_by: &str,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Notification>> {
        let mut sql = format!("{NOTIFICATION_SELECT_SQL} WHERE n.created_by = ?{NEWEST_FIRST}");
        let mut bind_values: Vec<Value> = vec![Value::Text(created_by.to_string())];
        push_limit(&mut sql, &mut bind_values, limit);

        self.query_notifications(&sql, bind_values)
    }

    fn count_for_creator(&self, created_by: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE created_by = ?1;",
            params![created_by],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn list_all(&self, limit: Option<u32>) -> RepoResult<Vec<Notification>> {
        let mut sql = format!("{NOTIFICATION_SELECT_SQL}{NEWEST_FIRST}");
        let mut bind_values: Vec<Value> = Vec::new();
        push_limit(&mut sql, &mut bind_values, limit);

        self.query_notifications(&sql, bind_values)
    }

    fn count_all(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notifications;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn list_for_parent(&self, parent_id: IdentityId) -> RepoResult<Vec<Notification>> {
        let sql = format!(
            "{NOTIFICATION_SELECT_SQL}
             WHERE s.parent_id = ?{NEWEST_FIRST}"
        );
        let bind_values = vec![Value::Text(parent_id.to_string())];

        self.query_notifications(&sql, bind_values)
    }
}

impl SqliteNotificationRepository<'_> {
    fn query_notifications(
        &self,
        sql: &str,
        bind_values: Vec<Value>,
    ) -> RepoResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }
        Ok(notifications)
    }
}

fn push_limit(sql: &mut String, bind_values: &mut Vec<Value>, limit: Option<u32>) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let type_text: String = row.get("type")?;
    let kind = NotificationType::parse_label(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notification type `{type_text}` in notifications.type"
        ))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse_label(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in notifications.priority"
        ))
    })?;

    let is_read = int_to_bool(row.get::<_, i64>("is_read")?, "notifications.is_read")?;
    let read_at: Option<i64> = row.get("read_at")?;
    if is_read != read_at.is_some() {
        return Err(RepoError::InvalidData(format!(
            "read flag and read timestamp disagree for notification {}",
            row.get::<_, i64>("id")?
        )));
    }

    Ok(Notification {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        student_name: row.get("student_name")?,
        title: row.get("title")?,
        message: row.get("message")?,
        kind,
        priority,
        is_read,
        read_at,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
    })
}
