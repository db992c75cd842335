//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `parent_id` is written once at creation; no update path touches it.
//! - Deleting a student cascades to its notifications via the schema FK.
//! - Delete is idempotent; a missing id is reported as `false`, not an error.

use crate::model::enums::Grade;
use crate::model::identity::IdentityId;
use crate::model::student::{NewStudent, Student, StudentId, StudentWithParent};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult, RequiredTable};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const STUDENT_SELECT_SQL: &str = "SELECT
    s.id,
    s.name,
    s.grade,
    s.parent_id,
    s.created_at,
    i.display_name AS parent_name,
    i.email AS parent_email
FROM students s
JOIN identities i ON i.id = s.parent_id";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "students",
        columns: &["id", "name", "grade", "parent_id", "created_at"],
    },
    RequiredTable {
        name: "identities",
        columns: &["id", "email", "display_name", "role"],
    },
];

/// Search filter: case-insensitive substring of `term` against student name,
/// parent name or parent email, optionally combined with an exact grade.
/// An empty term means no name filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentSearchQuery {
    pub term: String,
    pub grade: Option<Grade>,
}

/// Repository interface for student directory operations.
pub trait StudentRepository {
    fn create_student(&self, parent_id: IdentityId, input: &NewStudent) -> RepoResult<StudentId>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<StudentWithParent>>;
    /// Overwrites name and grade only; the parent reference is immutable.
    fn update_student(&self, id: StudentId, name: &str, grade: Grade) -> RepoResult<()>;
    /// Returns whether a row was removed. Missing ids are a no-op.
    fn delete_student(&self, id: StudentId) -> RepoResult<bool>;
    /// All students with parent info, ordered by grade then name ascending.
    fn list_all(&self) -> RepoResult<Vec<StudentWithParent>>;
    /// Matching students ordered by name ascending.
    fn search(&self, query: &StudentSearchQuery) -> RepoResult<Vec<StudentWithParent>>;
    fn list_for_parent(&self, parent_id: IdentityId) -> RepoResult<Vec<Student>>;
    fn count_students(&self) -> RepoResult<u64>;
    fn count_grades_in_use(&self) -> RepoResult<u64>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, parent_id: IdentityId, input: &NewStudent) -> RepoResult<StudentId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO students (name, grade, parent_id) VALUES (?1, ?2, ?3);",
            params![
                input.name.trim(),
                input.grade.as_label(),
                parent_id.to_string(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<StudentWithParent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE s.id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn update_student(&self, id: StudentId, name: &str, grade: Grade) -> RepoResult<()> {
        let input = NewStudent {
            name: name.to_string(),
            grade,
        };
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE students SET name = ?1, grade = ?2 WHERE id = ?3;",
            params![name.trim(), grade.as_label(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::StudentNotFound(id));
        }

        Ok(())
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }

    fn list_all(&self) -> RepoResult<Vec<StudentWithParent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL} ORDER BY s.grade ASC, s.name ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn search(&self, query: &StudentSearchQuery) -> RepoResult<Vec<StudentWithParent>> {
        let mut sql = format!("{STUDENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        let term = query.term.trim();
        if !term.is_empty() {
            sql.push_str(
                " AND (s.name LIKE ? ESCAPE '\\'
                   OR i.display_name LIKE ? ESCAPE '\\'
                   OR i.email LIKE ? ESCAPE '\\')",
            );
            let pattern = Value::Text(like_pattern(term));
            bind_values.push(pattern.clone());
            bind_values.push(pattern.clone());
            bind_values.push(pattern);
        }

        if let Some(grade) = query.grade {
            sql.push_str(" AND s.grade = ?");
            bind_values.push(Value::Text(grade.as_label().to_string()));
        }

        sql.push_str(" ORDER BY s.name ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn list_for_parent(&self, parent_id: IdentityId) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, grade, parent_id, created_at
             FROM students
             WHERE parent_id = ?1
             ORDER BY name ASC;",
        )?;

        let mut rows = stmt.query(params![parent_id.to_string()])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_bare_student_row(row)?);
        }

        Ok(students)
    }

    fn count_students(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_grades_in_use(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT grade) FROM students;",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<StudentWithParent> {
    Ok(StudentWithParent {
        student: parse_bare_student_row(row)?,
        parent_name: row.get("parent_name")?,
        parent_email: row.get("parent_email")?,
    })
}

fn parse_bare_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let grade_text: String = row.get("grade")?;
    let grade = Grade::parse_label(&grade_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid grade `{grade_text}` in students.grade"))
    })?;

    let parent_text: String = row.get("parent_id")?;
    let parent_id = Uuid::parse_str(&parent_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{parent_text}` in students.parent_id"
        ))
    })?;

    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        grade,
        parent_id,
        created_at: row.get("created_at")?,
    })
}

/// Builds a `LIKE` pattern matching `term` as a substring, with SQL
/// wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ali"), "%ali%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
