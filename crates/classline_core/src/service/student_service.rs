//! Student directory service.
//!
//! # Responsibility
//! - Office-facing CRUD and query operations over the student roster.
//! - Parent registration: identity creation plus first student, as one
//!   logical unit.
//!
//! # Invariants
//! - Every operation is gated by the policy engine; mutations are
//!   Office-only, the children listing is scoped to the requesting parent.
//! - A student's parent reference is fixed at creation; `update_student`
//!   only ever rewrites name and grade.
//! - All input validation happens before the first store write, so the
//!   registration sequence cannot fail on bad input halfway through.

use crate::identity::IdentityProvider;
use crate::model::enums::{Grade, Role};
use crate::model::identity::{Actor, IdentityId, NewParent};
use crate::model::student::{NewStudent, Student, StudentId, StudentWithParent};
use crate::policy::Action;
use crate::repo::student_repo::{StudentRepository, StudentSearchQuery};
use crate::service::{authorize, PortalError, PortalResult};
use log::info;

/// Ids produced by a successful parent registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyRegistration {
    pub parent_id: IdentityId,
    pub student_id: StudentId,
}

/// One grade bucket of the office roster view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRoster {
    pub grade: Grade,
    pub students: Vec<StudentWithParent>,
}

/// Roster grouped by grade, grades in enumeration order, students within a
/// grade by name ascending. Grades with no students are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryByGrade {
    pub grades: Vec<GradeRoster>,
    pub total_students: usize,
    pub total_grades: usize,
}

/// Search outcome with the result count the office view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSearchResult {
    pub results: Vec<StudentWithParent>,
    pub total_results: usize,
}

/// Roster-wide counts for the office dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryTotals {
    pub students: u64,
    pub grades: u64,
}

/// Use-case service for the student directory.
pub struct StudentDirectoryService<I: IdentityProvider, R: StudentRepository> {
    identities: I,
    students: R,
}

impl<I: IdentityProvider, R: StudentRepository> StudentDirectoryService<I, R> {
    pub fn new(identities: I, students: R) -> Self {
        Self {
            identities,
            students,
        }
    }

    /// Registers a parent account and its first student.
    ///
    /// # Contract
    /// - Fails with `DuplicateIdentity` when the email is taken.
    /// - Fails with `Validation` before any store write.
    /// - The created identity's role is fixed to Parent.
    ///
    /// Callers that need the identity and student writes committed as one
    /// store batch run this over a transaction-scoped connection.
    pub fn register_parent_and_student(
        &self,
        actor: &Actor,
        parent: &NewParent,
        student: &NewStudent,
    ) -> PortalResult<FamilyRegistration> {
        authorize(actor, &Action::RegisterParentAndStudent)?;
        parent.validate()?;
        student.validate()?;

        if self.identities.find_by_email(&parent.email)?.is_some() {
            return Err(PortalError::DuplicateIdentity(
                parent.email.trim().to_string(),
            ));
        }

        let parent_id = self.identities.create_identity(
            &parent.email,
            parent.full_name.trim(),
            &parent.credential,
        )?;
        self.identities.assign_role(parent_id, Role::Parent)?;
        let student_id = self.students.create_student(parent_id, student)?;

        info!(
            "event=parent_registered module=student_service status=ok parent_id={parent_id} student_id={student_id}"
        );
        Ok(FamilyRegistration {
            parent_id,
            student_id,
        })
    }

    /// Adds a student under an existing parent, resolved by email.
    ///
    /// # Contract
    /// - `ParentNotFound` when no identity carries the email.
    /// - `RoleMismatch` when the identity exists with a non-Parent role.
    pub fn add_child(
        &self,
        actor: &Actor,
        parent_email: &str,
        student: &NewStudent,
    ) -> PortalResult<StudentId> {
        authorize(actor, &Action::AddChild)?;
        student.validate()?;

        let identity = self
            .identities
            .find_by_email(parent_email)?
            .ok_or_else(|| PortalError::ParentNotFound(parent_email.trim().to_string()))?;

        if identity.role != Some(Role::Parent) {
            return Err(PortalError::RoleMismatch {
                email: identity.email,
                actual: identity.role,
            });
        }

        let student_id = self.students.create_student(identity.id, student)?;
        info!(
            "event=student_added module=student_service status=ok parent_id={} student_id={student_id}",
            identity.id
        );
        Ok(student_id)
    }

    /// Fetches one student with parent info for the office edit view.
    pub fn get_student(&self, actor: &Actor, id: StudentId) -> PortalResult<StudentWithParent> {
        authorize(actor, &Action::ManageStudents)?;
        self.students
            .get_student(id)?
            .ok_or(PortalError::StudentNotFound(id))
    }

    /// Overwrites a student's name and grade. The parent reference is
    /// immutable; re-homing goes through delete plus recreate.
    pub fn update_student(
        &self,
        actor: &Actor,
        id: StudentId,
        name: &str,
        grade: Grade,
    ) -> PortalResult<()> {
        authorize(actor, &Action::ManageStudents)?;
        self.students.update_student(id, name, grade)?;
        info!("event=student_updated module=student_service status=ok student_id={id}");
        Ok(())
    }

    /// Deletes a student and, through the store cascade, all notifications
    /// referencing it. Deleting a missing id is a no-op.
    pub fn delete_student(&self, actor: &Actor, id: StudentId) -> PortalResult<bool> {
        authorize(actor, &Action::ManageStudents)?;
        let removed = self.students.delete_student(id)?;
        info!(
            "event=student_deleted module=student_service status=ok student_id={id} removed={removed}"
        );
        Ok(removed)
    }

    /// Office roster grouped by grade.
    pub fn list_by_grade(&self, actor: &Actor) -> PortalResult<DirectoryByGrade> {
        authorize(actor, &Action::ManageStudents)?;

        let all = self.students.list_all()?;
        let total_students = all.len();

        let mut grades = Vec::new();
        for grade in Grade::ALL {
            let students: Vec<StudentWithParent> = all
                .iter()
                .filter(|record| record.student.grade == grade)
                .cloned()
                .collect();
            if !students.is_empty() {
                grades.push(GradeRoster { grade, students });
            }
        }

        Ok(DirectoryByGrade {
            total_grades: grades.len(),
            total_students,
            grades,
        })
    }

    /// Searches students by name, parent name or parent email, with an
    /// optional exact grade filter.
    pub fn search(
        &self,
        actor: &Actor,
        query: &StudentSearchQuery,
    ) -> PortalResult<StudentSearchResult> {
        authorize(actor, &Action::ManageStudents)?;
        let results = self.students.search(query)?;
        Ok(StudentSearchResult {
            total_results: results.len(),
            results,
        })
    }

    /// Children of the requesting parent, for the parent dashboard.
    pub fn list_children(&self, actor: &Actor) -> PortalResult<Vec<Student>> {
        authorize(actor, &Action::ViewChildNotifications { owner: actor.id })?;
        Ok(self.students.list_for_parent(actor.id)?)
    }

    /// Roster-wide counts for the office dashboard.
    pub fn directory_totals(&self, actor: &Actor) -> PortalResult<DirectoryTotals> {
        authorize(actor, &Action::ManageStudents)?;
        Ok(DirectoryTotals {
            students: self.students.count_students()?,
            grades: self.students.count_grades_in_use()?,
        })
    }
}
