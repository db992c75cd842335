use classline_core::db::open_db_in_memory;
use classline_core::{
    Actor, Grade, IdentityProvider, NewParent, NewStudent, PortalError, Role,
    SqliteIdentityDirectory, SqliteStudentRepository, StudentDirectoryService, StudentSearchQuery,
};
use rusqlite::Connection;

type SqliteDirectoryService<'c> =
    StudentDirectoryService<SqliteIdentityDirectory<'c>, SqliteStudentRepository<'c>>;

fn directory_service(conn: &Connection) -> SqliteDirectoryService<'_> {
    StudentDirectoryService::new(
        SqliteIdentityDirectory::try_new(conn).unwrap(),
        SqliteStudentRepository::try_new(conn).unwrap(),
    )
}

fn office_actor(conn: &Connection) -> Actor {
    let directory = SqliteIdentityDirectory::try_new(conn).unwrap();
    let id = directory
        .create_identity("office@school.com", "Office Admin", "secret")
        .unwrap();
    directory.assign_role(id, Role::Office).unwrap();
    Actor::new(id, Role::Office)
}

fn register(
    service: &SqliteDirectoryService<'_>,
    office: &Actor,
    parent_name: &str,
    email: &str,
    student: &str,
    grade: Grade,
) {
    service
        .register_parent_and_student(
            office,
            &NewParent {
                full_name: parent_name.to_string(),
                email: email.to_string(),
                credential: "Parent@123".to_string(),
            },
            &NewStudent {
                name: student.to_string(),
                grade,
            },
        )
        .unwrap();
}

fn seeded(conn: &Connection) -> (SqliteDirectoryService<'_>, Actor) {
    let office = office_actor(conn);
    let service = directory_service(conn);
    register(
        &service,
        &office,
        "Mohammed Ahmed",
        "p1@x.com",
        "Ali Ahmed",
        Grade::Grade1,
    );
    register(
        &service,
        &office,
        // Parent name carries "ali" as a substring.
        "Khalid Omar",
        "p2@x.com",
        "Zara Omar",
        Grade::Grade2,
    );
    register(
        &service,
        &office,
        "Hassan Ibrahim",
        "p3@x.com",
        "Omar Hassan",
        Grade::Grade1,
    );
    (service, office)
}

#[test]
fn term_matches_student_and_parent_names_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let (service, office) = seeded(&conn);

    let result = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "ali".to_string(),
                grade: None,
            },
        )
        .unwrap();

    let names: Vec<&str> = result
        .results
        .iter()
        .map(|record| record.student.name.as_str())
        .collect();
    // "Ali Ahmed" by student name, "Zara Omar" through parent "Khalid".
    assert_eq!(names, ["Ali Ahmed", "Zara Omar"]);
    assert_eq!(result.total_results, 2);

    let upper = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "ALI".to_string(),
                grade: None,
            },
        )
        .unwrap();
    assert_eq!(upper.total_results, 2);
}

#[test]
fn term_matches_parent_email() {
    let conn = open_db_in_memory().unwrap();
    let (service, office) = seeded(&conn);

    let result = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "p3@".to_string(),
                grade: None,
            },
        )
        .unwrap();

    assert_eq!(result.total_results, 1);
    assert_eq!(result.results[0].student.name, "Omar Hassan");
}

#[test]
fn empty_term_returns_everything_ordered_by_name() {
    let conn = open_db_in_memory().unwrap();
    let (service, office) = seeded(&conn);

    let result = service
        .search(&office, &StudentSearchQuery::default())
        .unwrap();

    let names: Vec<&str> = result
        .results
        .iter()
        .map(|record| record.student.name.as_str())
        .collect();
    assert_eq!(names, ["Ali Ahmed", "Omar Hassan", "Zara Omar"]);
}

#[test]
fn grade_filter_is_exact_and_combines_with_term() {
    let conn = open_db_in_memory().unwrap();
    let (service, office) = seeded(&conn);

    let grade_only = service
        .search(
            &office,
            &StudentSearchQuery {
                term: String::new(),
                grade: Some(Grade::Grade1),
            },
        )
        .unwrap();
    assert_eq!(grade_only.total_results, 2);

    let combined = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "hassan".to_string(),
                grade: Some(Grade::Grade1),
            },
        )
        .unwrap();
    assert_eq!(combined.total_results, 1);
    assert_eq!(combined.results[0].student.name, "Omar Hassan");

    let no_match = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "zara".to_string(),
                grade: Some(Grade::Grade1),
            },
        )
        .unwrap();
    assert!(no_match.results.is_empty());
    assert_eq!(no_match.total_results, 0);
}

#[test]
fn sql_wildcards_in_the_term_are_literal() {
    let conn = open_db_in_memory().unwrap();
    let (service, office) = seeded(&conn);

    let result = service
        .search(
            &office,
            &StudentSearchQuery {
                term: "%".to_string(),
                grade: None,
            },
        )
        .unwrap();
    assert!(result.results.is_empty());
}

#[test]
fn search_is_office_only() {
    let conn = open_db_in_memory().unwrap();
    let (service, _office) = seeded(&conn);

    let directory = SqliteIdentityDirectory::try_new(&conn).unwrap();
    let teacher_id = directory
        .create_identity("t@school.com", "Teacher", "secret")
        .unwrap();
    directory.assign_role(teacher_id, Role::Teacher).unwrap();

    let err = service
        .search(
            &Actor::new(teacher_id, Role::Teacher),
            &StudentSearchQuery::default(),
        )
        .unwrap_err();
    assert!(matches!(err, PortalError::Forbidden));
}
