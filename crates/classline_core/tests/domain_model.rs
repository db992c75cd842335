use classline_core::{
    Grade, Notification, NotificationType, Priority, Role, Student, StudentWithParent,
};
use uuid::Uuid;

#[test]
fn notification_serialization_uses_expected_wire_fields() {
    let notification = Notification {
        id: 7,
        student_id: 3,
        student_name: "Ali Ahmed".to_string(),
        title: "Monthly Exam Results".to_string(),
        message: "Total Marks: 450/500.".to_string(),
        kind: NotificationType::Academic,
        priority: Priority::Urgent,
        is_read: true,
        read_at: Some(1_700_000_360_000),
        created_by: "Ahmed Hassan (Teacher)".to_string(),
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["type"], "academic");
    assert_eq!(json["priority"], "urgent");
    assert_eq!(json["is_read"], true);
    assert_eq!(json["read_at"], 1_700_000_360_000_i64);
    assert_eq!(json["created_by"], "Ahmed Hassan (Teacher)");

    let decoded: Notification = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, notification);
}

#[test]
fn student_with_parent_flattens_the_student_fields() {
    let parent_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let record = StudentWithParent {
        student: Student {
            id: 3,
            name: "Ali Ahmed".to_string(),
            grade: Grade::Grade1,
            parent_id,
            created_at: 1_700_000_000_000,
        },
        parent_name: "Mohammed Ahmed".to_string(),
        parent_email: "parent1@gmail.com".to_string(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["name"], "Ali Ahmed");
    assert_eq!(json["grade"], "grade1");
    assert_eq!(json["parent_id"], parent_id.to_string());
    assert_eq!(json["parent_name"], "Mohammed Ahmed");
    assert_eq!(json["parent_email"], "parent1@gmail.com");

    let decoded: StudentWithParent = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn role_labels_match_directory_values() {
    assert_eq!(Role::Teacher.as_label(), "Teacher");
    assert_eq!(Role::parse_label("Parent"), Some(Role::Parent));
    assert_eq!(Role::parse_label("parent"), None);
}

#[test]
fn grade_enumeration_order_is_stable() {
    let labels: Vec<&str> = Grade::ALL.iter().map(|grade| grade.as_label()).collect();
    assert_eq!(
        labels,
        [
            "Grade 1", "Grade 2", "Grade 3", "Grade 4", "Grade 5", "Grade 6", "Grade 7", "Grade 8"
        ]
    );
}
