//! Shared portal enumerations.
//!
//! # Responsibility
//! - Define the fixed role, grade, notification-type and priority sets.
//! - Own the database label mapping used by validation and query filtering,
//!   so no caller keeps a private copy of these lists.
//!
//! # Invariants
//! - `ALL` slices define the canonical ordering of each enumeration.
//! - Labels round-trip: `parse_label(as_label(x)) == Some(x)`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Account role fixed at identity creation. Drives every authorization
/// decision in the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Office,
    Parent,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Teacher, Role::Office, Role::Parent];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::Office => "Office",
            Self::Parent => "Parent",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "Teacher" => Some(Self::Teacher),
            "Office" => Some(Self::Office),
            "Parent" => Some(Self::Parent),
            _ => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Classroom grade label attached to every student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    Grade7,
    Grade8,
}

impl Grade {
    /// Canonical grade ordering used by grouped listings.
    pub const ALL: [Grade; 8] = [
        Grade::Grade1,
        Grade::Grade2,
        Grade::Grade3,
        Grade::Grade4,
        Grade::Grade5,
        Grade::Grade6,
        Grade::Grade7,
        Grade::Grade8,
    ];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Grade1 => "Grade 1",
            Self::Grade2 => "Grade 2",
            Self::Grade3 => "Grade 3",
            Self::Grade4 => "Grade 4",
            Self::Grade5 => "Grade 5",
            Self::Grade6 => "Grade 6",
            Self::Grade7 => "Grade 7",
            Self::Grade8 => "Grade 8",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|grade| grade.as_label() == value)
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Notification category. Which categories an account may produce depends on
/// its role: teaching staff post attendance/academic items, office staff post
/// administrative/health items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Attendance,
    Academic,
    Administrative,
    Health,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [
        NotificationType::Attendance,
        NotificationType::Academic,
        NotificationType::Administrative,
        NotificationType::Health,
    ];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Attendance => "Attendance",
            Self::Academic => "Academic",
            Self::Administrative => "Administrative",
            Self::Health => "Health",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "Attendance" => Some(Self::Attendance),
            "Academic" => Some(Self::Academic),
            "Administrative" => Some(Self::Administrative),
            "Health" => Some(Self::Health),
            _ => None,
        }
    }

    /// Categories the given role is allowed to produce.
    pub fn allowed_for(role: Role) -> &'static [NotificationType] {
        match role {
            Role::Teacher => &[NotificationType::Attendance, NotificationType::Academic],
            Role::Office => &[
                NotificationType::Administrative,
                NotificationType::Health,
            ],
            Role::Parent => &[],
        }
    }

    pub fn producible_by(self, role: Role) -> bool {
        Self::allowed_for(role).contains(&self)
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Urgency tag on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
    Info,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Urgent, Priority::Info];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
            Self::Info => "Info",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "Normal" => Some(Self::Normal),
            "Urgent" => Some(Self::Urgent),
            "Info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::{Grade, NotificationType, Priority, Role};

    #[test]
    fn labels_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse_label(role.as_label()), Some(role));
        }
        for grade in Grade::ALL {
            assert_eq!(Grade::parse_label(grade.as_label()), Some(grade));
        }
        for kind in NotificationType::ALL {
            assert_eq!(NotificationType::parse_label(kind.as_label()), Some(kind));
        }
        for priority in Priority::ALL {
            assert_eq!(Priority::parse_label(priority.as_label()), Some(priority));
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!(Grade::parse_label("Grade 9"), None);
        assert_eq!(NotificationType::parse_label("Sports"), None);
        assert_eq!(Priority::parse_label("urgent"), None);
    }

    #[test]
    fn producible_kinds_split_by_role() {
        assert!(NotificationType::Attendance.producible_by(Role::Teacher));
        assert!(NotificationType::Academic.producible_by(Role::Teacher));
        assert!(!NotificationType::Academic.producible_by(Role::Office));
        assert!(NotificationType::Administrative.producible_by(Role::Office));
        assert!(NotificationType::Health.producible_by(Role::Office));
        for kind in NotificationType::ALL {
            assert!(!kind.producible_by(Role::Parent));
        }
    }
}
