use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    pub fn code(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(UserRole::Student),
            "instructor" => Ok(UserRole::Instructor),
            "admin" => Ok(UserRole::Admin),
            other => Err(DataError::validation(format!("unknown user role '{other}'"))),
        }
    }
}

/// Stored as a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "varchar")]
pub enum CourseStatus {
    #[default]
    #[serde(rename = "Y")]
    #[sqlx(rename = "Y")]
    Pending,
    #[serde(rename = "O")]
    #[sqlx(rename = "O")]
    Published,
}

impl CourseStatus {
    pub fn code(self) -> &'static str {
        match self {
            CourseStatus::Pending => "Y",
            CourseStatus::Published => "O",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseStatus::Pending => "Pending",
            CourseStatus::Published => "Published",
        }
    }

    /// Publication is one-way.
    pub fn can_transition_to(self, next: CourseStatus) -> bool {
        matches!((self, next), (CourseStatus::Pending, CourseStatus::Published))
    }
}

impl FromStr for CourseStatus {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Y" => Ok(CourseStatus::Pending),
            "O" => Ok(CourseStatus::Published),
            other => Err(DataError::validation(format!("unknown course status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[sqlx(type_name = "varchar")]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "P")]
    #[sqlx(rename = "P")]
    Pending,
    #[serde(rename = "C")]
    #[sqlx(rename = "C")]
    Completed,
    #[serde(rename = "F")]
    #[sqlx(rename = "F")]
    Failed,
}

impl PaymentStatus {
    pub fn code(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "P",
            PaymentStatus::Completed => "C",
            PaymentStatus::Failed => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Complete",
            PaymentStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }
}

impl FromStr for PaymentStatus {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "P" => Ok(PaymentStatus::Pending),
            "C" => Ok(PaymentStatus::Completed),
            "F" => Ok(PaymentStatus::Failed),
            other => Err(DataError::validation(format!("unknown payment status '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_accepts_only_known_codes() {
        assert_eq!("P".parse::<PaymentStatus>().unwrap(), PaymentStatus::Pending);
        assert_eq!("C".parse::<PaymentStatus>().unwrap(), PaymentStatus::Completed);
        assert_eq!("F".parse::<PaymentStatus>().unwrap(), PaymentStatus::Failed);

        for invalid in ["", "p", "X", "Pending", "PC"] {
            let err = invalid.parse::<PaymentStatus>().unwrap_err();
            assert!(matches!(err, DataError::Validation(_)), "{invalid}");
        }
    }

    #[test]
    fn payment_status_rejects_unknown_codes_in_json() {
        let parsed: PaymentStatus = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Completed);
        assert!(serde_json::from_str::<PaymentStatus>("\"Z\"").is_err());
    }

    #[test]
    fn payment_transitions_end_in_terminal_states() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Completed, Failed] {
            assert!(terminal.is_terminal());
            for next in [Pending, Completed, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn course_publication_is_one_way() {
        assert!(CourseStatus::Pending.can_transition_to(CourseStatus::Published));
        assert!(!CourseStatus::Published.can_transition_to(CourseStatus::Pending));
        assert!(!CourseStatus::Published.can_transition_to(CourseStatus::Published));
        assert_eq!(CourseStatus::default(), CourseStatus::Pending);
        assert_eq!(CourseStatus::Pending.code(), "Y");
        assert_eq!(CourseStatus::Published.code(), "O");
    }

    #[test]
    fn codes_parse_back_to_the_same_variant() {
        for role in [UserRole::Student, UserRole::Instructor, UserRole::Admin] {
            assert_eq!(role.code().parse::<UserRole>().unwrap(), role);
        }
        for status in [CourseStatus::Pending, CourseStatus::Published] {
            assert_eq!(status.code().parse::<CourseStatus>().unwrap(), status);
        }
        assert!("lecturer".parse::<UserRole>().is_err());
    }
}
