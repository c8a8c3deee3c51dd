use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use super::double_option;
use crate::db::types::CourseStatus;

/// Media paths are stored relative to the media root; uploads happen elsewhere.
pub const MAX_FILE_PATH_LEN: u64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CourseCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[validate(length(min = 1, max = 255))]
    pub price: String,
    pub instructor_id: i64,
    pub category_id: i64,
    #[serde(default)]
    pub status: CourseStatus,
}

/// Status is not updatable here; publication goes through `courses::publish`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub price: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LessonCreate {
    pub course_id: i64,
    #[validate(range(min = 0, message = "number must be non-negative"))]
    pub number: i32,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub video_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LessonUpdate {
    #[serde(default)]
    #[validate(range(min = 0, message = "number must be non-negative"))]
    pub number: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Absent keeps the stored path, `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 100))]
    pub video_file: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignmentCreate {
    pub course_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub upload_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssignmentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 100))]
    pub upload_file: Option<Option<String>>,
}
