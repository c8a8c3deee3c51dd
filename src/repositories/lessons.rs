use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Lesson;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::course::{LessonCreate, LessonUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "course_id, number, title, video_file";

/// A course has at most one lesson; a second one is a uniqueness error on
/// `course_id`.
pub async fn create(pool: &PgPool, input: &LessonCreate) -> Result<Lesson, DataError> {
    input.validate()?;

    let lesson = sqlx::query_as::<_, Lesson>(&format!(
        "INSERT INTO lessons (course_id, number, title, video_file)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(input.course_id)
    .bind(input.number)
    .bind(&input.title)
    .bind(input.video_file.as_deref())
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Lesson, "create");
    tracing::info!(course_id = lesson.course_id, action = "lesson_create", "Lesson created");
    Ok(lesson)
}

pub async fn find_by_id(pool: &PgPool, course_id: i64) -> Result<Option<Lesson>, DataError> {
    super::find_row(pool, Entity::Lesson, COLUMNS, course_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Lesson>, DataError> {
    super::list_rows(pool, Entity::Lesson, COLUMNS, page).await
}

/// `video_file: Some(None)` clears the stored path.
pub async fn update(
    pool: &PgPool,
    course_id: i64,
    input: &LessonUpdate,
) -> Result<Lesson, DataError> {
    input.validate()?;

    let lesson = sqlx::query_as::<_, Lesson>(&format!(
        "UPDATE lessons SET
            number = COALESCE($1, number),
            title = COALESCE($2, title),
            video_file = CASE WHEN $3 THEN $4 ELSE video_file END
         WHERE course_id = $5
         RETURNING {COLUMNS}",
    ))
    .bind(input.number)
    .bind(input.title.as_deref())
    .bind(input.video_file.is_some())
    .bind(input.video_file.as_ref().and_then(Option::as_deref))
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Lesson, course_id))?;

    metrics::record_write(Entity::Lesson, "update");
    tracing::info!(course_id, action = "lesson_update", "Lesson updated");
    Ok(lesson)
}

/// Cascades to the lesson quiz; refused while that quiz has a result.
pub async fn delete(pool: &PgPool, course_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Lesson, course_id).await
}
