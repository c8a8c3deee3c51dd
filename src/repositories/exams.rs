use sqlx::PgPool;

use crate::core::metrics;
use crate::db::models::Exam;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::ExamCreate;
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "course_id, question_id";

pub async fn create(pool: &PgPool, input: &ExamCreate) -> Result<Exam, DataError> {
    let exam = sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (course_id, question_id) VALUES ($1,$2) RETURNING {COLUMNS}"
    ))
    .bind(input.course_id)
    .bind(input.question_id)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Exam, "create");
    tracing::info!(course_id = exam.course_id, action = "exam_create", "Exam created");
    Ok(exam)
}

pub async fn find_by_id(pool: &PgPool, course_id: i64) -> Result<Option<Exam>, DataError> {
    super::find_row(pool, Entity::Exam, COLUMNS, course_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Exam>, DataError> {
    super::list_rows(pool, Entity::Exam, COLUMNS, page).await
}

pub async fn update(pool: &PgPool, course_id: i64, question_id: i64) -> Result<Exam, DataError> {
    let exam = sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams SET question_id = $1 WHERE course_id = $2 RETURNING {COLUMNS}"
    ))
    .bind(question_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Exam, course_id))?;

    metrics::record_write(Entity::Exam, "update");
    tracing::info!(course_id, question_id, action = "exam_update", "Exam updated");
    Ok(exam)
}

pub async fn delete(pool: &PgPool, course_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Exam, course_id).await
}
