use sqlx::PgPool;

use crate::core::metrics;
use crate::db::models::Quiz;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::QuizCreate;
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "lesson_id, question_id";

pub async fn create(pool: &PgPool, input: &QuizCreate) -> Result<Quiz, DataError> {
    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (lesson_id, question_id) VALUES ($1,$2) RETURNING {COLUMNS}"
    ))
    .bind(input.lesson_id)
    .bind(input.question_id)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Quiz, "create");
    tracing::info!(
        lesson_id = quiz.lesson_id,
        question_id = quiz.question_id,
        action = "quiz_create",
        "Quiz created"
    );
    Ok(quiz)
}

pub async fn find_by_id(pool: &PgPool, lesson_id: i64) -> Result<Option<Quiz>, DataError> {
    super::find_row(pool, Entity::Quiz, COLUMNS, lesson_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Quiz>, DataError> {
    super::list_rows(pool, Entity::Quiz, COLUMNS, page).await
}

/// Points the quiz at another question.
pub async fn update(pool: &PgPool, lesson_id: i64, question_id: i64) -> Result<Quiz, DataError> {
    let quiz = sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET question_id = $1 WHERE lesson_id = $2 RETURNING {COLUMNS}"
    ))
    .bind(question_id)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Quiz, lesson_id))?;

    metrics::record_write(Entity::Quiz, "update");
    tracing::info!(lesson_id, question_id, action = "quiz_update", "Quiz updated");
    Ok(quiz)
}

/// Refused while the quiz has a result.
pub async fn delete(pool: &PgPool, lesson_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Quiz, lesson_id).await
}
