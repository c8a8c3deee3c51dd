use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::QuizResult;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::{QuizResultCreate, ScoreUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "quiz_id, score";

pub async fn create(pool: &PgPool, input: &QuizResultCreate) -> Result<QuizResult, DataError> {
    input.validate()?;

    let result = sqlx::query_as::<_, QuizResult>(&format!(
        "INSERT INTO quiz_results (quiz_id, score) VALUES ($1,$2) RETURNING {COLUMNS}"
    ))
    .bind(input.quiz_id)
    .bind(&input.score)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::QuizResult, "create");
    tracing::info!(quiz_id = result.quiz_id, action = "quiz_result_create", "Quiz result recorded");
    Ok(result)
}

pub async fn find_by_id(pool: &PgPool, quiz_id: i64) -> Result<Option<QuizResult>, DataError> {
    super::find_row(pool, Entity::QuizResult, COLUMNS, quiz_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<QuizResult>, DataError> {
    super::list_rows(pool, Entity::QuizResult, COLUMNS, page).await
}

pub async fn update(
    pool: &PgPool,
    quiz_id: i64,
    input: &ScoreUpdate,
) -> Result<QuizResult, DataError> {
    input.validate()?;

    let result = sqlx::query_as::<_, QuizResult>(&format!(
        "UPDATE quiz_results SET score = $1 WHERE quiz_id = $2 RETURNING {COLUMNS}"
    ))
    .bind(&input.score)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::QuizResult, quiz_id))?;

    metrics::record_write(Entity::QuizResult, "update");
    tracing::info!(quiz_id, action = "quiz_result_update", "Quiz result updated");
    Ok(result)
}

/// Cascades to grades; refused while a track references the result.
pub async fn delete(pool: &PgPool, quiz_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::QuizResult, quiz_id).await
}
