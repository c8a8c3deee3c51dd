use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::AssignmentResult;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::{AssignmentResultCreate, ScoreUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, assignment_id, score";

pub async fn create(
    pool: &PgPool,
    input: &AssignmentResultCreate,
) -> Result<AssignmentResult, DataError> {
    input.validate()?;

    let result = sqlx::query_as::<_, AssignmentResult>(&format!(
        "INSERT INTO assignment_results (assignment_id, score) VALUES ($1,$2) RETURNING {COLUMNS}"
    ))
    .bind(input.assignment_id)
    .bind(&input.score)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::AssignmentResult, "create");
    tracing::info!(
        assignment_result_id = result.id,
        assignment_id = result.assignment_id,
        action = "assignment_result_create",
        "Assignment result recorded"
    );
    Ok(result)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<AssignmentResult>, DataError> {
    super::find_row(pool, Entity::AssignmentResult, COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<AssignmentResult>, DataError> {
    super::list_rows(pool, Entity::AssignmentResult, COLUMNS, page).await
}

pub async fn list_by_assignment(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<Vec<AssignmentResult>, DataError> {
    super::list_by_parent(pool, Entity::AssignmentResult, COLUMNS, "assignment_id", assignment_id)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &ScoreUpdate,
) -> Result<AssignmentResult, DataError> {
    input.validate()?;

    let result = sqlx::query_as::<_, AssignmentResult>(&format!(
        "UPDATE assignment_results SET score = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(&input.score)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::AssignmentResult, id))?;

    metrics::record_write(Entity::AssignmentResult, "update");
    tracing::info!(assignment_result_id = id, action = "assignment_result_update", "Assignment result updated");
    Ok(result)
}

/// Cascades to grades; refused while a track references the result.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::AssignmentResult, id).await
}
