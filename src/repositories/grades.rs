use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Grade;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::{GradeCreate, GradeUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, quiz_result_id, assignment_result_id, calculate_result";

pub async fn create(pool: &PgPool, input: &GradeCreate) -> Result<Grade, DataError> {
    input.validate()?;

    let grade = sqlx::query_as::<_, Grade>(&format!(
        "INSERT INTO grades (quiz_result_id, assignment_result_id, calculate_result)
         VALUES ($1,$2,$3)
         RETURNING {COLUMNS}",
    ))
    .bind(input.quiz_result_id)
    .bind(input.assignment_result_id)
    .bind(&input.calculate_result)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Grade, "create");
    tracing::info!(grade_id = grade.id, action = "grade_create", "Grade recorded");
    Ok(grade)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Grade>, DataError> {
    super::find_row(pool, Entity::Grade, COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Grade>, DataError> {
    super::list_rows(pool, Entity::Grade, COLUMNS, page).await
}

pub async fn list_by_quiz_result(
    pool: &PgPool,
    quiz_result_id: i64,
) -> Result<Vec<Grade>, DataError> {
    super::list_by_parent(pool, Entity::Grade, COLUMNS, "quiz_result_id", quiz_result_id).await
}

pub async fn list_by_assignment_result(
    pool: &PgPool,
    assignment_result_id: i64,
) -> Result<Vec<Grade>, DataError> {
    super::list_by_parent(
        pool,
        Entity::Grade,
        COLUMNS,
        "assignment_result_id",
        assignment_result_id,
    )
    .await
}

pub async fn update(pool: &PgPool, id: i64, input: &GradeUpdate) -> Result<Grade, DataError> {
    input.validate()?;

    let grade = sqlx::query_as::<_, Grade>(&format!(
        "UPDATE grades SET calculate_result = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(&input.calculate_result)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Grade, id))?;

    metrics::record_write(Entity::Grade, "update");
    tracing::info!(grade_id = id, action = "grade_update", "Grade updated");
    Ok(grade)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Grade, id).await
}
