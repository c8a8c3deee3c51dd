use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::core::time::{format_primitive, to_primitive_utc};
use crate::db::models::Assignment;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::course::{AssignmentCreate, AssignmentUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "course_id, title, description, due_date, upload_file";

/// Due dates arrive with an offset and are stored as naive UTC.
pub async fn create(pool: &PgPool, input: &AssignmentCreate) -> Result<Assignment, DataError> {
    input.validate()?;

    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (course_id, title, description, due_date, upload_file)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(input.course_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(to_primitive_utc(input.due_date)?)
    .bind(input.upload_file.as_deref())
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Assignment, "create");
    tracing::info!(
        course_id = assignment.course_id,
        due_date = %format_primitive(assignment.due_date),
        action = "assignment_create",
        "Assignment created"
    );
    Ok(assignment)
}

pub async fn find_by_id(pool: &PgPool, course_id: i64) -> Result<Option<Assignment>, DataError> {
    super::find_row(pool, Entity::Assignment, COLUMNS, course_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Assignment>, DataError> {
    super::list_rows(pool, Entity::Assignment, COLUMNS, page).await
}

pub async fn update(
    pool: &PgPool,
    course_id: i64,
    input: &AssignmentUpdate,
) -> Result<Assignment, DataError> {
    input.validate()?;

    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            due_date = COALESCE($3, due_date),
            upload_file = CASE WHEN $4 THEN $5 ELSE upload_file END
         WHERE course_id = $6
         RETURNING {COLUMNS}",
    ))
    .bind(input.title.as_deref())
    .bind(input.description.as_deref())
    .bind(input.due_date.map(to_primitive_utc).transpose()?)
    .bind(input.upload_file.is_some())
    .bind(input.upload_file.as_ref().and_then(Option::as_deref))
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Assignment, course_id))?;

    metrics::record_write(Entity::Assignment, "update");
    tracing::info!(course_id, action = "assignment_update", "Assignment updated");
    Ok(assignment)
}

/// Refused while any assignment result references the assignment.
pub async fn delete(pool: &PgPool, course_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Assignment, course_id).await
}
