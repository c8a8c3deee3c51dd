use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Student;
use crate::db::schema::Entity;
use crate::db::types::UserRole;
use crate::errors::DataError;
use crate::schemas::user::{StudentCreate, StudentUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "user_id, first_name, last_name, enrollment_date";

/// Creates the student profile keyed by its user. The enrollment date is the
/// current date as seen by the database.
pub async fn create(pool: &PgPool, input: &StudentCreate) -> Result<Student, DataError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    super::lock_user_with_role(&mut tx, input.user_id, UserRole::Student).await?;

    let student = sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (user_id, first_name, last_name)
         VALUES ($1,$2,$3)
         RETURNING {COLUMNS}",
    ))
    .bind(input.user_id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::record_write(Entity::Student, "create");
    tracing::info!(user_id = student.user_id, action = "student_create", "Student created");
    Ok(student)
}

pub async fn find_by_id(pool: &PgPool, user_id: i64) -> Result<Option<Student>, DataError> {
    super::find_row(pool, Entity::Student, COLUMNS, user_id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Student>, DataError> {
    super::list_rows(pool, Entity::Student, COLUMNS, page).await
}

pub async fn update(
    pool: &PgPool,
    user_id: i64,
    input: &StudentUpdate,
) -> Result<Student, DataError> {
    input.validate()?;

    let student = sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name)
         WHERE user_id = $3
         RETURNING {COLUMNS}",
    ))
    .bind(input.first_name.as_deref())
    .bind(input.last_name.as_deref())
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Student, user_id))?;

    metrics::record_write(Entity::Student, "update");
    tracing::info!(user_id, action = "student_update", "Student updated");
    Ok(student)
}

/// Cascades to the student's track; refused while certificates or payments
/// reference the student.
pub async fn delete(pool: &PgPool, user_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Student, user_id).await
}
