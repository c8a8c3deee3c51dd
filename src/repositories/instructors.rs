use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Instructor;
use crate::db::schema::Entity;
use crate::db::types::UserRole;
use crate::errors::DataError;
use crate::schemas::user::{InstructorCreate, InstructorUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, user_id, first_name, last_name, email";

pub async fn create(pool: &PgPool, input: &InstructorCreate) -> Result<Instructor, DataError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    super::lock_user_with_role(&mut tx, input.user_id, UserRole::Instructor).await?;

    let instructor = sqlx::query_as::<_, Instructor>(&format!(
        "INSERT INTO instructors (user_id, first_name, last_name, email)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(input.user_id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.email)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::record_write(Entity::Instructor, "create");
    tracing::info!(
        instructor_id = instructor.id,
        user_id = instructor.user_id,
        action = "instructor_create",
        "Instructor created"
    );
    Ok(instructor)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Instructor>, DataError> {
    super::find_row(pool, Entity::Instructor, COLUMNS, id).await
}

pub async fn find_by_user(pool: &PgPool, user_id: i64) -> Result<Option<Instructor>, DataError> {
    let instructor = sqlx::query_as::<_, Instructor>(&format!(
        "SELECT {COLUMNS} FROM instructors WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(instructor)
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Instructor>, DataError> {
    super::list_rows(pool, Entity::Instructor, COLUMNS, page).await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &InstructorUpdate,
) -> Result<Instructor, DataError> {
    input.validate()?;

    let instructor = sqlx::query_as::<_, Instructor>(&format!(
        "UPDATE instructors SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            email = COALESCE($3, email)
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(input.first_name.as_deref())
    .bind(input.last_name.as_deref())
    .bind(input.email.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Instructor, id))?;

    metrics::record_write(Entity::Instructor, "update");
    tracing::info!(instructor_id = id, action = "instructor_update", "Instructor updated");
    Ok(instructor)
}

/// Refused while the instructor still teaches a course.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Instructor, id).await
}
