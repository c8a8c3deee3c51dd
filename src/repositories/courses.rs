use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Course;
use crate::db::schema::Entity;
use crate::db::types::CourseStatus;
use crate::errors::DataError;
use crate::schemas::course::{CourseCreate, CourseUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, name, description, price, instructor_id, status, category_id";

pub async fn create(pool: &PgPool, input: &CourseCreate) -> Result<Course, DataError> {
    input.validate()?;

    let course = sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (name, description, price, instructor_id, status, category_id)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.price)
    .bind(input.instructor_id)
    .bind(input.status)
    .bind(input.category_id)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Course, "create");
    tracing::info!(
        course_id = course.id,
        instructor_id = course.instructor_id,
        category_id = course.category_id,
        status = course.status.label(),
        action = "course_create",
        "Course created"
    );
    Ok(course)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Course>, DataError> {
    super::find_row(pool, Entity::Course, COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Course>, DataError> {
    super::list_rows(pool, Entity::Course, COLUMNS, page).await
}

pub async fn list_by_category(pool: &PgPool, category_id: i64) -> Result<Vec<Course>, DataError> {
    super::list_by_parent(pool, Entity::Course, COLUMNS, "category_id", category_id).await
}

/// An instructor teaches at most one course.
pub async fn find_by_instructor(
    pool: &PgPool,
    instructor_id: i64,
) -> Result<Option<Course>, DataError> {
    let course = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COLUMNS} FROM courses WHERE instructor_id = $1"
    ))
    .bind(instructor_id)
    .fetch_optional(pool)
    .await?;
    Ok(course)
}

pub async fn update(pool: &PgPool, id: i64, input: &CourseUpdate) -> Result<Course, DataError> {
    input.validate()?;

    let course = sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            instructor_id = COALESCE($4, instructor_id),
            category_id = COALESCE($5, category_id)
         WHERE id = $6
         RETURNING {COLUMNS}",
    ))
    .bind(input.name.as_deref())
    .bind(input.description.as_deref())
    .bind(input.price.as_deref())
    .bind(input.instructor_id)
    .bind(input.category_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Course, id))?;

    metrics::record_write(Entity::Course, "update");
    tracing::info!(course_id = id, action = "course_update", "Course updated");
    Ok(course)
}

/// Moves a pending course to published. Publishing twice is rejected.
pub async fn publish(pool: &PgPool, id: i64) -> Result<Course, DataError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_scalar::<_, CourseStatus>(
        "SELECT status FROM courses WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Course, id))?;

    if !current.can_transition_to(CourseStatus::Published) {
        return Err(DataError::validation(format!(
            "course {id} is already {}",
            current.label().to_lowercase()
        )));
    }

    let course = sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET status = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(CourseStatus::Published)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::record_write(Entity::Course, "publish");
    tracing::info!(course_id = id, action = "course_publish", "Course published");
    Ok(course)
}

/// Cascades to lessons, assignments, exams, certificates and payments of the
/// course. Refused while a cart holds it, or while a result hangs off one of
/// its assignments or lesson quizzes.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Course, id).await
}
