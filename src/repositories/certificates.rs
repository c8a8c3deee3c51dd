use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Certificate;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::commerce::{CertificateCreate, CertificateUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, course_id, student_id, description, logo, student_photo";

pub async fn create(pool: &PgPool, input: &CertificateCreate) -> Result<Certificate, DataError> {
    input.validate()?;

    let certificate = sqlx::query_as::<_, Certificate>(&format!(
        "INSERT INTO certificates (course_id, student_id, description, logo, student_photo)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(input.course_id)
    .bind(input.student_id)
    .bind(&input.description)
    .bind(input.logo.as_deref())
    .bind(input.student_photo.as_deref())
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Certificate, "create");
    tracing::info!(
        certificate_id = certificate.id,
        course_id = certificate.course_id,
        student_id = certificate.student_id,
        action = "certificate_create",
        "Certificate issued"
    );
    Ok(certificate)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Certificate>, DataError> {
    super::find_row(pool, Entity::Certificate, COLUMNS, id).await
}

pub async fn find_by_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<Option<Certificate>, DataError> {
    let certificate = sqlx::query_as::<_, Certificate>(&format!(
        "SELECT {COLUMNS} FROM certificates WHERE course_id = $1"
    ))
    .bind(course_id)
    .fetch_optional(pool)
    .await?;
    Ok(certificate)
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Certificate>, DataError> {
    super::list_rows(pool, Entity::Certificate, COLUMNS, page).await
}

pub async fn list_by_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<Vec<Certificate>, DataError> {
    super::list_by_parent(pool, Entity::Certificate, COLUMNS, "student_id", student_id).await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &CertificateUpdate,
) -> Result<Certificate, DataError> {
    input.validate()?;

    let certificate = sqlx::query_as::<_, Certificate>(&format!(
        "UPDATE certificates SET
            description = COALESCE($1, description),
            logo = CASE WHEN $2 THEN $3 ELSE logo END,
            student_photo = CASE WHEN $4 THEN $5 ELSE student_photo END
         WHERE id = $6
         RETURNING {COLUMNS}",
    ))
    .bind(input.description.as_deref())
    .bind(input.logo.is_some())
    .bind(input.logo.as_ref().and_then(Option::as_deref))
    .bind(input.student_photo.is_some())
    .bind(input.student_photo.as_ref().and_then(Option::as_deref))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Certificate, id))?;

    metrics::record_write(Entity::Certificate, "update");
    tracing::info!(certificate_id = id, action = "certificate_update", "Certificate updated");
    Ok(certificate)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Certificate, id).await
}
