use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Payment;
use crate::db::schema::Entity;
use crate::db::types::PaymentStatus;
use crate::errors::DataError;
use crate::schemas::commerce::{PaymentCreate, PaymentUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, course_id, student_id, reference_no, payment_status";

/// Records a pending payment. A course carries at most one payment.
pub async fn create(pool: &PgPool, input: &PaymentCreate) -> Result<Payment, DataError> {
    input.validate()?;

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "INSERT INTO payments (course_id, student_id, reference_no, payment_status)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(input.course_id)
    .bind(input.student_id)
    .bind(input.reference_no.trim())
    .bind(PaymentStatus::Pending)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Payment, "create");
    tracing::info!(
        payment_id = payment.id,
        course_id = payment.course_id,
        student_id = payment.student_id,
        action = "payment_create",
        "Payment recorded"
    );
    Ok(payment)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Payment>, DataError> {
    super::find_row(pool, Entity::Payment, COLUMNS, id).await
}

pub async fn find_by_course(pool: &PgPool, course_id: i64) -> Result<Option<Payment>, DataError> {
    let payment =
        sqlx::query_as::<_, Payment>(&format!("SELECT {COLUMNS} FROM payments WHERE course_id = $1"))
            .bind(course_id)
            .fetch_optional(pool)
            .await?;
    Ok(payment)
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Payment>, DataError> {
    super::list_rows(pool, Entity::Payment, COLUMNS, page).await
}

pub async fn list_by_student(pool: &PgPool, student_id: i64) -> Result<Vec<Payment>, DataError> {
    super::list_by_parent(pool, Entity::Payment, COLUMNS, "student_id", student_id).await
}

pub async fn update(pool: &PgPool, id: i64, input: &PaymentUpdate) -> Result<Payment, DataError> {
    input.validate()?;

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "UPDATE payments SET reference_no = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(input.reference_no.trim())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Payment, id))?;

    metrics::record_write(Entity::Payment, "update");
    tracing::info!(payment_id = id, action = "payment_update", "Payment updated");
    Ok(payment)
}

pub async fn complete(pool: &PgPool, id: i64) -> Result<Payment, DataError> {
    transition(pool, id, PaymentStatus::Completed).await
}

pub async fn fail(pool: &PgPool, id: i64) -> Result<Payment, DataError> {
    transition(pool, id, PaymentStatus::Failed).await
}

async fn transition(pool: &PgPool, id: i64, next: PaymentStatus) -> Result<Payment, DataError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_scalar::<_, PaymentStatus>(
        "SELECT payment_status FROM payments WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Payment, id))?;

    if !current.can_transition_to(next) {
        return Err(DataError::validation(format!(
            "payment {id} cannot move from {} to {}",
            current.label(),
            next.label()
        )));
    }

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "UPDATE payments SET payment_status = $1 WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(next)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::record_write(Entity::Payment, "status");
    tracing::info!(
        payment_id = id,
        from = current.label(),
        to = next.label(),
        action = "payment_status",
        "Payment status changed"
    );
    Ok(payment)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Payment, id).await
}
