use sqlx::PgPool;

use crate::core::metrics;
use crate::core::time::primitive_now_utc;
use crate::db::models::Track;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::{TrackCreate, TrackUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, date, student_id, assignment_result_id, quiz_result_id";

/// Each student, assignment result and quiz result belongs to at most one
/// track. The track date is the creation time.
pub async fn create(pool: &PgPool, input: &TrackCreate) -> Result<Track, DataError> {
    let track = sqlx::query_as::<_, Track>(&format!(
        "INSERT INTO tracks (date, student_id, assignment_result_id, quiz_result_id)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}",
    ))
    .bind(primitive_now_utc())
    .bind(input.student_id)
    .bind(input.assignment_result_id)
    .bind(input.quiz_result_id)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Track, "create");
    tracing::info!(
        track_id = track.id,
        student_id = track.student_id,
        action = "track_create",
        "Track created"
    );
    Ok(track)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Track>, DataError> {
    super::find_row(pool, Entity::Track, COLUMNS, id).await
}

pub async fn find_by_student(pool: &PgPool, student_id: i64) -> Result<Option<Track>, DataError> {
    let track =
        sqlx::query_as::<_, Track>(&format!("SELECT {COLUMNS} FROM tracks WHERE student_id = $1"))
            .bind(student_id)
            .fetch_optional(pool)
            .await?;
    Ok(track)
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Track>, DataError> {
    super::list_rows(pool, Entity::Track, COLUMNS, page).await
}

pub async fn update(pool: &PgPool, id: i64, input: &TrackUpdate) -> Result<Track, DataError> {
    let track = sqlx::query_as::<_, Track>(&format!(
        "UPDATE tracks SET
            assignment_result_id = COALESCE($1, assignment_result_id),
            quiz_result_id = COALESCE($2, quiz_result_id)
         WHERE id = $3
         RETURNING {COLUMNS}",
    ))
    .bind(input.assignment_result_id)
    .bind(input.quiz_result_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Track, id))?;

    metrics::record_write(Entity::Track, "update");
    tracing::info!(track_id = id, action = "track_update", "Track updated");
    Ok(track)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Track, id).await
}
