use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Question;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::assessment::{QuestionCreate, QuestionUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, question, choice_a, choice_b, choice_c, choice_d, correct_answer";

pub async fn create(pool: &PgPool, input: &QuestionCreate) -> Result<Question, DataError> {
    input.validate()?;

    let question = sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (question, choice_a, choice_b, choice_c, choice_d, correct_answer)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(&input.question)
    .bind(&input.choice_a)
    .bind(&input.choice_b)
    .bind(&input.choice_c)
    .bind(&input.choice_d)
    .bind(&input.correct_answer)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Question, "create");
    tracing::info!(question_id = question.id, action = "question_create", "Question created");
    Ok(question)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, DataError> {
    super::find_row(pool, Entity::Question, COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Question>, DataError> {
    super::list_rows(pool, Entity::Question, COLUMNS, page).await
}

pub async fn update(pool: &PgPool, id: i64, input: &QuestionUpdate) -> Result<Question, DataError> {
    input.validate()?;

    let question = sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET
            question = COALESCE($1, question),
            choice_a = COALESCE($2, choice_a),
            choice_b = COALESCE($3, choice_b),
            choice_c = COALESCE($4, choice_c),
            choice_d = COALESCE($5, choice_d),
            correct_answer = COALESCE($6, correct_answer)
         WHERE id = $7
         RETURNING {COLUMNS}",
    ))
    .bind(input.question.as_deref())
    .bind(input.choice_a.as_deref())
    .bind(input.choice_b.as_deref())
    .bind(input.choice_c.as_deref())
    .bind(input.choice_d.as_deref())
    .bind(input.correct_answer.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Question, id))?;

    metrics::record_write(Entity::Question, "update");
    tracing::info!(question_id = id, action = "question_update", "Question updated");
    Ok(question)
}

/// Cascades to quizzes and exams built on the question.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Question, id).await
}
