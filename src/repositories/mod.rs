//! Persistence operations, one module per entity.
//!
//! Every function validates its input, runs against the pool in a single
//! transaction and reports failures as [`DataError`]. Deletes go through
//! [`deletion::delete_guarded`], which enforces the relation matrix.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use validator::Validate;

use crate::db::schema::Entity;
use crate::db::types::UserRole;
use crate::errors::DataError;
use crate::schemas::{Page, Paginated};

pub mod assignment_results;
pub mod assignments;
pub mod carts;
pub mod categories;
pub mod certificates;
pub mod courses;
pub mod exams;
pub mod grades;
pub mod instructors;
pub mod lessons;
pub mod payments;
pub mod questions;
pub mod quiz_results;
pub mod quizzes;
pub mod students;
pub mod tracks;
pub mod users;

mod deletion;

/// Locks the user row for the rest of the transaction and checks it carries
/// the role a profile of that kind requires.
pub(crate) async fn lock_user_with_role(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    required: UserRole,
) -> Result<(), DataError> {
    let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DataError::not_found(Entity::User, user_id))?;

    if role != required {
        return Err(DataError::validation(format!(
            "user {user_id} has role {}, expected {}",
            role.code(),
            required.code()
        )));
    }
    Ok(())
}

pub(crate) async fn count(pool: &PgPool, entity: Entity) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", entity.table()))
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_row<T>(
    pool: &PgPool,
    entity: Entity,
    columns: &str,
    key: i64,
) -> Result<Option<T>, DataError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let row = sqlx::query_as::<_, T>(&format!(
        "SELECT {columns} FROM {} WHERE {} = $1",
        entity.table(),
        entity.key_column()
    ))
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub(crate) async fn list_rows<T>(
    pool: &PgPool,
    entity: Entity,
    columns: &str,
    page: Page,
) -> Result<Paginated<T>, DataError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    page.validate()?;

    let items = sqlx::query_as::<_, T>(&format!(
        "SELECT {columns} FROM {} ORDER BY {} LIMIT $1 OFFSET $2",
        entity.table(),
        entity.key_column()
    ))
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(pool)
    .await?;
    let total_count = count(pool, entity).await?;

    Ok(Paginated::new(items, total_count, page))
}

/// Rows of `entity` whose foreign key `column` points at `parent_key`.
pub(crate) async fn list_by_parent<T>(
    pool: &PgPool,
    entity: Entity,
    columns: &str,
    column: &str,
    parent_key: i64,
) -> Result<Vec<T>, DataError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let rows = sqlx::query_as::<_, T>(&format!(
        "SELECT {columns} FROM {} WHERE {column} = $1 ORDER BY {}",
        entity.table(),
        entity.key_column()
    ))
    .bind(parent_key)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
