use sqlx::PgPool;
use validator::Validate;

use crate::core::metrics;
use crate::db::models::Category;
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::course::{CategoryCreate, CategoryUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "id, title";

pub async fn create(pool: &PgPool, input: &CategoryCreate) -> Result<Category, DataError> {
    input.validate()?;

    let category = sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (title) VALUES ($1) RETURNING {COLUMNS}"
    ))
    .bind(&input.title)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Category, "create");
    tracing::info!(category_id = category.id, action = "category_create", "Category created");
    Ok(category)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Category>, DataError> {
    super::find_row(pool, Entity::Category, COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Category>, DataError> {
    super::list_rows(pool, Entity::Category, COLUMNS, page).await
}

pub async fn update(pool: &PgPool, id: i64, input: &CategoryUpdate) -> Result<Category, DataError> {
    input.validate()?;

    let category = sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET title = COALESCE($1, title) WHERE id = $2 RETURNING {COLUMNS}"
    ))
    .bind(input.title.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DataError::not_found(Entity::Category, id))?;

    metrics::record_write(Entity::Category, "update");
    tracing::info!(category_id = id, action = "category_update", "Category updated");
    Ok(category)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Category, id).await
}
