//! Carts and their course lines.

use sqlx::PgPool;

use crate::core::metrics;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Cart, CartCourse};
use crate::db::schema::Entity;
use crate::errors::DataError;
use crate::schemas::commerce::CartCourseCreate;
use crate::schemas::{Page, Paginated};

const CART_COLUMNS: &str = "id, created_at";
const LINE_COLUMNS: &str = "id, course_id, cart_id";

pub async fn create(pool: &PgPool) -> Result<Cart, DataError> {
    let cart = sqlx::query_as::<_, Cart>(&format!(
        "INSERT INTO carts (created_at) VALUES ($1) RETURNING {CART_COLUMNS}"
    ))
    .bind(primitive_now_utc())
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::Cart, "create");
    tracing::info!(cart_id = cart.id, action = "cart_create", "Cart created");
    Ok(cart)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Cart>, DataError> {
    super::find_row(pool, Entity::Cart, CART_COLUMNS, id).await
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<Cart>, DataError> {
    super::list_rows(pool, Entity::Cart, CART_COLUMNS, page).await
}

/// Removes the cart together with its lines.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::Cart, id).await
}

/// The same course may appear in a cart more than once.
pub async fn add_course(pool: &PgPool, input: &CartCourseCreate) -> Result<CartCourse, DataError> {
    let line = sqlx::query_as::<_, CartCourse>(&format!(
        "INSERT INTO cart_courses (course_id, cart_id) VALUES ($1,$2) RETURNING {LINE_COLUMNS}"
    ))
    .bind(input.course_id)
    .bind(input.cart_id)
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::CartCourse, "create");
    tracing::info!(
        cart_id = line.cart_id,
        course_id = line.course_id,
        action = "cart_course_add",
        "Course added to cart"
    );
    Ok(line)
}

pub async fn find_line(pool: &PgPool, id: i64) -> Result<Option<CartCourse>, DataError> {
    super::find_row(pool, Entity::CartCourse, LINE_COLUMNS, id).await
}

pub async fn list_lines(pool: &PgPool, cart_id: i64) -> Result<Vec<CartCourse>, DataError> {
    super::list_by_parent(pool, Entity::CartCourse, LINE_COLUMNS, "cart_id", cart_id).await
}

pub async fn remove_course(pool: &PgPool, line_id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::CartCourse, line_id).await
}
