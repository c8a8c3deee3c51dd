use sqlx::PgPool;
use validator::Validate;

use crate::core::time::primitive_now_utc;
use crate::core::{metrics, security};
use crate::db::models::User;
use crate::db::schema::Entity;
use crate::db::types::UserRole;
use crate::errors::DataError;
use crate::schemas::user::{UserCreate, UserUpdate};
use crate::schemas::{Page, Paginated};

const COLUMNS: &str = "\
    id, username, password, first_name, last_name, email, role, is_active, \
    date_joined, last_login";

pub async fn create(pool: &PgPool, input: &UserCreate) -> Result<User, DataError> {
    input.validate()?;
    let hashed_password = security::hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            username, password, first_name, last_name, email, role, is_active, date_joined
        ) VALUES ($1,$2,$3,$4,$5,$6,TRUE,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(input.username.trim())
    .bind(hashed_password)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.email.as_deref().unwrap_or_default())
    .bind(input.role)
    .bind(primitive_now_utc())
    .fetch_one(pool)
    .await?;

    metrics::record_write(Entity::User, "create");
    tracing::info!(user_id = user.id, role = user.role.code(), action = "user_create", "User created");
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, DataError> {
    super::find_row(pool, Entity::User, COLUMNS, id).await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn list(pool: &PgPool, page: Page) -> Result<Paginated<User>, DataError> {
    super::list_rows(pool, Entity::User, COLUMNS, page).await
}

/// Partial update. A role change is refused while the user still owns a
/// profile of the old role. `email: Some(None)` resets the address to empty.
pub async fn update(pool: &PgPool, id: i64, input: &UserUpdate) -> Result<User, DataError> {
    input.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DataError::not_found(Entity::User, id))?;

    if let Some(next) = input.role.filter(|next| *next != current) {
        let profile = match current {
            UserRole::Instructor => Some(Entity::Instructor),
            UserRole::Student => Some(Entity::Student),
            UserRole::Admin => None,
        };
        if let Some(profile) = profile {
            let has_profile = sqlx::query_scalar::<_, bool>(&format!(
                "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1)",
                profile.table()
            ))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if has_profile {
                return Err(DataError::validation(format!(
                    "cannot change role from {} to {} while a {profile} profile exists",
                    current.code(),
                    next.code()
                )));
            }
        }
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            email = COALESCE($3, email),
            role = COALESCE($4, role),
            is_active = COALESCE($5, is_active)
         WHERE id = $6
         RETURNING {COLUMNS}",
    ))
    .bind(input.first_name.as_deref())
    .bind(input.last_name.as_deref())
    .bind(input.email.as_ref().map(|email| email.as_deref().unwrap_or_default()))
    .bind(input.role)
    .bind(input.is_active)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    metrics::record_write(Entity::User, "update");
    tracing::info!(user_id = id, action = "user_update", "User updated");
    Ok(user)
}

pub async fn set_password(pool: &PgPool, id: i64, password: &str) -> Result<(), DataError> {
    if password.chars().count() < 8 {
        return Err(DataError::validation("password must be at least 8 characters"));
    }
    let hashed_password = security::hash_password(password)?;

    let updated = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(hashed_password)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(DataError::not_found(Entity::User, id));
    }

    metrics::record_write(Entity::User, "set_password");
    tracing::info!(user_id = id, action = "user_set_password", "User password changed");
    Ok(())
}

pub fn check_password(user: &User, password: &str) -> Result<bool, DataError> {
    Ok(security::verify_password(password, &user.password)?)
}

/// Removes the user; instructor and student profiles cascade, which is refused
/// while those profiles are still referenced by courses, payments or
/// certificates.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), DataError> {
    super::deletion::delete_guarded(pool, Entity::User, id).await
}

#[cfg(test)]
mod tests;
