use anyhow::Context;
use sqlx::PgPool;

use crate::core::config::Settings;
use crate::db::types::UserRole;
use crate::repositories::users;
use crate::schemas::user::{UserCreate, UserUpdate};

/// Creates the configured admin user, or brings an existing one back to an
/// active admin with the configured password.
pub async fn ensure_superuser(pool: &PgPool, settings: &Settings) -> anyhow::Result<()> {
    let admin = settings.admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let username = admin.first_superuser_username.as_str();

    let Some(user) = users::find_by_username(pool, username).await? else {
        let email = Some(admin.first_superuser_email.clone()).filter(|email| !email.is_empty());
        users::create(
            pool,
            &UserCreate {
                username: username.to_string(),
                password: admin.first_superuser_password.clone(),
                first_name: String::new(),
                last_name: String::new(),
                email,
                role: UserRole::Admin,
            },
        )
        .await
        .with_context(|| format!("failed to create superuser {username}"))?;

        tracing::info!("Created default superuser {username}");
        return Ok(());
    };

    let mut changed = false;

    if !users::check_password(&user, &admin.first_superuser_password).unwrap_or(false) {
        users::set_password(pool, user.id, &admin.first_superuser_password)
            .await
            .with_context(|| format!("failed to reset password of superuser {username}"))?;
        changed = true;
    }

    if user.role != UserRole::Admin || !user.is_active {
        let update = UserUpdate {
            role: Some(UserRole::Admin),
            is_active: Some(true),
            ..UserUpdate::default()
        };
        users::update(pool, user.id, &update)
            .await
            .with_context(|| format!("failed to promote superuser {username}"))?;
        changed = true;
    }

    if changed {
        tracing::info!("Updated default superuser {username}");
    } else {
        tracing::info!("Default superuser already up to date");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn creates_then_repairs_the_admin() {
        let Some(ctx) = test_support::setup_test_context().await else {
            return;
        };
        std::env::set_var("FIRST_SUPERUSER_USERNAME", "root");
        std::env::set_var("FIRST_SUPERUSER_PASSWORD", "root-password");
        let settings = Settings::load().expect("settings");

        ensure_superuser(&ctx.pool, &settings).await.expect("bootstrap");
        let user = users::find_by_username(&ctx.pool, "root").await.unwrap().expect("admin");
        assert_eq!(user.role, UserRole::Admin);
        assert!(users::check_password(&user, "root-password").unwrap());

        let demote = UserUpdate {
            role: Some(UserRole::Student),
            is_active: Some(false),
            ..UserUpdate::default()
        };
        users::update(&ctx.pool, user.id, &demote).await.expect("demote");
        users::set_password(&ctx.pool, user.id, "something-else").await.expect("rotate");

        ensure_superuser(&ctx.pool, &settings).await.expect("repair");
        let repaired = users::find_by_id(&ctx.pool, user.id).await.unwrap().expect("admin");
        assert_eq!(repaired.role, UserRole::Admin);
        assert!(repaired.is_active);
        assert!(users::check_password(&repaired, "root-password").unwrap());

        std::env::remove_var("FIRST_SUPERUSER_USERNAME");
        std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
    }

    #[tokio::test]
    async fn empty_password_skips_bootstrap() {
        let Some(ctx) = test_support::setup_test_context().await else {
            return;
        };
        std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
        let settings = Settings::load().expect("settings");

        ensure_superuser(&ctx.pool, &settings).await.expect("bootstrap");
        assert!(users::find_by_username(&ctx.pool, "admin").await.unwrap().is_none());
    }
}
