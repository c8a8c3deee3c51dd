use std::sync::{Arc, OnceLock};

use sqlx::PgPool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::config::Settings;
use crate::db::models::{Category, Course, Instructor, Question, Student, User};
use crate::db::types::{CourseStatus, UserRole};
use crate::repositories;
use crate::schemas::assessment::QuestionCreate;
use crate::schemas::course::{CategoryCreate, CourseCreate};
use crate::schemas::user::{InstructorCreate, StudentCreate, UserCreate};

const TEST_PASSWORD: &str = "test-password";

pub(crate) struct TestContext {
    pub(crate) pool: PgPool,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

fn test_database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("TEST_DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
}

pub(crate) fn set_test_env(database_url: &str) {
    std::env::set_var("STORE_ENV", "test");
    std::env::set_var("STORE_STRICT_CONFIG", "0");
    std::env::set_var("DATABASE_URL", database_url);
    std::env::set_var("DATABASE_MAX_CONNECTIONS", "5");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("FIRST_SUPERUSER_USERNAME");
    std::env::remove_var("FIRST_SUPERUSER_EMAIL");
    std::env::remove_var("FIRST_SUPERUSER_PASSWORD");
}

/// Returns `None` when no test database is configured, so database tests
/// become no-ops on machines without PostgreSQL.
pub(crate) async fn setup_test_context() -> Option<TestContext> {
    let Some(database_url) = test_database_url() else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let guard = env_lock().await;
    set_test_env(&database_url);

    let settings = Settings::load().expect("settings");
    let pool = crate::db::init_pool(&settings).await.expect("db pool");
    reset_public_schema(&pool).await.expect("reset schema");
    crate::db::run_migrations(&pool).await.expect("migrations");

    Some(TestContext { pool, _guard: guard })
}

async fn reset_public_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP SCHEMA IF EXISTS public CASCADE").execute(pool).await?;
    sqlx::query("CREATE SCHEMA public").execute(pool).await?;
    Ok(())
}

pub(crate) async fn insert_user(pool: &PgPool, username: &str, role: UserRole) -> User {
    repositories::users::create(
        pool,
        &UserCreate {
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            role,
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_instructor(pool: &PgPool, username: &str) -> Instructor {
    let user = insert_user(pool, username, UserRole::Instructor).await;
    repositories::instructors::create(
        pool,
        &InstructorCreate {
            user_id: user.id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .expect("insert instructor")
}

pub(crate) async fn insert_student(pool: &PgPool, username: &str) -> Student {
    let user = insert_user(pool, username, UserRole::Student).await;
    repositories::students::create(
        pool,
        &StudentCreate {
            user_id: user.id,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
        },
    )
    .await
    .expect("insert student")
}

pub(crate) async fn insert_category(pool: &PgPool, title: &str) -> Category {
    repositories::categories::create(pool, &CategoryCreate { title: title.to_string() })
        .await
        .expect("insert category")
}

pub(crate) async fn insert_course(
    pool: &PgPool,
    name: &str,
    instructor_id: i64,
    category_id: i64,
) -> Course {
    repositories::courses::create(
        pool,
        &CourseCreate {
            name: name.to_string(),
            description: format!("{name} description"),
            price: "49.00".to_string(),
            instructor_id,
            category_id,
            status: CourseStatus::Pending,
        },
    )
    .await
    .expect("insert course")
}

pub(crate) async fn insert_question(pool: &PgPool) -> Question {
    repositories::questions::create(
        pool,
        &QuestionCreate {
            question: "Which keyword moves ownership into a closure?".to_string(),
            choice_a: "ref".to_string(),
            choice_b: "move".to_string(),
            choice_c: "mut".to_string(),
            choice_d: "static".to_string(),
            correct_answer: "b".to_string(),
        },
    )
    .await
    .expect("insert question")
}
