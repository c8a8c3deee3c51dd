use crate::db::schema::Entity;
use crate::db::types::UserRole;
use crate::errors::DataError;
use crate::repositories::{instructors, students, users};
use crate::schemas::user::{InstructorCreate, StudentCreate, UserCreate, UserUpdate};
use crate::schemas::Page;
use crate::test_support;

#[tokio::test]
async fn create_hashes_the_password() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let input = UserCreate {
        username: "student01".to_string(),
        password: "long-enough-pass".to_string(),
        first_name: "Ada".to_string(),
        last_name: String::new(),
        email: None,
        role: UserRole::Student,
    };
    let user = users::create(&ctx.pool, &input).await.expect("create user");

    assert_ne!(user.password, "long-enough-pass");
    assert!(user.password.starts_with("$argon2id$"));
    assert!(user.is_active);
    assert_eq!(user.email, "");
    assert!(users::check_password(&user, "long-enough-pass").unwrap());
    assert!(!users::check_password(&user, "wrong-password").unwrap());

    users::set_password(&ctx.pool, user.id, "rotated-password").await.expect("rotate");
    let reloaded = users::find_by_username(&ctx.pool, "student01").await.unwrap().expect("user");
    assert!(users::check_password(&reloaded, "rotated-password").unwrap());
}

#[tokio::test]
async fn duplicate_username_is_a_uniqueness_error() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    test_support::insert_user(&ctx.pool, "dupe", UserRole::Student).await;
    let err = users::create(
        &ctx.pool,
        &UserCreate {
            username: "dupe".to_string(),
            password: "another-password".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            role: UserRole::Instructor,
        },
    )
    .await
    .unwrap_err();

    match err {
        DataError::Uniqueness { entity, field } => {
            assert_eq!(entity, Entity::User);
            assert_eq!(field, "username");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn profiles_require_a_matching_role() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let student_user = test_support::insert_user(&ctx.pool, "learner", UserRole::Student).await;
    let err = instructors::create(
        &ctx.pool,
        &InstructorCreate {
            user_id: student_user.id,
            first_name: "Not".to_string(),
            last_name: "Instructor".to_string(),
            email: "learner@example.com".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::Validation(_)), "{err:?}");

    let err = students::create(
        &ctx.pool,
        &StudentCreate { user_id: 9_999, first_name: "No".to_string(), last_name: "One".to_string() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::NotFound { entity: Entity::User, key: Some(9_999) }));

    let student = students::create(
        &ctx.pool,
        &StudentCreate {
            user_id: student_user.id,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
        },
    )
    .await
    .expect("student profile");
    assert_eq!(student.user_id, student_user.id);

    let err = students::create(
        &ctx.pool,
        &StudentCreate {
            user_id: student_user.id,
            first_name: "Alan".to_string(),
            last_name: "Again".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::Uniqueness { entity: Entity::Student, .. }), "{err:?}");
}

#[tokio::test]
async fn role_is_locked_while_a_profile_exists() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let instructor = test_support::insert_instructor(&ctx.pool, "lecturer01").await;
    let promote = UserUpdate { role: Some(UserRole::Admin), ..UserUpdate::default() };

    let err = users::update(&ctx.pool, instructor.user_id, &promote).await.unwrap_err();
    assert!(matches!(err, DataError::Validation(_)), "{err:?}");

    instructors::delete(&ctx.pool, instructor.id).await.expect("drop profile");
    let user = users::update(&ctx.pool, instructor.user_id, &promote).await.expect("promote");
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn instructor_email_is_unique() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    test_support::insert_instructor(&ctx.pool, "ada").await;
    let user = test_support::insert_user(&ctx.pool, "ada2", UserRole::Instructor).await;

    let err = instructors::create(
        &ctx.pool,
        &InstructorCreate {
            user_id: user.id,
            first_name: "Ada".to_string(),
            last_name: "Clone".to_string(),
            email: "ada@example.com".to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        DataError::Uniqueness { entity, field } => {
            assert_eq!(entity, Entity::Instructor);
            assert_eq!(field, "email");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn deleting_a_user_cascades_to_unreferenced_profiles() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let student = test_support::insert_student(&ctx.pool, "leaving").await;
    users::delete(&ctx.pool, student.user_id).await.expect("delete user");

    assert!(students::find_by_id(&ctx.pool, student.user_id).await.unwrap().is_none());
    assert!(users::find_by_id(&ctx.pool, student.user_id).await.unwrap().is_none());

    let err = users::delete(&ctx.pool, student.user_id).await.unwrap_err();
    assert!(matches!(err, DataError::NotFound { entity: Entity::User, .. }));
}

#[tokio::test]
async fn list_is_paginated() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    for index in 0..3 {
        test_support::insert_user(&ctx.pool, &format!("user{index}"), UserRole::Student).await;
    }

    let page = users::list(&ctx.pool, Page { skip: 1, limit: 1 }).await.expect("list");
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].username, "user1");

    let err = users::list(&ctx.pool, Page { skip: -1, limit: 10 }).await.unwrap_err();
    assert!(matches!(err, DataError::Validation(_)));
}

#[tokio::test]
async fn blank_usernames_are_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let err = users::create(
        &ctx.pool,
        &UserCreate {
            username: "   ".to_string(),
            password: "long-enough-pass".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            role: UserRole::Student,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DataError::Validation(_)), "{err:?}");
    assert!(users::find_by_username(&ctx.pool, "").await.unwrap().is_none());
}

#[tokio::test]
async fn email_can_be_set_then_cleared() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let user = test_support::insert_user(&ctx.pool, "mailer", UserRole::Student).await;
    let set = UserUpdate {
        email: Some(Some("mailer@example.com".to_string())),
        ..UserUpdate::default()
    };
    let user = users::update(&ctx.pool, user.id, &set).await.expect("set email");
    assert_eq!(user.email, "mailer@example.com");

    let untouched = UserUpdate { first_name: Some("Mail".to_string()), ..UserUpdate::default() };
    let user = users::update(&ctx.pool, user.id, &untouched).await.expect("rename");
    assert_eq!(user.email, "mailer@example.com");

    let clear = UserUpdate { email: Some(None), ..UserUpdate::default() };
    let user = users::update(&ctx.pool, user.id, &clear).await.expect("clear email");
    assert_eq!(user.email, "");
    assert_eq!(user.first_name, "Mail");
}
