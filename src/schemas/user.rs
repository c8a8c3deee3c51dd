use serde::Deserialize;
use validator::Validate;

use super::{double_option, not_blank};
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(
        length(min = 1, max = 150, message = "username must be 1-150 characters"),
        custom(function = "not_blank", message = "username must not be blank")
    )]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    /// `null` clears the address.
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email, length(max = 254))]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InstructorCreate {
    pub user_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"), length(max = 254))]
    pub email: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct InstructorUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"), length(max = 254))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentCreate {
    pub user_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct StudentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
}
