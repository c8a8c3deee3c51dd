use serde::Deserialize;
use validator::Validate;

use super::{double_option, not_blank};

#[derive(Debug, Deserialize)]
pub struct CartCourseCreate {
    pub cart_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CertificateCreate {
    pub course_id: i64,
    pub student_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub logo: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub student_photo: Option<String>,
}

/// `logo` and `student_photo`: absent keeps the stored path, `null` clears it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CertificateUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 100))]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 100))]
    pub student_photo: Option<Option<String>>,
}

/// New payments always start as pending; status moves through
/// `payments::complete` and `payments::fail`.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentCreate {
    pub course_id: i64,
    pub student_id: i64,
    #[validate(
        length(min = 1, max = 255, message = "reference_no must be 1-255 characters"),
        custom(function = "not_blank", message = "reference_no must not be blank")
    )]
    pub reference_no: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PaymentUpdate {
    #[validate(
        length(min = 1, max = 255, message = "reference_no must be 1-255 characters"),
        custom(function = "not_blank", message = "reference_no must not be blank")
    )]
    pub reference_no: String,
}
