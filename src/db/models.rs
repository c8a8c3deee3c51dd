use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{CourseStatus, PaymentStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub date_joined: PrimitiveDateTime,
    pub last_login: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Instructor {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub enrollment_date: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub instructor_id: i64,
    pub status: CourseStatus,
    pub category_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub course_id: i64,
    pub number: i32,
    pub title: String,
    pub video_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub due_date: PrimitiveDateTime,
    pub upload_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub choice_a: String,
    pub choice_b: String,
    pub choice_c: String,
    pub choice_d: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub lesson_id: i64,
    pub question_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub course_id: i64,
    pub question_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResult {
    pub quiz_id: i64,
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentResult {
    pub id: i64,
    pub assignment_id: i64,
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub id: i64,
    pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartCourse {
    pub id: i64,
    pub course_id: i64,
    pub cart_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Track {
    pub id: i64,
    pub date: PrimitiveDateTime,
    pub student_id: i64,
    pub assignment_result_id: i64,
    pub quiz_result_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub description: String,
    pub logo: Option<String>,
    pub student_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: i64,
    pub quiz_result_id: i64,
    pub assignment_result_id: i64,
    pub calculate_result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub reference_no: String,
    pub payment_status: PaymentStatus,
}
