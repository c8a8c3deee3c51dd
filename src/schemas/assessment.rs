use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct QuestionCreate {
    #[validate(length(min = 1, max = 255))]
    pub question: String,
    #[validate(length(min = 1, max = 255))]
    pub choice_a: String,
    #[validate(length(min = 1, max = 255))]
    pub choice_b: String,
    #[validate(length(min = 1, max = 255))]
    pub choice_c: String,
    #[validate(length(min = 1, max = 255))]
    pub choice_d: String,
    #[validate(length(min = 1, max = 255))]
    pub correct_answer: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct QuestionUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub question: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub choice_a: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub choice_b: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub choice_c: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub choice_d: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCreate {
    pub lesson_id: i64,
    pub question_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExamCreate {
    pub course_id: i64,
    pub question_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuizResultCreate {
    pub quiz_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub score: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignmentResultCreate {
    pub assignment_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub score: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScoreUpdate {
    #[validate(length(min = 1, max = 255))]
    pub score: String,
}

#[derive(Debug, Deserialize)]
pub struct TrackCreate {
    pub student_id: i64,
    pub assignment_result_id: i64,
    pub quiz_result_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackUpdate {
    #[serde(default)]
    pub assignment_result_id: Option<i64>,
    #[serde(default)]
    pub quiz_result_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeCreate {
    pub quiz_result_id: i64,
    pub assignment_result_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub calculate_result: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeUpdate {
    #[validate(length(min = 1, max = 255))]
    pub calculate_result: String,
}
