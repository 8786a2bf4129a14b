// src/models/assessment.rs

use serde::{Deserialize, Serialize};

/// Question type markers as stored in `questions.question_type`.
/// Anything other than 'multiple-choice' behaves as a free-text answer.
pub const SHORT_ANSWER: &str = "short-answer";
pub const MULTIPLE_CHOICE: &str = "multiple-choice";

fn default_question_type() -> String {
    SHORT_ANSWER.to_string()
}

/// DTO for creating an assessment with its questions in one batch.
///
/// The envelope fields are camelCase and optional on the wire; the service
/// layer rejects missing or empty ones with a 400 rather than letting the
/// deserializer produce a 422.
#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    #[serde(rename = "courseId")]
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub questions: Option<Vec<NewQuestion>>,
}

/// One question inside an authoring payload. Array order becomes the
/// persisted `position`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// DTO for submitting one student's answer to one question.
#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    #[serde(rename = "questionId")]
    pub question_id: Option<i64>,
    #[serde(rename = "studentAnswer")]
    pub student_answer: Option<String>,
}

/// An assessment with its questions, no student context (instructor view).
#[derive(Debug, Serialize)]
pub struct AssessmentOutline {
    pub id: i64,
    pub title: String,
    pub questions: Vec<QuestionOutline>,
}

#[derive(Debug, Serialize)]
pub struct QuestionOutline {
    pub id: i64,
    pub question_text: String,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub choices: Vec<String>,
}

/// One user's progress through an assessment, with per-question correctness
/// and an aggregate score.
#[derive(Debug, Serialize)]
pub struct AssessmentReport {
    pub id: i64,
    pub title: String,
    pub questions: Vec<QuestionReport>,
    pub score: ScoreSummary,
}

#[derive(Debug, Serialize)]
pub struct QuestionReport {
    pub id: i64,
    pub question_text: String,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub choices: Vec<String>,
    pub student_answer: Option<String>,
    pub submitted_at: Option<chrono::NaiveDateTime>,
    /// None when the question is unanswered. An unanswered question is not
    /// an incorrect one.
    pub is_correct: Option<bool>,
}

/// Completion and score figures for one assessment.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub answered: usize,
    pub correct: usize,
    pub total_questions: usize,
    pub percentage: f64,
}
