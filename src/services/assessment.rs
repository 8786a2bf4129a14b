// src/services/assessment.rs
//
// Assessment core: authoring, response recording, and progress aggregation.
// Handlers pass the caller's identity and role in; everything HTTP-shaped
// stays out of this module.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::{
    error::AppError,
    models::assessment::{
        AssessmentOutline, AssessmentReport, CreateAssessmentRequest, NewQuestion, QuestionOutline,
        QuestionReport, ScoreSummary, SubmitResponseRequest, MULTIPLE_CHOICE, SHORT_ANSWER,
    },
    utils::policy,
};

/// Course-existence collaborator.
/// The assessment core only needs to know whether a course id is real; the
/// rest of the catalog is none of its business.
#[async_trait]
pub trait CourseCatalog {
    async fn course_exists(&self, course_id: i64) -> Result<bool, AppError>;
}

#[async_trait]
impl CourseCatalog for SqlitePool {
    async fn course_exists(&self, course_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?)")
            .bind(course_id)
            .fetch_one(self)
            .await?;

        Ok(exists)
    }
}

/// Authoring payload after validation; fields are guaranteed present and
/// well-formed.
#[derive(Debug)]
struct ValidatedAssessment {
    course_id: i64,
    title: String,
    questions: Vec<NewQuestion>,
}

/// Validates an authoring payload, failing the whole batch on the first
/// violation. Nothing is written before this returns Ok.
fn validate_new_assessment(
    req: CreateAssessmentRequest,
) -> Result<ValidatedAssessment, AppError> {
    let missing =
        || AppError::BadRequest("Course ID, title, and questions array are required".to_string());

    let course_id = req.course_id.ok_or_else(missing)?;
    let title = req.title.filter(|t| !t.is_empty()).ok_or_else(missing)?;
    let questions = req.questions.filter(|q| !q.is_empty()).ok_or_else(missing)?;

    for question in &questions {
        if question.question_text.is_empty() || question.correct_answer.is_empty() {
            return Err(AppError::BadRequest(
                "Each question must have text and a correct answer".to_string(),
            ));
        }
        if question.question_type == MULTIPLE_CHOICE
            && (question.choices.len() < 2 || !question.choices.contains(&question.correct_answer))
        {
            return Err(AppError::BadRequest(
                "Multiple-choice questions must have at least two options and a valid correct answer"
                    .to_string(),
            ));
        }
    }

    Ok(ValidatedAssessment {
        course_id,
        title,
        questions,
    })
}

/// Creates an assessment and its questions for a course.
///
/// * Authorization goes through `policy::can_author_assessments`.
/// * The assessment row and all question rows are written in one
///   transaction, so a failed question insert can never leave an orphaned
///   assessment behind.
/// * Question `position` is the payload's array index.
///
/// Returns the new assessment id.
pub async fn create_assessment(
    pool: &SqlitePool,
    catalog: &impl CourseCatalog,
    role: &str,
    req: CreateAssessmentRequest,
) -> Result<i64, AppError> {
    if !policy::can_author_assessments(role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let assessment = validate_new_assessment(req)?;

    if !catalog.course_exists(assessment.course_id).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let mut tx = pool.begin().await?;

    let assessment_id = sqlx::query("INSERT INTO assessments (course_id, title) VALUES (?, ?)")
        .bind(assessment.course_id)
        .bind(&assessment.title)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create assessment: {:?}", e);
            AppError::from(e)
        })?
        .last_insert_rowid();

    for (position, question) in assessment.questions.iter().enumerate() {
        let choices_json = encode_choices(&question.choices)?;

        sqlx::query(
            "INSERT INTO questions
             (assessment_id, position, question_text, correct_answer, question_type, choices)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(assessment_id)
        .bind(position as i64)
        .bind(&question.question_text)
        .bind(&question.correct_answer)
        .bind(&question.question_type)
        .bind(choices_json)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add questions: {:?}", e);
            AppError::from(e)
        })?;
    }

    tx.commit().await?;

    Ok(assessment_id)
}

/// Records one student's answer to one question.
///
/// Upsert keyed by (user, question): a resubmission overwrites the stored
/// answer and refreshes `submitted_at` in a single atomic statement, so a
/// concurrent double-submit resolves to last-write-wins. The question id is
/// deliberately not looked up here; a dangling id trips the foreign key and
/// surfaces as a storage error.
pub async fn record_response(
    pool: &SqlitePool,
    user_id: i64,
    req: SubmitResponseRequest,
) -> Result<(), AppError> {
    let missing = || AppError::BadRequest("Question ID and answer are required".to_string());

    let question_id = req.question_id.ok_or_else(missing)?;
    let answer = req
        .student_answer
        .filter(|a| !a.is_empty())
        .ok_or_else(missing)?;

    sqlx::query(
        "INSERT INTO student_responses (user_id, question_id, student_answer)
         VALUES (?, ?, ?)
         ON CONFLICT (user_id, question_id) DO UPDATE SET
             student_answer = excluded.student_answer,
             submitted_at = CURRENT_TIMESTAMP",
    )
    .bind(user_id)
    .bind(question_id)
    .bind(&answer)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to submit response: {:?}", e);
        AppError::from(e)
    })?;

    Ok(())
}

/// Flat row of the course-level listing query (no student context).
#[derive(Debug, FromRow)]
struct OutlineRow {
    assessment_id: i64,
    title: String,
    question_id: Option<i64>,
    question_text: Option<String>,
    correct_answer: Option<String>,
    question_type: Option<String>,
    choices: Option<String>,
}

/// Lists a course's assessments with their questions, ordered by question
/// position. Assessments without questions appear with an empty list.
pub async fn assessments_for_course(
    pool: &SqlitePool,
    course_id: i64,
) -> Result<Vec<AssessmentOutline>, AppError> {
    let rows: Vec<OutlineRow> = sqlx::query_as(
        "SELECT a.id AS assessment_id, a.title, q.id AS question_id, q.question_text,
                q.correct_answer, q.question_type, q.choices
         FROM assessments a
         LEFT JOIN questions q ON q.assessment_id = a.id
         WHERE a.course_id = ?
         ORDER BY a.id, q.position",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch assessments: {:?}", e);
        AppError::from(e)
    })?;

    group_outline_rows(rows)
}

/// Flat row of the progress query: question joined with the caller's
/// response, if any.
#[derive(Debug, FromRow)]
struct ProgressRow {
    assessment_id: i64,
    title: String,
    question_id: i64,
    question_text: String,
    correct_answer: String,
    question_type: String,
    choices: Option<String>,
    student_answer: Option<String>,
    submitted_at: Option<chrono::NaiveDateTime>,
}

/// Builds one user's progress report for a course: every assessment with
/// every question, the latest stored answer where one exists, per-question
/// correctness, and a per-assessment score summary.
pub async fn progress_for_course(
    pool: &SqlitePool,
    user_id: i64,
    course_id: i64,
) -> Result<Vec<AssessmentReport>, AppError> {
    let rows: Vec<ProgressRow> = sqlx::query_as(
        "SELECT a.id AS assessment_id, a.title, q.id AS question_id, q.question_text,
                q.correct_answer, q.question_type, q.choices,
                sr.student_answer, sr.submitted_at
         FROM assessments a
         JOIN questions q ON q.assessment_id = a.id
         LEFT JOIN student_responses sr ON sr.question_id = q.id AND sr.user_id = ?
         WHERE a.course_id = ?
         ORDER BY a.id, q.position",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch progress: {:?}", e);
        AppError::from(e)
    })?;

    group_progress_rows(rows)
}

/// Choices travel through the database as a JSON-encoded string array.
/// Encoding and decoding happen here and nowhere else.
fn encode_choices(choices: &[String]) -> Result<Option<String>, AppError> {
    if choices.is_empty() {
        return Ok(None);
    }

    serde_json::to_string(choices)
        .map(Some)
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

fn decode_choices(raw: Option<&str>) -> Result<Vec<String>, AppError> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s)
            .map_err(|e| AppError::InternalServerError(format!("Corrupt choices column: {}", e))),
    }
}

/// Folds flat listing rows into nested assessments, preserving the
/// first-seen order of assessments and the row order of questions.
fn group_outline_rows(rows: Vec<OutlineRow>) -> Result<Vec<AssessmentOutline>, AppError> {
    let mut outlines: Vec<AssessmentOutline> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let slot = match slots.get(&row.assessment_id) {
            Some(&slot) => slot,
            None => {
                outlines.push(AssessmentOutline {
                    id: row.assessment_id,
                    title: row.title.clone(),
                    questions: Vec::new(),
                });
                slots.insert(row.assessment_id, outlines.len() - 1);
                outlines.len() - 1
            }
        };

        // A LEFT JOIN row with no question id is an assessment without
        // questions; it still gets its (empty) entry.
        if let Some(question_id) = row.question_id {
            outlines[slot].questions.push(QuestionOutline {
                id: question_id,
                question_text: row.question_text.unwrap_or_default(),
                correct_answer: row.correct_answer.unwrap_or_default(),
                question_type: row
                    .question_type
                    .unwrap_or_else(|| SHORT_ANSWER.to_string()),
                choices: decode_choices(row.choices.as_deref())?,
            });
        }
    }

    Ok(outlines)
}

/// Folds flat progress rows into per-assessment reports and attaches the
/// score summary.
fn group_progress_rows(rows: Vec<ProgressRow>) -> Result<Vec<AssessmentReport>, AppError> {
    let mut reports: Vec<AssessmentReport> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let slot = match slots.get(&row.assessment_id) {
            Some(&slot) => slot,
            None => {
                reports.push(AssessmentReport {
                    id: row.assessment_id,
                    title: row.title.clone(),
                    questions: Vec::new(),
                    score: ScoreSummary::default(),
                });
                slots.insert(row.assessment_id, reports.len() - 1);
                reports.len() - 1
            }
        };

        // Unanswered stays None; it is not the same thing as wrong.
        let is_correct = row
            .student_answer
            .as_deref()
            .map(|answer| answer == row.correct_answer);

        reports[slot].questions.push(QuestionReport {
            id: row.question_id,
            question_text: row.question_text,
            correct_answer: row.correct_answer,
            question_type: row.question_type,
            choices: decode_choices(row.choices.as_deref())?,
            student_answer: row.student_answer,
            submitted_at: row.submitted_at,
            is_correct,
        });
    }

    for report in &mut reports {
        report.score = score_questions(&report.questions);
    }

    Ok(reports)
}

/// Computes the completion/score summary for one assessment's questions.
/// Unanswered questions count toward the total but toward neither
/// `answered` nor `correct`.
pub fn score_questions(questions: &[QuestionReport]) -> ScoreSummary {
    let total_questions = questions.len();
    let answered = questions
        .iter()
        .filter(|q| q.student_answer.is_some())
        .count();
    let correct = questions
        .iter()
        .filter(|q| q.is_correct == Some(true))
        .count();

    let percentage = if total_questions > 0 {
        (correct as f64 / total_questions as f64) * 100.0
    } else {
        0.0
    };

    ScoreSummary {
        answered,
        correct,
        total_questions,
        percentage,
    }
}
