// src/handlers/assessment.rs
//
// Thin HTTP adapters over the assessment service: extract identity from the
// injected claims, delegate, shape the response.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::assessment::{CreateAssessmentRequest, SubmitResponseRequest},
    services::assessment as service,
    utils::jwt::Claims,
};

/// Creates an assessment with its question batch.
/// Authorization is decided inside the service via the authoring policy.
pub async fn create_assessment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let assessment_id = service::create_assessment(&pool, &pool, &claims.role, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Assessment created",
            "assessmentId": assessment_id,
        })),
    ))
}

/// Lists a course's assessments with questions (no student context).
pub async fn assessments_for_course(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outlines = service::assessments_for_course(&pool, course_id).await?;

    Ok(Json(outlines))
}

/// Submits the caller's answer to one question (insert or overwrite).
pub async fn submit_response(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    service::record_response(&pool, user_id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Response submitted" })),
    ))
}

/// Returns the caller's progress report for a course.
pub async fn progress_for_course(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let reports = service::progress_for_course(&pool, user_id, course_id).await?;

    Ok(Json(reports))
}
