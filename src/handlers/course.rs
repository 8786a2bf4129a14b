// src/handlers/course.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::course::{Course, CreateCourseRequest},
    utils::{jwt::Claims, policy},
};

/// Lists all courses.
pub async fn list_courses(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let courses: Vec<Course> = sqlx::query_as(
        "SELECT id, title, description, created_at
         FROM courses
         ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list courses: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(courses))
}

/// Retrieves a single course by ID.
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course: Option<Course> = sqlx::query_as(
        "SELECT id, title, description, created_at
         FROM courses
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    let course = course.ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Creates a new course. Catalog writes are admin-gated.
pub async fn create_course(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !policy::can_manage_courses(&claims.role) {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = sqlx::query("INSERT INTO courses (title, description) VALUES (?, ?)")
        .bind(&payload.title)
        .bind(&payload.description)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create course: {:?}", e);
            AppError::from(e)
        })?
        .last_insert_rowid();

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}
