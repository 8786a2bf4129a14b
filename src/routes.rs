// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessment, auth, course},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, courses, assessments).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool, Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Writes are admin-gated inside the handlers/services via the policy
    // module; the middleware here only establishes identity.
    let course_routes = Router::new()
        .route("/", get(course::list_courses).post(course::create_course))
        .route("/{id}", get(course::get_course))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let assessment_routes = Router::new()
        .route("/", post(assessment::create_assessment))
        .route(
            "/course/{course_id}",
            get(assessment::assessments_for_course),
        )
        .route("/response", post(assessment::submit_response))
        .route(
            "/progress/{course_id}",
            get(assessment::progress_for_course),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/courses", course_routes)
        .nest("/api/assessments", assessment_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
