//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod auth;
mod dashboard;
mod departments;
mod employees;
mod grades;
mod nlquery;
mod salaries;

use crate::auth::auth_middleware;
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // User administration requires a valid bearer token
    let user_admin = Router::new()
        .route("/api/auth/users", get(auth::list_users).post(auth::create_user))
        .route(
            "/api/auth/users/{id}",
            get(auth::get_user)
                .put(auth::update_user)
                .delete(auth::delete_user),
        )
        .route_layer(middleware::from_fn(auth_middleware));

    // Build the router
    Router::new()
        // Liveness
        .route("/", get(service_info))
        .route("/health", get(health_check))

        // Authentication
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .merge(user_admin)

        // Dashboard
        .route("/api/dashboard", get(dashboard::dashboard))

        // Employees
        .route("/api/employees", get(employees::list_employees).post(employees::create_employee))
        .route("/api/employees/departments", get(employees::department_options))
        .route("/api/employees/grades", get(employees::grade_options))
        .route("/api/employees/users/employees", get(employees::employee_role_users))
        .route("/api/employees/{id}", put(employees::update_employee).delete(employees::delete_employee))

        // Departments
        .route("/api/departments", get(departments::list_departments).post(departments::create_department))
        .route("/api/departments/{id}", put(departments::update_department).delete(departments::delete_department))

        // Grades
        .route("/api/grades", get(grades::list_grades).post(grades::create_grade))
        .route("/api/grades/{id}", get(grades::get_grade).put(grades::update_grade).delete(grades::delete_grade))

        // Salaries
        .route("/api/salaries", get(salaries::list_salaries).post(salaries::create_salary))
        .route("/api/salaries/employees", get(salaries::salary_employee_options))
        .route("/api/salaries/{id}", put(salaries::update_salary).delete(salaries::delete_salary))

        // Natural-language query gateway
        .route("/api/nlquery", post(nlquery::run_query))

        // Apply middleware and state
        .layer(middleware_stack)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    }
}

/// Root endpoint, kept as a bare liveness probe for load balancers
async fn service_info() -> &'static str {
    "Server is running"
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
