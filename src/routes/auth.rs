//! Authentication route handlers
//!
//! Provides login, signup and admin-guarded user management.

use crate::auth::{create_token, hash_password, require_role, verify_password, Claims, Role};
use crate::db::DbUser;
use crate::error::{ApiResult, AppError};
use crate::models::MessageResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<DbUser> for UserResponse {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserMutationResponse {
    pub message: String,
    pub user: UserResponse,
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown role '{}'", raw.trim())))
}

// ============================================
// Route Handlers
// ============================================

/// POST /api/auth/login
///
/// Authenticate with email and password, receive a JWT.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    // One answer for unknown email and wrong password
    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = create_token(user.id, &user.email, user.role)?;
    info!("🔑 User {} logged in", user.email);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserResponse::from(user),
        token,
    }))
}

/// POST /api/auth/signup
///
/// Register a new account. Role defaults to employee.
pub async fn signup(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let role = match req.role.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_role(raw)?,
        _ => Role::default(),
    };

    if state.users.find_by_email(req.email.trim()).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(req.name.trim(), req.email.trim(), &password_hash, role)
        .await?;

    let token = create_token(user.id, &user.email, user.role)?;
    info!("🆕 Account registered for {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// GET /api/auth/users (admin)
pub async fn list_users(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    require_role(&claims, Role::Admin)?;

    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/auth/users/{id} (admin)
pub async fn get_user(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> ApiResult<Json<UserResponse>> {
    require_role(&claims, Role::Admin)?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

/// POST /api/auth/users (admin)
pub async fn create_user(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserMutationResponse>)> {
    require_role(&claims, Role::Admin)?;

    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.role.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    let role = parse_role(&req.role)?;

    if state.users.find_by_email(req.email.trim()).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(req.name.trim(), req.email.trim(), &password_hash, role)
        .await?;
    info!("👤 Admin {} created user {}", claims.email, user.email);

    Ok((
        StatusCode::CREATED,
        Json(UserMutationResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// PUT /api/auth/users/{id} (admin)
///
/// A blank password leaves the stored hash untouched.
pub async fn update_user(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserMutationResponse>> {
    require_role(&claims, Role::Admin)?;

    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.role.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name, email, and role are required".to_string(),
        ));
    }
    let role = parse_role(&req.role)?;

    let existing = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if req.email.trim() != existing.email
        && state.users.find_by_email(req.email.trim()).await?.is_some()
    {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = match req.password.as_deref() {
        Some(p) if !p.trim().is_empty() => Some(hash_password(p)?),
        _ => None,
    };

    let user = state
        .users
        .update(
            id,
            req.name.trim(),
            req.email.trim(),
            role,
            password_hash.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    info!("✏️ Admin {} updated user {}", claims.email, user.email);

    Ok(Json(UserMutationResponse {
        message: "User updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

/// DELETE /api/auth/users/{id} (admin)
pub async fn delete_user(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    require_role(&claims, Role::Admin)?;

    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("🗑️ Admin {} deleted user {}", claims.email, id);

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
