//! Authentication middleware
//!
//! Extracts and validates JWT tokens from requests.

use crate::auth::{decode_token, Claims, Role};
use crate::error::AppError;
use axum::http::header::AUTHORIZATION;
use axum::{extract::Request, middleware::Next, response::Response};

/// Extract claims from request
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let claims = decode_token(token)?;

    // Insert claims into request extensions for handlers to use
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require specific role
pub fn require_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    let has_permission = match required {
        Role::Employee => true, // Every authenticated account
        Role::Hr => claims.role.can_manage_records(),
        Role::Admin => claims.role.can_manage_users(),
    };

    if !has_permission {
        return Err(AppError::Forbidden(format!(
            "Requires {} role, you have {}",
            required, claims.role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(role: Role) -> Claims {
        Claims {
            sub: 1,
            email: "user@example.com".to_string(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require_role_matrix() {
        assert!(require_role(&claims_for(Role::Admin), Role::Admin).is_ok());
        assert!(require_role(&claims_for(Role::Admin), Role::Hr).is_ok());
        assert!(require_role(&claims_for(Role::Hr), Role::Admin).is_err());
        assert!(require_role(&claims_for(Role::Hr), Role::Hr).is_ok());
        assert!(require_role(&claims_for(Role::Employee), Role::Hr).is_err());
        assert!(require_role(&claims_for(Role::Employee), Role::Employee).is_ok());
    }
}
