//! Natural-language query route handler
//!
//! Thin HTTP shell over `nlquery::NlQueryGateway`. The status mapping
//! is part of the public contract: policy rejections echo the refused
//! SQL with a 400, capacity problems answer 503, and everything else
//! internal collapses to a generic 500 with the detail kept in the logs.

use crate::nlquery::GatewayError;
use crate::state::SharedState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, warn};

#[derive(Debug, Deserialize)]
pub struct NlQueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct NlQueryResponse {
    pub sql: String,
    pub result: Vec<Map<String, Value>>,
}

/// Error body for everything except policy rejections
#[derive(Debug, Serialize)]
struct GatewayErrorBody {
    error: String,
}

/// Policy rejections echo the refused statement
#[derive(Debug, Serialize)]
struct RejectedBody {
    error: &'static str,
    sql: String,
}

/// POST /api/nlquery
///
/// Translate the request text to SQL, execute it read-only and return
/// both the SQL and its rows.
pub async fn run_query(
    State(state): State<SharedState>,
    Json(payload): Json<NlQueryRequest>,
) -> Result<Json<NlQueryResponse>, NlQueryRouteError> {
    let outcome = state.gateway.handle(&payload.query).await?;
    Ok(Json(NlQueryResponse {
        sql: outcome.sql,
        result: outcome.result.rows,
    }))
}

/// Wraps `GatewayError` with the route's status mapping
#[derive(Debug)]
pub struct NlQueryRouteError(GatewayError);

impl From<GatewayError> for NlQueryRouteError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NlQueryRouteError {
    fn into_response(self) -> Response {
        match self.0 {
            GatewayError::ValidationRejected { sql, .. } => (
                StatusCode::BAD_REQUEST,
                Json(RejectedBody {
                    error: "Only SELECT queries are allowed",
                    sql,
                }),
            )
                .into_response(),
            GatewayError::InputEmpty => (
                StatusCode::BAD_REQUEST,
                Json(GatewayErrorBody {
                    error: GatewayError::InputEmpty.to_string(),
                }),
            )
                .into_response(),
            GatewayError::CapacityExceeded(detail) => {
                warn!("⏳ Gateway at capacity: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(GatewayErrorBody {
                        error: "Service is busy, try again shortly".to_string(),
                    }),
                )
                    .into_response()
            }
            other => {
                error!("❌ Natural-language query failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(GatewayErrorBody {
                        error: public_failure_message(&other).to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Caller-facing wording for internal failures. Store and backend
/// details stay in the logs.
fn public_failure_message(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::GenerationUnavailable(_) => "Text generation service is unavailable",
        GatewayError::GenerationEmpty | GatewayError::NoStatementExtracted => {
            "Could not derive a SQL statement from the request"
        }
        GatewayError::ExecutionTimeout => "Query timed out",
        GatewayError::ExecutionError(_) => "Query execution failed",
        GatewayError::SerializationUnsafeInteger { .. } => {
            "Query produced a value that cannot be represented"
        }
        _ => "Failed to process natural-language query",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_body_shape() {
        let body = serde_json::to_value(RejectedBody {
            error: "Only SELECT queries are allowed",
            sql: "DROP TABLE Employee".to_string(),
        })
        .unwrap();
        assert_eq!(body["error"], "Only SELECT queries are allowed");
        assert_eq!(body["sql"], "DROP TABLE Employee");
    }

    #[test]
    fn test_internal_failures_stay_generic() {
        let msg = public_failure_message(&GatewayError::ExecutionError(
            "db error: relation \"secrets\" does not exist".to_string(),
        ));
        assert!(!msg.contains("secrets"));
        assert_eq!(msg, "Query execution failed");
    }

    #[test]
    fn test_missing_query_field_defaults_to_empty() {
        let request: NlQueryRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.query, "");
    }
}
