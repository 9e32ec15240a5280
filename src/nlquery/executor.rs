//! Read-only statement execution with bounded results
//!
//! Every statement runs inside a read-only transaction with a
//! server-side `statement_timeout`, and rows are fetched through a
//! portal so the cap applies before the server streams an oversized
//! result set. The transaction is never committed; dropping it rolls
//! back whatever the statement touched.

use super::types::{ExecutionResult, GatewayError};
use super::validate::ValidatedStatement;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use deadpool_postgres::{Pool, PoolError};
use postgres_types::Type;
use serde_json::{Map, Number, Value};
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Column, Row};
use tracing::debug;

/// Largest integer magnitude an IEEE double represents exactly
const JSON_SAFE_INTEGER_LIMIT: u64 = 1 << 53;

pub struct QueryExecutor {
    pool: Pool,
    max_rows: usize,
    timeout: Duration,
}

impl QueryExecutor {
    pub fn new(pool: Pool, max_rows: usize, execution_timeout_ms: u64) -> Self {
        Self {
            pool,
            max_rows,
            timeout: Duration::from_millis(execution_timeout_ms),
        }
    }

    /// Run a validated statement and normalize its rows to JSON objects.
    pub async fn execute(
        &self,
        statement: &ValidatedStatement,
    ) -> Result<ExecutionResult, GatewayError> {
        let mut client = tokio::time::timeout(self.timeout, self.pool.get())
            .await
            .map_err(|_| {
                GatewayError::CapacityExceeded("no database connection available".to_string())
            })?
            .map_err(pool_error)?;

        // The client-side deadline sits above the server-side one so
        // QUERY_CANCELED arrives first and classifies the failure.
        let deadline = self.timeout + Duration::from_secs(1);
        let fetch_limit = i32::try_from(self.max_rows + 1).unwrap_or(i32::MAX);

        let work = async {
            let tx = client
                .build_transaction()
                .read_only(true)
                .start()
                .await
                .map_err(db_error)?;

            tx.batch_execute(&format!(
                "SET LOCAL statement_timeout = {}",
                self.timeout.as_millis()
            ))
            .await
            .map_err(db_error)?;

            let prepared = tx.prepare(statement.as_str()).await.map_err(db_error)?;
            let columns: Vec<String> = prepared
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect();

            let portal = tx.bind(&prepared, &[]).await.map_err(db_error)?;
            let rows = tx
                .query_portal(&portal, fetch_limit)
                .await
                .map_err(db_error)?;

            Ok::<_, GatewayError>((columns, rows))
        };

        let (columns, fetched) = tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| GatewayError::ExecutionTimeout)??;

        let (kept, truncated) = capped_len(fetched.len(), self.max_rows);
        let mut rows = Vec::with_capacity(kept);
        for row in fetched.iter().take(kept) {
            rows.push(row_to_json(row)?);
        }

        debug!(
            "Statement returned {} rows (truncated: {})",
            kept, truncated
        );

        Ok(ExecutionResult {
            columns,
            rows,
            row_count: kept,
            truncated,
        })
    }
}

fn pool_error(e: PoolError) -> GatewayError {
    match e {
        PoolError::Timeout(_) => {
            GatewayError::CapacityExceeded("database pool exhausted".to_string())
        }
        other => GatewayError::ExecutionError(other.to_string()),
    }
}

fn db_error(e: tokio_postgres::Error) -> GatewayError {
    if is_statement_timeout(e.code()) {
        GatewayError::ExecutionTimeout
    } else {
        GatewayError::ExecutionError(e.to_string())
    }
}

/// SQLSTATE 57014 is what `statement_timeout` raises
fn is_statement_timeout(code: Option<&SqlState>) -> bool {
    matches!(code, Some(c) if *c == SqlState::QUERY_CANCELED)
}

fn capped_len(fetched: usize, cap: usize) -> (usize, bool) {
    if fetched > cap {
        (cap, true)
    } else {
        (fetched, false)
    }
}

fn row_to_json(row: &Row) -> Result<Map<String, Value>, GatewayError> {
    let mut object = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_value(row, idx, column)?);
    }
    Ok(object)
}

/// Decode one column into a JSON value. NULL always maps to JSON null.
/// Types without a native decoding fall back to text; if that fails
/// too the row cannot be represented and the query errors out.
fn column_value(row: &Row, idx: usize, column: &Column) -> Result<Value, GatewayError> {
    let ty = column.type_();

    let decoded: Result<Value, tokio_postgres::Error> = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)
            .map(|v| v.map_or(Value::Null, Value::Bool))
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map(|v| v.map_or(Value::Null, |n| Value::Number(n.into())))
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map(|v| v.map_or(Value::Null, |n| Value::Number(n.into())))
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)
            .map(|v| v.map_or(Value::Null, json_safe_integer))
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)
            .map(|v| v.map_or(Value::Null, |f| json_float(f as f64)))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)
            .map(|v| v.map_or(Value::Null, json_float))
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(idx)
            .map(|v| v.map_or(Value::Null, |d| Value::String(d.to_string())))
    } else if *ty == Type::TIME {
        row.try_get::<_, Option<NaiveTime>>(idx)
            .map(|v| v.map_or(Value::Null, |t| Value::String(t.to_string())))
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(idx).map(|v| {
            v.map_or(Value::Null, |t| {
                Value::String(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            })
        })
    } else if *ty == Type::TIMESTAMPTZ {
        row.try_get::<_, Option<DateTime<Utc>>>(idx)
            .map(|v| v.map_or(Value::Null, |t| Value::String(t.to_rfc3339())))
    } else if *ty == Type::UUID {
        row.try_get::<_, Option<uuid::Uuid>>(idx)
            .map(|v| v.map_or(Value::Null, |u| Value::String(u.to_string())))
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        row.try_get::<_, Option<Value>>(idx)
            .map(|v| v.unwrap_or(Value::Null))
    } else {
        row.try_get::<_, Option<String>>(idx)
            .map(|v| v.map_or(Value::Null, Value::String))
    };

    decoded.map_err(|_| GatewayError::SerializationUnsafeInteger {
        column: column.name().to_string(),
    })
}

/// Integers at or beyond 2^53 lose precision in a JSON number,
/// so they travel as decimal strings instead.
fn json_safe_integer(v: i64) -> Value {
    if v.unsigned_abs() < JSON_SAFE_INTEGER_LIMIT {
        Value::Number(v.into())
    } else {
        Value::String(v.to_string())
    }
}

fn json_float(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}
