//! HRFlow API - HR Records Platform
//!
//! Employee, department, grade, and salary management backed by PostgreSQL,
//! with JWT-authenticated user administration and a dashboard of aggregate
//! headcount and payroll figures.
//!
//! NATURAL-LANGUAGE QUERY GATEWAY: The server's core feature turns plain
//! English questions into guarded SQL:
//! - Stage 1 (Prompt): schema-grounded prompt assembly
//! - Stage 2 (Generate): Gemini produces a candidate statement
//! - Stage 3 (Validate): SELECT-only policy screens the candidate
//! - Stage 4 (Execute): read-only, time-boxed, row-capped execution

mod auth;
mod config;
mod db;
mod error;
mod models;
mod nlquery;
mod routes;
mod state;

use crate::config::Settings;
use crate::nlquery::{GeminiClient, NlQueryGateway, QueryExecutor, TextGenerator};
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting HRFlow - HR Records Platform...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    // Initialize database pool - REQUIRED (no fallback to in-memory)
    let pool = db::create_pool(&settings.database)?;
    match db::verify_connection(&pool).await {
        Ok(()) => info!("✅ Database connection successful (TLS: {})", settings.database.tls),
        Err(e) => {
            error!("❌ FATAL: Failed to reach the database: {}", e);
            error!("Database settings must point at a reachable PostgreSQL instance");
            panic!("Cannot start server without database connection");
        }
    }

    // Create tables if they don't exist
    if let Err(e) = db::create_tables(&pool).await {
        warn!("⚠️  Warning creating tables: {}", e);
    }

    // Assemble the natural-language query gateway
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(&settings.generation)?);
    let query_pool = match &settings.gateway.readonly_database {
        Some(readonly) => {
            let ro_pool = db::create_pool(readonly)?;
            db::verify_connection(&ro_pool).await?;
            info!("🔒 Query gateway bound to a dedicated read-only pool");
            ro_pool
        }
        None => pool.clone(),
    };
    let executor = QueryExecutor::new(
        query_pool,
        settings.gateway.max_rows,
        settings.gateway.execution_timeout_ms,
    );
    let gateway = NlQueryGateway::new(generator, executor, settings.gateway.max_concurrency);

    let state = Arc::new(AppState::new(pool, gateway));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Authentication ───");
    info!("   POST /api/auth/login           - Login with email/password");
    info!("   POST /api/auth/signup          - Register new account");
    info!("   GET  /api/auth/users           - List accounts (admin, JWT)");
    info!("");
    info!("   ─── HR Records ───");
    info!("   GET  /api/dashboard            - Headcount and payroll aggregates");
    info!("   GET  /api/employees            - List employees");
    info!("   GET  /api/departments          - List departments");
    info!("   GET  /api/grades               - List grades");
    info!("   GET  /api/salaries             - List salary records");
    info!("");
    info!("   ─── Natural-Language Queries (Core Feature) ───");
    info!("   POST /api/nlquery              - English in, SELECT out, rows back");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hrflow_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
