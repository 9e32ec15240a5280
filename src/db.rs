//! Database connection management
//!
//! Handles connection pooling and schema bootstrap.

pub mod queries;
pub mod service;

pub use service::{DbUser, UserService};

use crate::config::DatabaseConfig;
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

/// Create a connection pool with given configuration
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.database.clone());
    cfg.pool = Some(deadpool_postgres::PoolConfig::new(config.max_pool_size));
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    if config.tls {
        // Hosted Postgres (Neon, Supabase, ...) requires TLS
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
    }
}

/// Verify the pool can hand out a working connection
pub async fn verify_connection(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;
    Ok(())
}

/// Create the HR tables if they don't exist
pub async fn create_tables(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS Users (
                User_Id SERIAL PRIMARY KEY,
                User_Name VARCHAR(255) NOT NULL,
                E_mail VARCHAR(255) UNIQUE NOT NULL,
                Password VARCHAR(255) NOT NULL,
                Role VARCHAR(50) NOT NULL DEFAULT 'employee'
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS Department (
                Dept_Id SERIAL PRIMARY KEY,
                Dept_Name VARCHAR(255) NOT NULL
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS Grade (
                Grade_Id SERIAL PRIMARY KEY,
                Grade_Name VARCHAR(255) NOT NULL,
                Basic_Salary DOUBLE PRECISION NOT NULL,
                Grade_Bonus DOUBLE PRECISION NOT NULL
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS Employee (
                Employee_Id SERIAL PRIMARY KEY,
                User_Id INTEGER NOT NULL REFERENCES Users(User_Id),
                Dept_Id INTEGER NOT NULL REFERENCES Department(Dept_Id),
                Grade_Id INTEGER NOT NULL REFERENCES Grade(Grade_Id),
                Hire_Date DATE NOT NULL
            )",
            &[],
        )
        .await?;

    client
        .execute(
            "CREATE TABLE IF NOT EXISTS Salary (
                Salary_Id SERIAL PRIMARY KEY,
                Employee_Id INTEGER NOT NULL REFERENCES Employee(Employee_Id) ON DELETE CASCADE,
                Salary DOUBLE PRECISION NOT NULL,
                Salary_Date DATE NOT NULL
            )",
            &[],
        )
        .await?;

    // Indexes for the FK lookups the list endpoints join on
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_employee_user_id ON Employee(User_Id)",
            &[],
        )
        .await;
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_employee_dept_id ON Employee(Dept_Id)",
            &[],
        )
        .await;
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_employee_grade_id ON Employee(Grade_Id)",
            &[],
        )
        .await;
    let _ = client
        .execute(
            "CREATE INDEX IF NOT EXISTS idx_salary_employee_id ON Salary(Employee_Id)",
            &[],
        )
        .await;

    info!("✅ Database tables initialized");
    Ok(())
}
