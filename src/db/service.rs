// Database service for account operations
//
// Provides direct database access for the Users table

use crate::auth::Role;
use crate::error::AppError;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;

// User record from database
#[derive(Clone, Debug)]
pub struct DbUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl DbUser {
    fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            id: row.get(0),
            name: row.get(1),
            email: row.get(2),
            password_hash: row.get(3),
            role: row.get::<_, String>(4).parse().unwrap_or_default(),
        }
    }
}

// User service for database operations
pub struct UserService {
    pool: Pool,
}

impl UserService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // Create a new user account
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<DbUser, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "INSERT INTO Users (User_Name, E_mail, Password, Role)
                 VALUES ($1, $2, $3, $4)
                 RETURNING User_Id, User_Name, E_mail, Password, Role",
                &[&name, &email, &password_hash, &role.to_string()],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::Conflict("Email already registered".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(DbUser::from_row(&row))
    }

    // Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<DbUser>, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT User_Id, User_Name, E_mail, Password, Role
                 FROM Users WHERE E_mail = $1",
                &[&email],
            )
            .await?;

        Ok(row.map(|r| DbUser::from_row(&r)))
    }

    // Find user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<DbUser>, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT User_Id, User_Name, E_mail, Password, Role
                 FROM Users WHERE User_Id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|r| DbUser::from_row(&r)))
    }

    // List all user accounts
    pub async fn list(&self) -> Result<Vec<DbUser>, AppError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT User_Id, User_Name, E_mail, Password, Role
                 FROM Users ORDER BY User_Id ASC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(DbUser::from_row).collect())
    }

    // Update a user; password stays untouched when None
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        email: &str,
        role: Role,
        password_hash: Option<&str>,
    ) -> Result<Option<DbUser>, AppError> {
        let client = self.pool.get().await?;

        let result = match password_hash {
            Some(hash) => {
                client
                    .query_opt(
                        "UPDATE Users
                         SET User_Name = $1, E_mail = $2, Role = $3, Password = $4
                         WHERE User_Id = $5
                         RETURNING User_Id, User_Name, E_mail, Password, Role",
                        &[&name, &email, &role.to_string(), &hash, &id],
                    )
                    .await
            }
            None => {
                client
                    .query_opt(
                        "UPDATE Users
                         SET User_Name = $1, E_mail = $2, Role = $3
                         WHERE User_Id = $4
                         RETURNING User_Id, User_Name, E_mail, Password, Role",
                        &[&name, &email, &role.to_string(), &id],
                    )
                    .await
            }
        };

        let row = result.map_err(|e| {
            if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                AppError::Conflict("Email already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.map(|r| DbUser::from_row(&r)))
    }

    // Delete a user account
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let client = self.pool.get().await?;

        let affected = client
            .execute("DELETE FROM Users WHERE User_Id = $1", &[&id])
            .await?;

        Ok(affected > 0)
    }
}
