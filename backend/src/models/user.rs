use chrono::{DateTime, Utc};
use closet_rental_shared::UserResponse;
use sqlx::{FromRow, PgExecutor};

use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub username: String,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Columns of a profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl User {
    pub async fn create<'e, E>(
        executor: E,
        email: &str,
        password_hash: &str,
        username: &str,
        name: Option<&str>,
        lastname: Option<&str>,
    ) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, username, name, lastname)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(name)
        .bind(lastname)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id<'e, E>(executor: E, user_id: i32) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY user_id")
            .fetch_all(executor)
            .await?;

        Ok(users)
    }

    pub async fn update_name<'e, E>(
        executor: E,
        user_id: i32,
        name: Option<&str>,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($1, name) WHERE user_id = $2 RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn update_password<'e, E>(
        executor: E,
        user_id: i32,
        password_hash: &str,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE user_id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_profile<'e, E>(
        executor: E,
        user_id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($1, name),
                lastname = COALESCE($2, lastname),
                email = COALESCE($3, email),
                username = COALESCE($4, username),
                password = COALESCE($5, password),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address)
            WHERE user_id = $8
            RETURNING *
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.lastname)
        .bind(&changes.email)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn delete<'e, E>(executor: E, user_id: i32) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub fn to_response(&self, roles: Vec<String>) -> UserResponse {
        UserResponse {
            user_id: self.user_id,
            email: self.email.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            lastname: self.lastname.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            roles,
            created_at: self.created_at,
        }
    }
}
