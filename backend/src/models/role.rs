use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: i32,
    pub role_id: i32,
}

/// A role name tagged with the user holding it.
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleName {
    pub user_id: i32,
    pub role_name: String,
}

impl Role {
    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY role_id")
            .fetch_all(executor)
            .await?;

        Ok(roles)
    }

    pub async fn find_by_id<'e, E>(executor: E, role_id: i32) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE role_id = $1")
            .bind(role_id)
            .fetch_optional(executor)
            .await?;

        Ok(role)
    }

    pub async fn create<'e, E>(executor: E, role_name: &str) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (role_name) VALUES ($1) RETURNING *",
        )
        .bind(role_name)
        .fetch_one(executor)
        .await?;

        Ok(role)
    }

    /// Returns the role called `role_name`, creating it first if needed.
    pub async fn insert_or_get<'e, E>(executor: E, role_name: &str) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        // DO UPDATE (not DO NOTHING) so RETURNING yields the existing row too.
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (role_name) VALUES ($1)
            ON CONFLICT (role_name) DO UPDATE SET role_name = EXCLUDED.role_name
            RETURNING *
            "#,
        )
        .bind(role_name)
        .fetch_one(executor)
        .await?;

        Ok(role)
    }

    pub async fn update<'e, E>(
        executor: E,
        role_id: i32,
        role_name: &str,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>(
            "UPDATE roles SET role_name = $1 WHERE role_id = $2 RETURNING *",
        )
        .bind(role_name)
        .bind(role_id)
        .fetch_optional(executor)
        .await?;

        Ok(role)
    }

    pub async fn delete<'e, E>(executor: E, role_id: i32) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>("DELETE FROM roles WHERE role_id = $1 RETURNING *")
            .bind(role_id)
            .fetch_optional(executor)
            .await?;

        Ok(role)
    }

    pub async fn find_for_user<'e, E>(executor: E, user_id: i32) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.role_id, r.role_name
            FROM user_roles ur
            JOIN roles r ON r.role_id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.role_id
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(roles)
    }

    pub async fn find_names_for_user<'e, E>(executor: E, user_id: i32) -> Result<Vec<String>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.role_name
            FROM user_roles ur
            JOIN roles r ON r.role_id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.role_id
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(names)
    }

    pub async fn find_names_for_users<'e, E>(
        executor: E,
        user_ids: &[i32],
    ) -> Result<Vec<UserRoleName>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let names = sqlx::query_as::<_, UserRoleName>(
            r#"
            SELECT ur.user_id, r.role_name
            FROM user_roles ur
            JOIN roles r ON r.role_id = ur.role_id
            WHERE ur.user_id = ANY($1)
            ORDER BY ur.user_id, r.role_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(executor)
        .await?;

        Ok(names)
    }
}

impl UserRole {
    pub async fn create<'e, E>(executor: E, user_id: i32, role_id: i32) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let link = sqlx::query_as::<_, UserRole>(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_one(executor)
        .await?;

        Ok(link)
    }

    pub async fn delete<'e, E>(
        executor: E,
        user_id: i32,
        role_id: i32,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let link = sqlx::query_as::<_, UserRole>(
            "DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(executor)
        .await?;

        Ok(link)
    }

    pub async fn delete_all_for_user<'e, E>(executor: E, user_id: i32) -> Result<u64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
