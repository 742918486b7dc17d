use closet_rental_shared::{
    CreateUserRoleRequest, EncryptedPayload, RoleRequest, UpdateUserRolesRequest, UserInfoRoleUpdate, UserResponse,
};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::database::TransactionManager;
use crate::error::AppError;
use crate::models::{ProfileChanges, Role, User, UserRole};
use crate::security::FieldCipher;
use crate::services::auth_service::hash_password;

/// Role catalogue and user-role assignments. Callers are admin-gated at the
/// route level.
#[derive(Clone)]
pub struct RoleService {
    pool: PgPool,
    transactions: TransactionManager,
    cipher: Arc<FieldCipher>,
}

async fn replace_roles(
    tx: &mut Transaction<'static, Postgres>,
    user_id: i32,
    role_ids: &[i32],
) -> Result<(), AppError> {
    UserRole::delete_all_for_user(&mut **tx, user_id).await?;
    for role_id in role_ids {
        UserRole::create(&mut **tx, user_id, *role_id).await?;
    }
    Ok(())
}

impl RoleService {
    pub fn new(pool: PgPool, transactions: TransactionManager, cipher: Arc<FieldCipher>) -> Self {
        Self {
            pool,
            transactions,
            cipher,
        }
    }

    fn role_not_found() -> AppError {
        AppError::NotFound("Role not found".to_string())
    }

    pub async fn get_all_roles(&self) -> Result<Vec<Role>, AppError> {
        Role::find_all(&self.pool).await
    }

    pub async fn get_role_by_id(&self, role_id: i32) -> Result<Role, AppError> {
        Role::find_by_id(&self.pool, role_id)
            .await?
            .ok_or_else(Self::role_not_found)
    }

    pub async fn create_role(&self, request: RoleRequest) -> Result<Role, AppError> {
        request.validate()?;
        let role = Role::create(&self.pool, &request.role_name).await?;
        info!("Created role {} '{}'", role.role_id, role.role_name);
        Ok(role)
    }

    pub async fn update_role(&self, role_id: i32, request: RoleRequest) -> Result<Role, AppError> {
        request.validate()?;
        Role::update(&self.pool, role_id, &request.role_name)
            .await?
            .ok_or_else(Self::role_not_found)
    }

    pub async fn delete_role(&self, role_id: i32) -> Result<Role, AppError> {
        let role = Role::delete(&self.pool, role_id)
            .await?
            .ok_or_else(Self::role_not_found)?;
        info!("Deleted role {} '{}'", role.role_id, role.role_name);
        Ok(role)
    }

    /// Roles of a user, returned as an encrypted JSON list.
    pub async fn get_user_roles_by_user_id(&self, user_id: i32) -> Result<EncryptedPayload, AppError> {
        let roles = Role::find_for_user(&self.pool, user_id).await?;
        Ok(EncryptedPayload {
            encrypted_data: self.cipher.encrypt(&roles)?,
        })
    }

    pub async fn create_user_role(&self, request: CreateUserRoleRequest) -> Result<UserRole, AppError> {
        let link = UserRole::create(&self.pool, request.user_id, request.role_id).await?;
        info!("Granted role {} to user {}", link.role_id, link.user_id);
        Ok(link)
    }

    pub async fn delete_user_role(&self, user_id: i32, role_id: i32) -> Result<UserRole, AppError> {
        UserRole::delete(&self.pool, user_id, role_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User role not found".to_string()))
    }

    /// Replaces the full role set of a user.
    pub async fn update_user_roles(&self, user_id: i32, request: UpdateUserRolesRequest) -> Result<(), AppError> {
        let role_ids = request.roles;
        self.transactions
            .run("replace user roles", move |tx| {
                Box::pin(async move { replace_roles(tx, user_id, &role_ids).await })
            })
            .await?;

        info!("Replaced roles of user {}", user_id);
        Ok(())
    }

    /// Applies an encrypted profile update and, when present, a new role set.
    pub async fn update_user_info_and_roles(
        &self,
        user_id: i32,
        payload: EncryptedPayload,
    ) -> Result<UserResponse, AppError> {
        let update: UserInfoRoleUpdate = self.cipher.decrypt(&payload.encrypted_data).map_err(|e| {
            warn!("Rejected profile payload for user {}: {}", user_id, e);
            AppError::Validation("encryptedData: cannot be decrypted".to_string())
        })?;
        update.validate()?;

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let changes = ProfileChanges {
            name: update.name,
            lastname: update.lastname,
            email: update.email,
            username: update.username,
            password_hash,
            phone: update.phone,
            address: update.address,
        };
        let roles = update.roles;

        let user = self
            .transactions
            .run("update user info and roles", move |tx| {
                Box::pin(async move {
                    let user = User::update_profile(&mut **tx, user_id, &changes)
                        .await?
                        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

                    if let Some(role_ids) = &roles {
                        replace_roles(tx, user_id, role_ids).await?;
                    }

                    let role_names = Role::find_names_for_user(&mut **tx, user_id).await?;
                    Ok::<_, AppError>(user.to_response(role_names))
                })
            })
            .await?;

        info!("Updated profile and roles of user {}", user_id);
        Ok(user)
    }
}
