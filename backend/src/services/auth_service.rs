use closet_rental_shared::{
    LoginRequest, RegisterRequest, RoleName, UpdatePasswordRequest, UpdateUserRequest, UserResponse,
    DEFAULT_ROLE_NAME, ERROR_EMAIL_ALREADY_EXISTS, ERROR_INVALID_CREDENTIALS,
};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::database::TransactionManager;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::{Item, Role, User, UserRole};
use crate::utils::jwt::JwtService;

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Session token issued by a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    transactions: TransactionManager,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(pool: PgPool, transactions: TransactionManager, jwt_service: Arc<JwtService>) -> Self {
        Self {
            pool,
            transactions,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Public sign-up. The requested role defaults to `user`; the admin
    /// role can only be granted through [`AuthService::register_admin`].
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        let role_name = request
            .rol
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE_NAME.to_string());

        if role_name == RoleName::Admin.as_str() {
            return Err(AppError::Authorization(
                "The admin role cannot be self-assigned".to_string(),
            ));
        }

        self.create_account(request, role_name).await
    }

    pub async fn register_admin(
        &self,
        caller: &AuthenticatedUser,
        request: RegisterRequest,
    ) -> Result<UserResponse, AppError> {
        caller.require_admin()?;
        self.create_account(request, RoleName::Admin.as_str().to_string())
            .await
    }

    /// Creates the user, its role (if new) and the link in one transaction.
    async fn create_account(&self, request: RegisterRequest, role_name: String) -> Result<UserResponse, AppError> {
        request.validate()?;

        if User::find_by_email(&self.pool, &request.email).await?.is_some() {
            return Err(AppError::Conflict(ERROR_EMAIL_ALREADY_EXISTS.to_string()));
        }

        let password_hash = hash_password(&request.password).await?;

        let user = self
            .transactions
            .run("register user", move |tx| {
                Box::pin(async move {
                    let role = Role::insert_or_get(&mut **tx, &role_name).await?;
                    let user = User::create(
                        &mut **tx,
                        &request.email,
                        &password_hash,
                        &request.username,
                        request.name.as_deref(),
                        request.lastname.as_deref(),
                    )
                    .await?;
                    UserRole::create(&mut **tx, user.user_id, role.role_id).await?;
                    Ok::<_, AppError>(user.to_response(vec![role.role_name]))
                })
            })
            .await?;

        info!("Registered user {} ({}) with roles {:?}", user.user_id, user.email, user.roles);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        request.validate()?;

        let user = User::find_by_email(&self.pool, &request.email)
            .await?
            .ok_or_else(|| AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash).await? {
            warn!("Failed login attempt for user {}", user.user_id);
            return Err(AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()));
        }

        let roles = Role::find_names_for_user(&self.pool, user.user_id).await?;
        let token = self.jwt_service.generate_token(user.user_id, &user.username)?;

        info!("User {} logged in", user.user_id);
        Ok(LoginOutcome {
            token,
            user: user.to_response(roles),
        })
    }

    pub async fn get_users(&self, caller: &AuthenticatedUser) -> Result<Vec<UserResponse>, AppError> {
        caller.require_admin()?;

        let users = User::find_all(&self.pool).await?;
        let user_ids: Vec<i32> = users.iter().map(|u| u.user_id).collect();

        let mut roles: HashMap<i32, Vec<String>> = HashMap::new();
        for link in Role::find_names_for_users(&self.pool, &user_ids).await? {
            roles.entry(link.user_id).or_default().push(link.role_name);
        }

        Ok(users
            .iter()
            .map(|u| u.to_response(roles.remove(&u.user_id).unwrap_or_default()))
            .collect())
    }

    pub async fn get_user(&self, caller: &AuthenticatedUser, user_id: i32) -> Result<UserResponse, AppError> {
        caller.require_self_or_admin(user_id)?;

        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let roles = Role::find_names_for_user(&self.pool, user_id).await?;

        Ok(user.to_response(roles))
    }

    /// Updates the display name and, for admins, replaces the user's role.
    pub async fn update_user(
        &self,
        caller: &AuthenticatedUser,
        user_id: i32,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;
        caller.require_self_or_admin(user_id)?;
        if request.rol.is_some() {
            caller.require_admin()?;
        }

        let user = self
            .transactions
            .run("update user", move |tx| {
                Box::pin(async move {
                    let user = User::update_name(&mut **tx, user_id, request.name.as_deref())
                        .await?
                        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

                    if let Some(role_name) = &request.rol {
                        let role = Role::insert_or_get(&mut **tx, role_name).await?;
                        UserRole::delete_all_for_user(&mut **tx, user_id).await?;
                        UserRole::create(&mut **tx, user_id, role.role_id).await?;
                    }

                    let roles = Role::find_names_for_user(&mut **tx, user_id).await?;
                    Ok::<_, AppError>(user.to_response(roles))
                })
            })
            .await?;

        info!("Updated user {} by {}", user_id, caller.user_id);
        Ok(user)
    }

    pub async fn update_password(
        &self,
        caller: &AuthenticatedUser,
        user_id: i32,
        request: UpdatePasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        caller.require_self_or_admin(user_id)?;

        let password_hash = hash_password(&request.password).await?;
        if !User::update_password(&self.pool, user_id, &password_hash).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!("Password changed for user {}", user_id);
        Ok(())
    }

    /// Removes a user, their role links and their items. Users whose items
    /// appear on orders cannot be removed.
    pub async fn delete_user(&self, caller: &AuthenticatedUser, user_id: i32) -> Result<(), AppError> {
        caller.require_admin()?;

        self.transactions
            .run("delete user", move |tx| {
                Box::pin(async move {
                    if Item::owner_has_order_history(&mut **tx, user_id).await? {
                        return Err(AppError::Conflict(format!(
                            "Items of user {} are referenced by orders",
                            user_id
                        )));
                    }

                    Item::delete_by_owner(&mut **tx, user_id).await?;
                    UserRole::delete_all_for_user(&mut **tx, user_id).await?;
                    if !User::delete(&mut **tx, user_id).await? {
                        return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
                    }
                    Ok(())
                })
            })
            .await?;

        info!("Deleted user {} by {}", user_id, caller.user_id);
        Ok(())
    }
}
