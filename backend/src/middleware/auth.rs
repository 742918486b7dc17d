use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use closet_rental_shared::{RoleName, TOKEN_COOKIE_NAME};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::debug;

use crate::error::AppError;
use crate::models::Role;
use crate::utils::jwt::{Claims, JwtService};

/// Caller identity for one request. Roles come from the database, not from
/// the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn new(user_id: i32, username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles,
        }
    }

    fn known_roles(&self) -> impl Iterator<Item = RoleName> + '_ {
        self.roles.iter().filter_map(|name| name.parse().ok())
    }

    pub fn is_admin(&self) -> bool {
        self.known_roles().any(|role| role == RoleName::Admin)
    }

    /// True when the user holds `required` or a more privileged role.
    pub fn has_role(&self, required: RoleName) -> bool {
        self.known_roles().any(|role| role.rank() <= required.rank())
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin role required".to_string()))
        }
    }

    /// Allows the user acting on their own record, or any admin.
    pub fn require_self_or_admin(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Not allowed to act on another user's data".to_string(),
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| AppError::Authentication("Not authenticated".to_string())),
        )
    }
}

/// Token from the session cookie, or from a `Bearer` header as a fallback.
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn resolve_user(pool: &PgPool, claims: &Claims) -> Result<AuthenticatedUser, AppError> {
    let user_id = claims.user_id()?;
    let roles = Role::find_names_for_user(pool, user_id).await?;
    if roles.is_empty() {
        return Err(AppError::Authentication(
            "User not found or has no roles".to_string(),
        ));
    }

    Ok(AuthenticatedUser::new(user_id, claims.username.clone(), roles))
}

/// Authenticates every request of the wrapped scope and stores the
/// resolved [`AuthenticatedUser`] in the request extensions.
pub struct AuthMiddleware {
    jwt_service: Arc<JwtService>,
    pool: PgPool,
    required_role: Option<RoleName>,
}

impl AuthMiddleware {
    pub fn new(jwt_service: Arc<JwtService>, pool: PgPool) -> Self {
        Self {
            jwt_service,
            pool,
            required_role: None,
        }
    }

    pub fn require_role(mut self, role: RoleName) -> Self {
        self.required_role = Some(role);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
            pool: self.pool.clone(),
            required_role: self.required_role,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: Arc<JwtService>,
    pool: PgPool,
    required_role: Option<RoleName>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let jwt_service = self.jwt_service.clone();
        let pool = self.pool.clone();
        let required_role = self.required_role;

        Box::pin(async move {
            // Paths no route matches fall through to the scope's 404.
            if !req.request().resource_map().has_resource(req.path()) {
                return service.call(req).await;
            }

            let token = extract_token(req.request()).ok_or_else(|| {
                AppError::Authentication("Authentication token is required".to_string())
            })?;

            let claims = jwt_service.validate_token(&token)?;
            let user = resolve_user(&pool, &claims).await?;

            if let Some(role) = required_role {
                if !user.has_role(role) {
                    debug!("User {} lacks role {} for {}", user.user_id, role, req.path());
                    return Err(AppError::Authorization(format!("{} role required", role)).into());
                }
            }

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser::new(5, "eva", roles.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn admin_is_detected_among_several_roles() {
        let caller = user(&["user", "admin"]);
        assert!(caller.is_admin());
        assert!(caller.has_role(RoleName::Renter));
        assert!(caller.require_admin().is_ok());
    }

    #[test]
    fn plain_user_is_not_admin() {
        let caller = user(&["user"]);
        assert!(!caller.is_admin());
        assert!(matches!(caller.require_admin(), Err(AppError::Authorization(_))));
        assert!(caller.has_role(RoleName::User));
        assert!(!caller.has_role(RoleName::Renter));
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        let caller = user(&["stylist"]);
        assert!(!caller.is_admin());
        assert!(!caller.has_role(RoleName::User));
    }

    #[test]
    fn self_or_admin_gate() {
        let caller = user(&["renter"]);
        assert!(caller.require_self_or_admin(5).is_ok());
        assert!(caller.require_self_or_admin(6).is_err());
        assert!(user(&["admin"]).require_self_or_admin(6).is_ok());
    }

    #[actix_web::test]
    async fn token_is_read_from_cookie_then_header() {
        use actix_web::cookie::Cookie;
        use actix_web::test::TestRequest;

        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE_NAME, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-cookie"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-header"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_token(&req), None);
    }
}
