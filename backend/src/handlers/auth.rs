use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    delete, get, post, put, web, HttpResponse,
};
use closet_rental_shared::{
    LoginRequest, MessageResponse, RegisterRequest, UpdatePasswordRequest, UpdateUserRequest, SUCCESS_LOGIN,
    SUCCESS_LOGOUT, SUCCESS_PASSWORD_CHANGED, SUCCESS_USER_CREATED, TOKEN_COOKIE_NAME,
};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::AuthService;

fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE_NAME, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

#[post("/register")]
pub async fn register(
    auth_service: web::Data<AuthService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = auth_service.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": SUCCESS_USER_CREATED,
        "user": user,
    })))
}

#[post("/register_admin")]
pub async fn register_admin(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let created = auth_service.register_admin(&user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": SUCCESS_USER_CREATED,
        "user": created,
    })))
}

/// Verifies the credentials and sets the HTTP-only session cookie.
#[post("/login")]
pub async fn login(
    auth_service: web::Data<AuthService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = auth_service.login(req.into_inner()).await?;
    let cookie = session_cookie(outcome.token, auth_service.jwt_service().expiry_secs());

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "success": true,
        "message": SUCCESS_LOGIN,
        "user": outcome.user,
    })))
}

#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = session_cookie(String::new(), 0);
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::ok(SUCCESS_LOGOUT))
}

#[get("/get-users")]
pub async fn get_users(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let users = auth_service.get_users(&user).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "users": users,
    })))
}

#[get("/me")]
pub async fn get_current_user(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service.get_user(&user, user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/protected")]
pub async fn protected(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "info": "protected info",
        "user_id": user.user_id,
        "roles": user.roles,
    }))
}

#[get("/user/{user_id}")]
pub async fn get_user_info_by_id(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service.get_user(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/updateinfo/{user_id}")]
pub async fn update_user(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let updated = auth_service
        .update_user(&user, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[put("/{user_id}/password")]
pub async fn update_password(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    auth_service
        .update_password(&user, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(SUCCESS_PASSWORD_CHANGED)))
}

#[delete("/auth/delete/{user_id}")]
pub async fn delete_user(
    auth_service: web::Data<AuthService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    auth_service.delete_user(&user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
