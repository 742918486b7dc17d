use actix_web::{delete, get, post, put, web, HttpResponse};
use closet_rental_shared::{
    CreateUserRoleRequest, EncryptedPayload, MessageResponse, UpdateUserRolesRequest, SUCCESS_USER_ROLES_UPDATED,
};
use serde_json::json;

use crate::error::AppError;
use crate::services::RoleService;

/// Roles of one user, as `{"encryptedData": ...}`.
#[get("/user/{user_id}")]
pub async fn get_user_roles_by_user_id(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let payload = role_service.get_user_roles_by_user_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payload))
}

#[post("")]
pub async fn create_user_role(
    role_service: web::Data<RoleService>,
    req: web::Json<CreateUserRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let link = role_service.create_user_role(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(link))
}

#[delete("/{user_id}/{role_id}")]
pub async fn delete_user_role(
    role_service: web::Data<RoleService>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, role_id) = path.into_inner();
    let link = role_service.delete_user_role(user_id, role_id).await?;
    Ok(HttpResponse::Ok().json(link))
}

#[put("/user/{user_id}")]
pub async fn update_user_roles(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
    req: web::Json<UpdateUserRolesRequest>,
) -> Result<HttpResponse, AppError> {
    role_service
        .update_user_roles(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(SUCCESS_USER_ROLES_UPDATED)))
}

#[put("/user-info-role/{user_id}")]
pub async fn update_user_info_and_roles(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
    req: web::Json<EncryptedPayload>,
) -> Result<HttpResponse, AppError> {
    let user = role_service
        .update_user_info_and_roles(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "User info and roles updated successfully",
        "user": user,
    })))
}
