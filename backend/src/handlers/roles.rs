use actix_web::{delete, get, post, put, web, HttpResponse};
use closet_rental_shared::RoleRequest;

use crate::error::AppError;
use crate::services::RoleService;

#[get("")]
pub async fn get_all_roles(role_service: web::Data<RoleService>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(role_service.get_all_roles().await?))
}

#[get("/{role_id}")]
pub async fn get_role_by_id(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(role_service.get_role_by_id(path.into_inner()).await?))
}

#[post("")]
pub async fn create_role(
    role_service: web::Data<RoleService>,
    req: web::Json<RoleRequest>,
) -> Result<HttpResponse, AppError> {
    let role = role_service.create_role(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(role))
}

#[put("/{role_id}")]
pub async fn update_role(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
    req: web::Json<RoleRequest>,
) -> Result<HttpResponse, AppError> {
    let role = role_service
        .update_role(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(role))
}

#[delete("/{role_id}")]
pub async fn delete_role(
    role_service: web::Data<RoleService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(role_service.delete_role(path.into_inner()).await?))
}
