use actix_web::{delete, get, post, put, web, HttpResponse};
use closet_rental_shared::{
    CreateOrderRequest, CreateOrderWithDetailsRequest, MessageResponse, UpdateOrderRequest, UpdateOrderStatusRequest,
    SUCCESS_ORDER_DELETED, SUCCESS_ORDER_STATUS_UPDATED,
};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::OrderService;

#[get("")]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let orders = order_service.list_orders(&user).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[get("/admin")]
pub async fn list_orders_by_admin(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let orders = order_service.list_orders_by_admin(&user).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Every order grouped with its lines.
#[get("/details")]
pub async fn orders_with_details(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summaries = order_service.orders_with_details(&user).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/details/rows")]
pub async fn list_order_details(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let details = order_service.list_order_details(&user).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[get("/details/{order_id}")]
pub async fn get_order_details(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let details = order_service.get_order_details(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[get("/user/{user_id}")]
pub async fn get_orders_by_user(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let orders = order_service.get_orders_by_user(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[post("/with-details")]
pub async fn create_order_with_details(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    req: web::Json<CreateOrderWithDetailsRequest>,
) -> Result<HttpResponse, AppError> {
    let order = order_service
        .create_order_with_details(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(order))
}

#[put("/status/{order_id}")]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    order_service
        .update_order_status(&user, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(SUCCESS_ORDER_STATUS_UPDATED)))
}

#[get("/{order_id}")]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order = order_service.get_order(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[post("")]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    req: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = order_service.create_order(&user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

#[put("/{order_id}")]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = order_service
        .update_order(&user, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

#[delete("/{order_id}")]
pub async fn delete_order(
    order_service: web::Data<OrderService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    order_service.delete_order(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(SUCCESS_ORDER_DELETED)))
}
