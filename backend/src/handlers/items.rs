use actix_web::{delete, get, post, put, web, HttpResponse};
use closet_rental_shared::{CatalogQuery, CreateItemRequest, ItemPatch, MessageResponse, SUCCESS_ITEM_DELETED};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::ItemService;

/// Catalog listing, e.g. `/items?colors=red,blue&minPrice=50&sort=priceAsc`.
#[get("")]
pub async fn list_items(
    item_service: web::Data<ItemService>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
    let catalog = item_service.catalog(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(catalog))
}

#[get("/{item_id}")]
pub async fn get_item(
    item_service: web::Data<ItemService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let item = item_service.get_item(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[post("")]
pub async fn create_item(
    item_service: web::Data<ItemService>,
    user: AuthenticatedUser,
    req: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item = item_service.create_item(&user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

#[put("/{item_id}")]
pub async fn update_item(
    item_service: web::Data<ItemService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<ItemPatch>,
) -> Result<HttpResponse, AppError> {
    let item = item_service
        .update_item(&user, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

#[delete("/{item_id}")]
pub async fn delete_item(
    item_service: web::Data<ItemService>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    item_service.delete_item(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(SUCCESS_ITEM_DELETED)))
}
