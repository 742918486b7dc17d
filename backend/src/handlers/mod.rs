pub mod auth;
pub mod health;
pub mod items;
pub mod orders;
pub mod roles;
pub mod user_roles;

use actix_web::web;
use closet_rental_shared::RoleName;
use sqlx::PgPool;
use std::sync::Arc;

use crate::middleware::AuthMiddleware;
use crate::utils::jwt::JwtService;

/// Mounts every route. Within a scope, literal paths are registered before
/// the `{id}` patterns they would otherwise be shadowed by.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_service: Arc<JwtService>, pool: PgPool) {
    let authenticated = || AuthMiddleware::new(jwt_service.clone(), pool.clone());

    cfg.service(health::health_check)
        .service(
            web::scope("/users")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(
                    web::scope("")
                        .wrap(authenticated())
                        .service(auth::register_admin)
                        .service(auth::get_users)
                        .service(auth::get_current_user)
                        .service(auth::protected)
                        .service(auth::get_user_info_by_id)
                        .service(auth::update_user)
                        .service(auth::delete_user)
                        .service(auth::update_password),
                ),
        )
        .service(
            web::scope("/items")
                .service(items::list_items)
                .service(items::get_item)
                .service(
                    web::scope("")
                        .wrap(authenticated())
                        .service(items::create_item)
                        .service(items::update_item)
                        .service(items::delete_item),
                ),
        )
        .service(
            web::scope("/orders")
                .wrap(authenticated())
                .service(orders::list_orders_by_admin)
                .service(orders::list_order_details)
                .service(orders::orders_with_details)
                .service(orders::get_order_details)
                .service(orders::get_orders_by_user)
                .service(orders::create_order_with_details)
                .service(orders::update_order_status)
                .service(orders::list_orders)
                .service(orders::create_order)
                .service(orders::get_order)
                .service(orders::update_order)
                .service(orders::delete_order),
        )
        .service(
            web::scope("/roles")
                .wrap(authenticated().require_role(RoleName::Admin))
                .service(roles::get_all_roles)
                .service(roles::create_role)
                .service(roles::get_role_by_id)
                .service(roles::update_role)
                .service(roles::delete_role),
        )
        .service(
            web::scope("/user_roles")
                .wrap(authenticated().require_role(RoleName::Admin))
                .service(user_roles::get_user_roles_by_user_id)
                .service(user_roles::update_user_roles)
                .service(user_roles::update_user_info_and_roles)
                .service(user_roles::create_user_role)
                .service(user_roles::delete_user_role),
        );
}
