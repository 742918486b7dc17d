pub mod auth_service;
pub mod item_service;
pub mod order_service;
pub mod role_service;

pub use auth_service::AuthService;
pub use item_service::ItemService;
pub use order_service::OrderService;
pub use role_service::RoleService;

use actix_web::web;
use sqlx::PgPool;
use std::sync::Arc;

use crate::database::TransactionManager;
use crate::security::FieldCipher;
use crate::utils::jwt::JwtService;

/// Every service the handlers extract through `web::Data`.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub items: ItemService,
    pub orders: OrderService,
    pub roles: RoleService,
}

impl Services {
    pub fn new(
        pool: PgPool,
        transactions: TransactionManager,
        jwt_service: Arc<JwtService>,
        cipher: Arc<FieldCipher>,
    ) -> Self {
        Self {
            auth: AuthService::new(pool.clone(), transactions.clone(), jwt_service),
            items: ItemService::new(pool.clone()),
            orders: OrderService::new(pool.clone(), transactions.clone(), cipher.clone()),
            roles: RoleService::new(pool, transactions, cipher),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.items.clone()))
            .app_data(web::Data::new(self.orders.clone()))
            .app_data(web::Data::new(self.roles.clone()));
    }
}
