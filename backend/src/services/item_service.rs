use closet_rental_shared::{CatalogQuery, CatalogResponse, CreateItemRequest, ItemPatch, ERROR_ITEM_HAS_ORDERS};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::Item;

pub mod catalog;

#[cfg(test)]
mod tests;

pub use catalog::{apply_filters, CatalogFilter};

/// Item listing, catalog browsing and owner-scoped item edits.
#[derive(Clone)]
pub struct ItemService {
    db_pool: PgPool,
}

impl ItemService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Loads every item with its owner's role and runs the catalog filters.
    pub async fn catalog(&self, query: CatalogQuery) -> Result<CatalogResponse<Item>, AppError> {
        let filter = CatalogFilter::from(query);
        let items = Item::find_all_with_owner_role(&self.db_pool).await?;
        let products = apply_filters(items, &filter);

        Ok(CatalogResponse {
            max_price: catalog::max_price(&products),
            products,
        })
    }

    pub async fn get_item(&self, item_id: i32) -> Result<Item, AppError> {
        Item::find_by_id(&self.db_pool, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    /// Creates an item owned by the caller. Admins may list on behalf of
    /// another user through `user_id`.
    pub async fn create_item(
        &self,
        caller: &AuthenticatedUser,
        request: CreateItemRequest,
    ) -> Result<Item, AppError> {
        request.validate()?;

        let owner_id = match request.user_id {
            Some(user_id) if user_id != caller.user_id => {
                caller.require_admin()?;
                user_id
            }
            _ => caller.user_id,
        };

        let item = Item::create(&self.db_pool, owner_id, &request).await?;
        info!("Created item {} for user {} - name: '{}'", item.item_id, owner_id, item.name);
        Ok(item)
    }

    pub async fn update_item(
        &self,
        caller: &AuthenticatedUser,
        item_id: i32,
        patch: ItemPatch,
    ) -> Result<Item, AppError> {
        patch.validate()?;

        let existing = self.get_item(item_id).await?;
        caller.require_self_or_admin(existing.user_id)?;

        let item = Item::update(&self.db_pool, item_id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        info!("Updated item {} by user {}", item_id, caller.user_id);
        Ok(item)
    }

    /// Deletes an item unless it appears on an order.
    pub async fn delete_item(&self, caller: &AuthenticatedUser, item_id: i32) -> Result<(), AppError> {
        let existing = self.get_item(item_id).await?;
        caller.require_self_or_admin(existing.user_id)?;

        if Item::has_order_history(&self.db_pool, item_id).await? {
            warn!("Refusing to delete item {} with order history", item_id);
            return Err(AppError::Conflict(ERROR_ITEM_HAS_ORDERS.to_string()));
        }

        if !Item::delete(&self.db_pool, item_id).await? {
            return Err(AppError::NotFound("Item not found, unable to delete".to_string()));
        }

        info!("Deleted item {} by user {}", item_id, caller.user_id);
        Ok(())
    }
}
