use closet_rental_shared::{
    CreateOrderRequest, CreateOrderWithDetailsRequest, OrderDetailResponse, OrderResponse, OrderSummary,
    UpdateOrderRequest, UpdateOrderStatusRequest, ERROR_ORDER_WRITE_FAILED,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use crate::database::TransactionManager;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::{NewOrder, Order, OrderDetail};
use crate::security::FieldCipher;

pub mod aggregate;

#[cfg(test)]
mod tests;

use aggregate::{fold_order_rows, group_details, resolve_total};

/// Orders, their lines and the encrypted delivery and payment columns.
#[derive(Clone)]
pub struct OrderService {
    db_pool: PgPool,
    transactions: TransactionManager,
    cipher: Arc<FieldCipher>,
}

impl OrderService {
    pub fn new(db_pool: PgPool, transactions: TransactionManager, cipher: Arc<FieldCipher>) -> Self {
        Self {
            db_pool,
            transactions,
            cipher,
        }
    }

    fn not_found() -> AppError {
        AppError::NotFound("Order not found".to_string())
    }

    /// Builds the insert payload, encrypting the sensitive columns.
    fn new_order(&self, request: &CreateOrderRequest, total_price: i32) -> Result<NewOrder, AppError> {
        Ok(NewOrder {
            user_id: request.user_id,
            visit_date: request.visit_date,
            rental_date: request.rental_date,
            visit_date_txt: request.visit_date_txt.clone(),
            rental_date_txt: request.rental_date_txt.clone(),
            total_price,
            status_order: request.status_order.clone(),
            return_date: request.return_date,
            return_condition: request.return_condition.clone(),
            delivery_address: self.cipher.encrypt_optional(request.delivery_address.as_deref())?,
            payment_method: self.cipher.encrypt_optional(request.payment_method.as_deref())?,
        })
    }

    async fn find_visible(&self, caller: &AuthenticatedUser, order_id: i32) -> Result<Order, AppError> {
        let order = Order::find_by_id(&self.db_pool, order_id)
            .await?
            .ok_or_else(Self::not_found)?;
        caller.require_self_or_admin(order.user_id)?;
        Ok(order)
    }

    pub async fn list_orders(&self, caller: &AuthenticatedUser) -> Result<Vec<OrderResponse>, AppError> {
        caller.require_admin()?;
        let orders = Order::find_all(&self.db_pool).await?;
        Ok(orders.iter().map(|o| o.to_response(&self.cipher, None)).collect())
    }

    pub async fn list_orders_by_admin(&self, caller: &AuthenticatedUser) -> Result<Vec<OrderResponse>, AppError> {
        caller.require_admin()?;
        let orders = Order::find_all_newest_first(&self.db_pool).await?;
        Ok(orders.iter().map(|o| o.to_response(&self.cipher, None)).collect())
    }

    pub async fn get_order(&self, caller: &AuthenticatedUser, order_id: i32) -> Result<OrderResponse, AppError> {
        let order = self.find_visible(caller, order_id).await?;
        Ok(order.to_response(&self.cipher, None))
    }

    /// Every order of `user_id` with its lines. Lines are loaded in one query.
    pub async fn get_orders_by_user(
        &self,
        caller: &AuthenticatedUser,
        user_id: i32,
    ) -> Result<Vec<OrderResponse>, AppError> {
        caller.require_self_or_admin(user_id)?;

        let orders = Order::find_by_user(&self.db_pool, user_id).await?;
        if orders.is_empty() {
            return Err(AppError::NotFound(format!("No orders found for user {}", user_id)));
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let details = OrderDetail::find_by_orders(&self.db_pool, &order_ids).await?;
        let grouped = group_details(&order_ids, details);

        Ok(orders
            .iter()
            .zip(grouped)
            .map(|(order, lines)| order.to_response(&self.cipher, Some(lines)))
            .collect())
    }

    /// Creates an order without lines; the caller supplies the total.
    pub async fn create_order(
        &self,
        caller: &AuthenticatedUser,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, AppError> {
        request.validate()?;
        caller.require_self_or_admin(request.user_id)?;

        let total_price = request
            .total_price
            .ok_or_else(|| AppError::Validation("total_price: required".to_string()))?;
        let new_order = self.new_order(&request, total_price)?;

        let order = Order::insert(&self.db_pool, &new_order).await?;
        info!("Created order {} for user {}", order.order_id, order.user_id);
        Ok(order.to_response(&self.cipher, None))
    }

    /// Creates an order and all of its lines atomically. The stored total
    /// is derived from the lines.
    pub async fn create_order_with_details(
        &self,
        caller: &AuthenticatedUser,
        request: CreateOrderWithDetailsRequest,
    ) -> Result<OrderResponse, AppError> {
        request.validate()?;
        request.order.validate()?;
        for line in &request.order_details {
            line.validate()?;
        }
        caller.require_self_or_admin(request.order.user_id)?;

        let total_price = resolve_total(request.order.total_price, &request.order_details)?;
        let new_order = self.new_order(&request.order, total_price)?;
        let lines = request.order_details;
        let line_count = lines.len();

        let (order, details) = self
            .transactions
            .run("create order with details", move |tx| {
                Box::pin(async move {
                    let order = Order::insert(&mut **tx, &new_order).await?;

                    let mut details = Vec::with_capacity(lines.len());
                    for line in &lines {
                        let detail =
                            OrderDetail::insert(&mut **tx, order.order_id, line.item_id, line.quantity, line.price)
                                .await?;
                        details.push(detail);
                    }

                    Ok::<_, AppError>((order, details))
                })
            })
            .await
            .map_err(|e| {
                error!("Order creation rolled back: {}", e);
                AppError::transaction(ERROR_ORDER_WRITE_FAILED, e)
            })?;

        info!(
            "Created order {} with {} lines for user {} (total {})",
            order.order_id, line_count, order.user_id, order.total_price
        );

        let lines = details.iter().map(OrderDetail::to_response).collect();
        Ok(order.to_response(&self.cipher, Some(lines)))
    }

    pub async fn update_order(
        &self,
        caller: &AuthenticatedUser,
        order_id: i32,
        request: UpdateOrderRequest,
    ) -> Result<OrderResponse, AppError> {
        request.validate()?;
        self.find_visible(caller, order_id).await?;

        let order = Order::update_schedule(&self.db_pool, order_id, &request)
            .await?
            .ok_or_else(Self::not_found)?;

        info!("Updated schedule of order {}", order_id);
        Ok(order.to_response(&self.cipher, None))
    }

    pub async fn update_order_status(
        &self,
        caller: &AuthenticatedUser,
        order_id: i32,
        request: UpdateOrderStatusRequest,
    ) -> Result<(), AppError> {
        caller.require_admin()?;
        request.validate()?;

        if !Order::update_status(&self.db_pool, order_id, &request.status_order).await? {
            return Err(Self::not_found());
        }

        info!("Order {} status set to '{}'", order_id, request.status_order);
        Ok(())
    }

    /// Removes an order and its lines in one transaction.
    pub async fn delete_order(&self, caller: &AuthenticatedUser, order_id: i32) -> Result<(), AppError> {
        caller.require_admin()?;

        let deleted = self
            .transactions
            .run("delete order", move |tx| {
                Box::pin(async move {
                    OrderDetail::delete_by_order(&mut **tx, order_id).await?;
                    Order::delete(&mut **tx, order_id).await
                })
            })
            .await?;

        if !deleted {
            return Err(Self::not_found());
        }

        info!("Deleted order {}", order_id);
        Ok(())
    }

    /// Admin overview of every order and its lines.
    pub async fn orders_with_details(&self, caller: &AuthenticatedUser) -> Result<Vec<OrderSummary>, AppError> {
        caller.require_admin()?;
        let rows = Order::find_all_with_detail_rows(&self.db_pool).await?;
        Ok(fold_order_rows(rows))
    }

    pub async fn list_order_details(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<OrderDetailResponse>, AppError> {
        caller.require_admin()?;
        let details = OrderDetail::find_all(&self.db_pool).await?;
        Ok(details.iter().map(OrderDetail::to_response).collect())
    }

    pub async fn get_order_details(
        &self,
        caller: &AuthenticatedUser,
        order_id: i32,
    ) -> Result<Vec<OrderDetailResponse>, AppError> {
        self.find_visible(caller, order_id).await?;

        let details = OrderDetail::find_by_order(&self.db_pool, order_id).await?;
        if details.is_empty() {
            return Err(Self::not_found());
        }
        Ok(details.iter().map(OrderDetail::to_response).collect())
    }
}
