use chrono::{DateTime, NaiveDate, Utc};
use closet_rental_shared::{OrderDetailResponse, OrderResponse, UpdateOrderRequest};
use sqlx::{FromRow, PgExecutor};

use crate::error::AppError;
use crate::security::FieldCipher;

/// Stored order. `delivery_address` and `payment_method` hold ciphertext.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub visit_date: Option<NaiveDate>,
    pub rental_date: Option<NaiveDate>,
    pub visit_date_txt: Option<String>,
    pub rental_date_txt: Option<String>,
    pub total_price: i32,
    pub status_order: String,
    pub return_date: Option<NaiveDate>,
    pub return_condition: Option<String>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; sensitive columns must already be encrypted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i32,
    pub visit_date: Option<NaiveDate>,
    pub rental_date: Option<NaiveDate>,
    pub visit_date_txt: Option<String>,
    pub rental_date_txt: Option<String>,
    pub total_price: i32,
    pub status_order: String,
    pub return_date: Option<NaiveDate>,
    pub return_condition: Option<String>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OrderDetail {
    pub order_detail_id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price: i32,
}

/// One row of `orders LEFT JOIN order_details`; detail columns are null for
/// orders without lines.
#[derive(Debug, Clone, FromRow)]
pub struct OrderDetailJoinRow {
    pub order_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub status_order: String,
    pub total_price: i32,
    pub order_detail_id: Option<i32>,
    pub item_id: Option<i32>,
    pub quantity: Option<i32>,
    pub price: Option<i32>,
}

impl Order {
    pub async fn insert<'e, E>(executor: E, order: &NewOrder) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                user_id, visit_date, rental_date, visit_date_txt, rental_date_txt, total_price,
                status_order, return_date, return_condition, delivery_address, payment_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(order.user_id)
        .bind(order.visit_date)
        .bind(order.rental_date)
        .bind(&order.visit_date_txt)
        .bind(&order.rental_date_txt)
        .bind(order.total_price)
        .bind(&order.status_order)
        .bind(order.return_date)
        .bind(&order.return_condition)
        .bind(&order.delivery_address)
        .bind(&order.payment_method)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn find_by_id<'e, E>(executor: E, order_id: i32) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY order_id")
            .fetch_all(executor)
            .await?;

        Ok(orders)
    }

    pub async fn find_all_newest_first<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders ORDER BY created_at DESC, order_id DESC",
        )
        .fetch_all(executor)
        .await?;

        Ok(orders)
    }

    pub async fn find_by_user<'e, E>(executor: E, user_id: i32) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY order_id",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(orders)
    }

    /// Overwrites the visit and rental schedule.
    pub async fn update_schedule<'e, E>(
        executor: E,
        order_id: i32,
        request: &UpdateOrderRequest,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET visit_date = $1, rental_date = $2, visit_date_txt = $3, rental_date_txt = $4
            WHERE order_id = $5
            RETURNING *
            "#,
        )
        .bind(request.visit_date)
        .bind(request.rental_date)
        .bind(&request.visit_date_txt)
        .bind(&request.rental_date_txt)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    pub async fn update_status<'e, E>(
        executor: E,
        order_id: i32,
        status_order: &str,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE orders SET status_order = $1 WHERE order_id = $2")
            .bind(status_order)
            .bind(order_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete<'e, E>(executor: E, order_id: i32) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every order with its lines, flattened, ordered by order then line.
    pub async fn find_all_with_detail_rows<'e, E>(executor: E) -> Result<Vec<OrderDetailJoinRow>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, OrderDetailJoinRow>(
            r#"
            SELECT o.order_id, o.user_id, o.created_at, o.status_order, o.total_price,
                   d.order_detail_id, d.item_id, d.quantity, d.price
            FROM orders o
            LEFT JOIN order_details d ON d.order_id = o.order_id
            ORDER BY o.order_id, d.order_detail_id
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    pub fn to_response(
        &self,
        cipher: &FieldCipher,
        order_details: Option<Vec<OrderDetailResponse>>,
    ) -> OrderResponse {
        OrderResponse {
            order_id: self.order_id,
            user_id: self.user_id,
            visit_date: self.visit_date,
            rental_date: self.rental_date,
            visit_date_txt: self.visit_date_txt.clone(),
            rental_date_txt: self.rental_date_txt.clone(),
            total_price: self.total_price,
            status_order: self.status_order.clone(),
            return_date: self.return_date,
            return_condition: self.return_condition.clone(),
            delivery_address: cipher.decrypt_optional(self.delivery_address.as_deref(), "delivery_address"),
            payment_method: cipher.decrypt_optional(self.payment_method.as_deref(), "payment_method"),
            created_at: self.created_at,
            order_details,
        }
    }
}

impl OrderDetail {
    pub async fn insert<'e, E>(
        executor: E,
        order_id: i32,
        item_id: i32,
        quantity: i32,
        price: i32,
    ) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let detail = sqlx::query_as::<_, OrderDetail>(
            r#"
            INSERT INTO order_details (order_id, item_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(item_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(executor)
        .await?;

        Ok(detail)
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let details = sqlx::query_as::<_, OrderDetail>(
            "SELECT * FROM order_details ORDER BY order_id, order_detail_id",
        )
        .fetch_all(executor)
        .await?;

        Ok(details)
    }

    pub async fn find_by_order<'e, E>(executor: E, order_id: i32) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let details = sqlx::query_as::<_, OrderDetail>(
            "SELECT * FROM order_details WHERE order_id = $1 ORDER BY order_detail_id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(details)
    }

    /// Lines of several orders in one query.
    pub async fn find_by_orders<'e, E>(executor: E, order_ids: &[i32]) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let details = sqlx::query_as::<_, OrderDetail>(
            "SELECT * FROM order_details WHERE order_id = ANY($1) ORDER BY order_id, order_detail_id",
        )
        .bind(order_ids)
        .fetch_all(executor)
        .await?;

        Ok(details)
    }

    pub async fn delete_by_order<'e, E>(executor: E, order_id: i32) -> Result<u64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub fn to_response(&self) -> OrderDetailResponse {
        OrderDetailResponse {
            order_detail_id: self.order_detail_id,
            order_id: self.order_id,
            item_id: self.item_id,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_order(cipher: &FieldCipher) -> Order {
        Order {
            order_id: 1,
            user_id: 2,
            visit_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            rental_date: None,
            visit_date_txt: Some("1 May".to_string()),
            rental_date_txt: None,
            total_price: 9000,
            status_order: "pending".to_string(),
            return_date: None,
            return_condition: None,
            delivery_address: Some(cipher.encrypt("Av. Siempre Viva 742").unwrap()),
            payment_method: Some("corrupted".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn response_decrypts_sensitive_columns() {
        let cipher = FieldCipher::new("order-model-secret").unwrap();
        let response = stored_order(&cipher).to_response(&cipher, None);

        assert_eq!(response.delivery_address.as_deref(), Some("Av. Siempre Viva 742"));
        assert_eq!(response.payment_method, None);
        assert_eq!(response.total_price, 9000);
        assert!(response.order_details.is_none());
    }
}
