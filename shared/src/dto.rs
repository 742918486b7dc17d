use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Generic envelopes
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Ciphertext produced by the field cipher, as exchanged with the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(rename = "encryptedData")]
    pub encrypted_data: String,
}

// User DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub lastname: Option<String>,

    /// Requested role name; defaults to `user`.
    #[validate(length(min = 1, max = 50))]
    pub rol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i32,
    pub email: String,
    pub username: String,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub rol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Profile update carried inside an [`EncryptedPayload`]. Absent fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserInfoRoleUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub lastname: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub roles: Option<Vec<i32>>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

// Role DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 50))]
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRoleRequest {
    pub user_id: i32,
    pub role_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRolesRequest {
    pub roles: Vec<i32>,
}

// Item DTOs
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub color: Option<String>,

    /// Minor currency units.
    #[validate(range(min = 0))]
    pub price: i32,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "src")]
    pub image_ref: Option<String>,
    pub is_liked: Option<bool>,
    #[validate(range(min = 1900, max = 2100))]
    pub purchase_year: Option<i32>,
    pub purchase_country: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub renter_name: Option<String>,
    pub renter_lastname: Option<String>,
    #[validate(email)]
    pub renter_email: Option<String>,
    pub availability: Option<String>,
    pub size: Option<String>,
    #[validate(range(min = 0))]
    pub laundry_charge: Option<i32>,
    #[serde(alias = "renters_commision")]
    #[validate(range(min = 0))]
    pub renters_commission: Option<i32>,
    #[validate(range(min = 0))]
    pub safe_deposit: Option<i32>,
    pub independent_designer_dress: Option<bool>,
    /// Owner override, honoured for admins only.
    pub user_id: Option<i32>,
    #[validate(range(min = 0))]
    pub purchase_price_paid_by_renter: Option<i32>,
}

/// Partial item update. Only fields that are present are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i32>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "src")]
    pub image_ref: Option<String>,
    pub is_liked: Option<bool>,
    #[validate(range(min = 1900, max = 2100))]
    pub purchase_year: Option<i32>,
    pub purchase_country: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub renter_name: Option<String>,
    pub renter_lastname: Option<String>,
    #[validate(email)]
    pub renter_email: Option<String>,
    pub availability: Option<String>,
    pub size: Option<String>,
    #[validate(range(min = 0))]
    pub laundry_charge: Option<i32>,
    #[serde(alias = "renters_commision")]
    #[validate(range(min = 0))]
    pub renters_commission: Option<i32>,
    #[validate(range(min = 0))]
    pub safe_deposit: Option<i32>,
    pub independent_designer_dress: Option<bool>,
    #[validate(range(min = 0))]
    pub purchase_price_paid_by_renter: Option<i32>,
}

/// Catalog query string, e.g. `?colors=red,blue&minPrice=55&sort=priceAsc`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub query: Option<String>,
    pub sort: Option<String>,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    pub brands: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub independent_filter: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse<T> {
    pub products: Vec<T>,
    /// Highest price among `products`, in minor units.
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i32>,
}

// Order DTOs
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub visit_date: Option<NaiveDate>,
    pub rental_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub visit_date_txt: Option<String>,
    #[validate(length(max = 100))]
    pub rental_date_txt: Option<String>,
    /// Minor currency units. Required for bare orders; derived from the lines
    /// when the order is created with details.
    #[validate(range(min = 0))]
    pub total_price: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub status_order: String,
    pub return_date: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub return_condition: Option<String>,
    #[validate(length(max = 500))]
    pub delivery_address: Option<String>,
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDetailRequest {
    pub item_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Unit price in minor currency units.
    #[validate(range(min = 0))]
    pub price: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderWithDetailsRequest {
    /// Validated separately, together with each line.
    #[serde(flatten)]
    pub order: CreateOrderRequest,

    #[serde(alias = "orderDetails")]
    #[validate(length(min = 1))]
    pub order_details: Vec<OrderDetailRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub visit_date: Option<NaiveDate>,
    pub rental_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub visit_date_txt: Option<String>,
    #[validate(length(max = 100))]
    pub rental_date_txt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, max = 50))]
    pub status_order: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub order_detail_id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price: i32,
}

/// Order with its sensitive columns already decrypted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_details: Option<Vec<OrderDetailResponse>>,
}

/// Admin overview row: an order and its lines, without sensitive columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub status_order: String,
    pub total_price: i32,
    pub order_details: Vec<OrderDetailResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_with_details_accepts_flat_body() {
        let body = json!({
            "user_id": 7,
            "status_order": "pending",
            "delivery_address": "Calle 1",
            "orderDetails": [
                { "item_id": 1, "quantity": 1, "price": 5000 },
                { "item_id": 2, "quantity": 2, "price": 1500 }
            ]
        });

        let request: CreateOrderWithDetailsRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.order.user_id, 7);
        assert_eq!(request.order.total_price, None);
        assert_eq!(request.order_details.len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn order_without_lines_fails_validation() {
        let request = CreateOrderWithDetailsRequest {
            order: CreateOrderRequest {
                user_id: 1,
                status_order: "pending".to_string(),
                ..Default::default()
            },
            order_details: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_quantity_line_fails_validation() {
        let line = OrderDetailRequest {
            item_id: 1,
            quantity: 0,
            price: 100,
        };
        assert!(line.validate().is_err());
    }

    #[test]
    fn catalog_query_uses_camel_case_names() {
        let query: CatalogQuery = serde_json::from_value(json!({
            "minPrice": 55,
            "maxPrice": 65,
            "independentFilter": true
        }))
        .unwrap();
        assert_eq!(query.min_price, Some(Decimal::from(55)));
        assert_eq!(query.max_price, Some(Decimal::from(65)));
        assert_eq!(query.independent_filter, Some(true));
    }

    #[test]
    fn item_request_accepts_legacy_field_names() {
        let request: CreateItemRequest = serde_json::from_value(json!({
            "name": "Silk dress",
            "price": 6000,
            "src": "dress.jpg",
            "renters_commision": 10
        }))
        .unwrap();
        assert_eq!(request.image_ref.as_deref(), Some("dress.jpg"));
        assert_eq!(request.renters_commission, Some(10));
    }
}
