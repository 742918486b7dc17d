#[macro_use]
mod common;

use closet_rental_backend::{
    models::{Order, OrderDetail},
    AppError,
};
use closet_rental_shared::{CreateOrderRequest, CreateOrderWithDetailsRequest, OrderDetailRequest};

fn order_request(user_id: i32) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id,
        visit_date_txt: Some("next friday".to_string()),
        status_order: "pending".to_string(),
        delivery_address: Some("221B Baker Street".to_string()),
        payment_method: Some("card".to_string()),
        ..Default::default()
    }
}

fn line(item_id: i32, quantity: i32, price: i32) -> OrderDetailRequest {
    OrderDetailRequest {
        item_id,
        quantity,
        price,
    }
}

#[tokio::test]
async fn test_create_order_with_details_persists_every_line() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (owner, _) = common::create_user(&pool, "renter").await;
    let (customer, _) = common::create_user(&pool, "user").await;
    let dress = common::create_item(&pool, &owner, 6000).await;
    let jacket = common::create_item(&pool, &owner, 2500).await;

    let request = CreateOrderWithDetailsRequest {
        order: order_request(customer.user_id),
        order_details: vec![line(dress.item_id, 1, 6000), line(jacket.item_id, 2, 2500)],
    };

    let response = services
        .orders
        .create_order_with_details(&common::caller(&customer, &["user"]), request)
        .await
        .expect("order should be created");

    assert_eq!(response.total_price, 11000);
    assert_eq!(response.order_details.as_ref().map(Vec::len), Some(2));

    let stored = Order::find_by_id(&pool, response.order_id).await.unwrap();
    assert!(stored.is_some());

    let details = OrderDetail::find_by_order(&pool, response.order_id).await.unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d.order_id == response.order_id));
}

#[tokio::test]
async fn test_failing_line_rolls_back_the_whole_order() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (owner, _) = common::create_user(&pool, "renter").await;
    let (customer, _) = common::create_user(&pool, "user").await;
    let dress = common::create_item(&pool, &owner, 6000).await;

    // The second line points at an item that does not exist.
    let request = CreateOrderWithDetailsRequest {
        order: order_request(customer.user_id),
        order_details: vec![line(dress.item_id, 1, 6000), line(i32::MAX, 1, 100)],
    };

    let result = services
        .orders
        .create_order_with_details(&common::caller(&customer, &["user"]), request)
        .await;

    assert!(matches!(result, Err(AppError::Transaction { .. })));

    let orders = Order::find_by_user(&pool, customer.user_id).await.unwrap();
    assert!(orders.is_empty(), "order header must not survive the rollback");

    let dangling: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_details WHERE item_id = $1")
        .bind(dress.item_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(dangling, 0, "first line must not survive the rollback");
}

#[tokio::test]
async fn test_sensitive_columns_are_encrypted_at_rest() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (customer, _) = common::create_user(&pool, "user").await;
    let caller = common::caller(&customer, &["user"]);

    let mut request = order_request(customer.user_id);
    request.total_price = Some(4200);
    let created = services.orders.create_order(&caller, request).await.unwrap();

    let raw: Option<String> = sqlx::query_scalar("SELECT delivery_address FROM orders WHERE order_id = $1")
        .bind(created.order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let raw = raw.expect("address should be stored");
    assert_ne!(raw, "221B Baker Street");
    assert!(!raw.contains("Baker"));

    let fetched = services.orders.get_order(&caller, created.order_id).await.unwrap();
    assert_eq!(fetched.delivery_address.as_deref(), Some("221B Baker Street"));
    assert_eq!(fetched.payment_method.as_deref(), Some("card"));
}

#[tokio::test]
async fn test_bare_order_requires_total() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (customer, _) = common::create_user(&pool, "user").await;
    let result = services
        .orders
        .create_order(&common::caller(&customer, &["user"]), order_request(customer.user_id))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_summary_lists_orders_without_details() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (customer, _) = common::create_user(&pool, "user").await;
    let (admin, _) = common::create_user(&pool, "admin").await;

    let mut request = order_request(customer.user_id);
    request.total_price = Some(1000);
    let created = services
        .orders
        .create_order(&common::caller(&customer, &["user"]), request)
        .await
        .unwrap();

    let summary = services
        .orders
        .orders_with_details(&common::caller(&admin, &["admin"]))
        .await
        .unwrap();

    let entry = summary
        .iter()
        .find(|s| s.order_id == created.order_id)
        .expect("detail-less order should be listed");
    assert!(entry.order_details.is_empty());
    assert_eq!(entry.total_price, 1000);
}

#[tokio::test]
async fn test_users_cannot_order_for_someone_else() {
    let pool = require_db!();
    let services = common::services(&pool);

    let (customer, _) = common::create_user(&pool, "user").await;
    let (other, _) = common::create_user(&pool, "user").await;

    let mut request = order_request(other.user_id);
    request.total_price = Some(1000);
    let result = services
        .orders
        .create_order(&common::caller(&customer, &["user"]), request)
        .await;

    assert!(matches!(result, Err(AppError::Authorization(_))));
    assert!(services
        .orders
        .list_orders(&common::caller(&customer, &["user"]))
        .await
        .is_err());
}
