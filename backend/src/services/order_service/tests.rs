use super::aggregate::*;
use crate::error::AppError;
use crate::models::{OrderDetail, OrderDetailJoinRow};
use chrono::{TimeZone, Utc};
use closet_rental_shared::OrderDetailRequest;

fn row(order_id: i32, detail: Option<(i32, i32, i32, i32)>) -> OrderDetailJoinRow {
    OrderDetailJoinRow {
        order_id,
        user_id: 10 + order_id,
        created_at: Utc.with_ymd_and_hms(2024, 3, order_id as u32, 12, 0, 0).unwrap(),
        status_order: "pending".to_string(),
        total_price: 1000 * order_id,
        order_detail_id: detail.map(|d| d.0),
        item_id: detail.map(|d| d.1),
        quantity: detail.map(|d| d.2),
        price: detail.map(|d| d.3),
    }
}

fn line(item_id: i32, quantity: i32, price: i32) -> OrderDetailRequest {
    OrderDetailRequest {
        item_id,
        quantity,
        price,
    }
}

#[test]
fn rows_fold_into_orders_in_first_seen_order() {
    let rows = vec![
        row(1, Some((100, 7, 1, 5000))),
        row(1, Some((101, 8, 2, 1500))),
        row(2, Some((102, 9, 1, 3000))),
    ];

    let summaries = fold_order_rows(rows);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].order_id, 1);
    assert_eq!(summaries[0].user_id, 11);
    assert_eq!(summaries[0].order_details.len(), 2);
    assert_eq!(summaries[0].order_details[1].item_id, 8);
    assert_eq!(summaries[1].order_details[0].order_detail_id, 102);
}

#[test]
fn orders_without_lines_are_kept() {
    let summaries = fold_order_rows(vec![
        row(1, None),
        row(2, Some((200, 3, 1, 900))),
        row(3, None),
    ]);

    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].order_details.is_empty());
    assert_eq!(summaries[1].order_details.len(), 1);
    assert!(summaries[2].order_details.is_empty());
}

#[test]
fn interleaved_rows_still_give_one_summary_per_order() {
    let summaries = fold_order_rows(vec![
        row(1, Some((100, 7, 1, 5000))),
        row(2, None),
        row(1, Some((101, 8, 2, 1500))),
    ]);

    let ids: Vec<i32> = summaries.iter().map(|s| s.order_id).collect();
    assert_eq!(ids, vec![1, 2]);
    let detail_ids: Vec<i32> = summaries[0].order_details.iter().map(|d| d.order_detail_id).collect();
    assert_eq!(detail_ids, vec![100, 101]);
    assert!(summaries[1].order_details.is_empty());
}

#[test]
fn empty_input_folds_to_nothing() {
    assert!(fold_order_rows(Vec::new()).is_empty());
}

#[test]
fn details_are_grouped_per_order() {
    let details = vec![
        OrderDetail { order_detail_id: 1, order_id: 5, item_id: 1, quantity: 1, price: 100 },
        OrderDetail { order_detail_id: 2, order_id: 4, item_id: 2, quantity: 1, price: 200 },
        OrderDetail { order_detail_id: 3, order_id: 5, item_id: 3, quantity: 2, price: 300 },
    ];

    let grouped = group_details(&[4, 5, 6], details);
    assert_eq!(grouped[0].len(), 1);
    assert_eq!(grouped[1].iter().map(|d| d.order_detail_id).collect::<Vec<_>>(), vec![1, 3]);
    assert!(grouped[2].is_empty());
}

#[test]
fn total_is_price_times_quantity() {
    let lines = vec![line(1, 1, 5000), line(2, 3, 1500)];
    assert_eq!(compute_total(&lines).unwrap(), 9500);
    assert_eq!(resolve_total(None, &lines).unwrap(), 9500);
    assert_eq!(resolve_total(Some(9500), &lines).unwrap(), 9500);
}

#[test]
fn mismatched_total_is_rejected() {
    let lines = vec![line(1, 2, 1000)];
    assert!(matches!(resolve_total(Some(1000), &lines), Err(AppError::Validation(_))));
}

#[test]
fn overflowing_total_is_rejected() {
    let lines = vec![line(1, 2, i32::MAX)];
    assert!(compute_total(&lines).is_err());
}
