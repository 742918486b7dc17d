//! Folding of joined order rows and order totals.

use std::collections::HashMap;

use closet_rental_shared::{OrderDetailRequest, OrderDetailResponse, OrderSummary};

use crate::error::AppError;
use crate::models::{OrderDetail, OrderDetailJoinRow};

/// Groups `orders LEFT JOIN order_details` rows into one summary per order,
/// in order of first appearance. Rows need not be sorted. Rows without a
/// detail contribute an order with an empty line list.
pub fn fold_order_rows(rows: Vec<OrderDetailJoinRow>) -> Vec<OrderSummary> {
    let mut summaries: Vec<OrderSummary> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let index = *positions.entry(row.order_id).or_insert_with(|| {
            summaries.push(OrderSummary {
                order_id: row.order_id,
                user_id: row.user_id,
                created_at: row.created_at,
                status_order: row.status_order.clone(),
                total_price: row.total_price,
                order_details: Vec::new(),
            });
            summaries.len() - 1
        });

        if let (Some(order_detail_id), Some(item_id), Some(quantity), Some(price)) =
            (row.order_detail_id, row.item_id, row.quantity, row.price)
        {
            summaries[index].order_details.push(OrderDetailResponse {
                order_detail_id,
                order_id: row.order_id,
                item_id,
                quantity,
                price,
            });
        }
    }

    summaries
}

/// Attaches detail rows to their orders by id, keeping the order sequence.
pub fn group_details(order_ids: &[i32], details: Vec<OrderDetail>) -> Vec<Vec<OrderDetailResponse>> {
    let mut grouped: Vec<Vec<OrderDetailResponse>> = vec![Vec::new(); order_ids.len()];
    for detail in details {
        if let Some(index) = order_ids.iter().position(|id| *id == detail.order_id) {
            grouped[index].push(detail.to_response());
        }
    }
    grouped
}

/// Sum of `price * quantity` over the lines, rejecting overflow.
pub fn compute_total(lines: &[OrderDetailRequest]) -> Result<i32, AppError> {
    lines.iter().try_fold(0i32, |total, line| {
        line.price
            .checked_mul(line.quantity)
            .and_then(|amount| total.checked_add(amount))
            .ok_or_else(|| AppError::Validation("order total is out of range".to_string()))
    })
}

/// The stored total for an order created with lines. A caller-supplied
/// total must agree with the lines.
pub fn resolve_total(claimed: Option<i32>, lines: &[OrderDetailRequest]) -> Result<i32, AppError> {
    let computed = compute_total(lines)?;
    match claimed {
        Some(claimed) if claimed != computed => Err(AppError::Validation(format!(
            "total_price {} does not match the order lines ({})",
            claimed, computed
        ))),
        _ => Ok(computed),
    }
}
