//! Derived fields: null fills and calendar buckets

use crate::core::records::{EnrichedOrderLine, JoinedRow};
use crate::temporal::{month_label, month_start, week_start};

/// Turn joined rows into enriched lines
///
/// `refund_amount` and `discount_amount` default to zero and `delay_reason`
/// to `no_delay`. Buckets come from the row's own `order_date` only.
pub fn derive_lines(rows: Vec<JoinedRow>, no_delay: &str) -> Vec<EnrichedOrderLine> {
    rows.into_iter().map(|row| derive_line(row, no_delay)).collect()
}

/// Derive a single line
pub fn derive_line(row: JoinedRow, no_delay: &str) -> EnrichedOrderLine {
    let JoinedRow {
        order,
        item,
        fulfillment,
        customer,
        returns,
    } = row;

    let day = order.order_date.date();

    let (product_name, product_category, item_total) = match item {
        Some(item) => (item.product_name, item.product_category, item.item_total),
        None => (None, None, None),
    };

    let (delivery_status, actual_delivery_date, warehouse_hub, delivery_zone, delay_reason) =
        match fulfillment {
            Some(f) => (
                f.delivery_status,
                f.actual_delivery_date,
                f.warehouse_hub,
                f.delivery_zone,
                f.delay_reason,
            ),
            None => (None, None, None, None, None),
        };

    let (city, customer_segment) = match customer {
        Some(c) => (c.city, c.customer_segment),
        None => (None, None),
    };

    let (refund_amount, return_date) = match returns {
        Some(r) => (r.refund_amount, r.return_date),
        None => (0.0, None),
    };

    EnrichedOrderLine {
        order_id: order.order_id,
        customer_id: order.customer_id,
        order_date: order.order_date,
        order_channel: order.order_channel,
        order_status: order.order_status,
        payment_method: order.payment_method,
        coupon_code: order.coupon_code,
        gross_amount: order.gross_amount,
        discount_amount: order.discount_amount.unwrap_or(0.0),
        net_amount: order.net_amount,

        product_name,
        product_category,
        item_total,

        delivery_status,
        actual_delivery_date,
        warehouse_hub,
        delivery_zone,
        delay_reason: delay_reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| no_delay.to_string()),

        city,
        customer_segment,

        refund_amount,
        return_date,

        day,
        week_start: week_start(day),
        month_start: month_start(day),
        month: month_label(day),
    }
}
