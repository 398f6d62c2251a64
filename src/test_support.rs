//! Line builders shared by unit tests

use chrono::NaiveDate;

use crate::core::records::{EnrichedOrderLine, JoinedRow, Order};
use crate::dataframe::derive_line;

/// A bare line for `order_id` placed on `date` (`YYYY-MM-DD`)
pub fn line(order_id: &str, date: &str) -> EnrichedOrderLine {
    let order_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    derive_line(
        JoinedRow {
            order: Order {
                order_id: order_id.to_string(),
                customer_id: format!("C-{}", order_id),
                order_date,
                order_channel: None,
                order_status: None,
                gross_amount: 0.0,
                discount_amount: None,
                net_amount: 0.0,
                payment_method: None,
                coupon_code: None,
            },
            item: None,
            fulfillment: None,
            customer: None,
            returns: None,
        },
        "No Delay",
    )
}
