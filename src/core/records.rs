//! Typed rows for the raw input tables and the joined views built from them
//!
//! Raw records mirror the CSV layouts one-to-one. Nullable cells are `Option`
//! fields; date columns are parsed while deserializing so downstream range
//! filters compare real dates, never strings.

use std::fmt::{self, Display};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::StatusVocabulary;
use crate::temporal::de;

/// The five logical input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Customers,
    Orders,
    OrderItems,
    Fulfillment,
    Returns,
}

impl TableKind {
    /// All tables in load order
    pub const ALL: [TableKind; 5] = [
        TableKind::Customers,
        TableKind::Orders,
        TableKind::OrderItems,
        TableKind::Fulfillment,
        TableKind::Returns,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Customers => "customers",
            TableKind::Orders => "orders",
            TableKind::OrderItems => "order_items",
            TableKind::Fulfillment => "fulfillment",
            TableKind::Returns => "returns",
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Customer {
    pub customer_id: String,
    pub city: Option<String>,
    pub customer_segment: Option<String>,
    #[serde(deserialize_with = "de::optional_datetime")]
    pub signup_date: Option<NaiveDateTime>,
    pub signup_channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    #[serde(deserialize_with = "de::datetime")]
    pub order_date: NaiveDateTime,
    pub order_channel: Option<String>,
    pub order_status: Option<String>,
    pub gross_amount: f64,
    pub discount_amount: Option<f64>,
    /// Trusted as delivered by upstream systems, never recomputed
    pub net_amount: f64,
    pub payment_method: Option<String>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderItem {
    pub order_id: String,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub item_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FulfillmentRecord {
    pub order_id: String,
    pub warehouse_hub: Option<String>,
    pub delivery_zone: Option<String>,
    /// Raw status label; classify with [`FulfillmentRecord::status`]
    pub delivery_status: Option<String>,
    pub delay_reason: Option<String>,
    pub delivery_partner: Option<String>,
    #[serde(deserialize_with = "de::optional_datetime")]
    pub promised_date: Option<NaiveDateTime>,
    #[serde(deserialize_with = "de::optional_datetime")]
    pub actual_delivery_date: Option<NaiveDateTime>,
}

impl FulfillmentRecord {
    /// Classify the raw status label through the configured vocabulary
    pub fn status(&self, vocabulary: &StatusVocabulary) -> Option<DeliveryStatus> {
        self.delivery_status
            .as_deref()
            .map(|label| vocabulary.classify(label))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReturnRecord {
    pub order_id: String,
    #[serde(deserialize_with = "de::optional_datetime")]
    pub return_date: Option<NaiveDateTime>,
    pub refund_amount: Option<f64>,
    pub return_reason: Option<String>,
    pub refund_status: Option<String>,
}

impl ReturnRecord {
    pub fn status(&self) -> Option<RefundStatus> {
        self.refund_status.as_deref().map(RefundStatus::from_label)
    }
}

/// Delivery outcome of a fulfillment record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeliveryStatus {
    OnTime,
    Delayed,
    Failed,
    Pending,
    /// A label outside the configured vocabulary, kept verbatim
    Other(String),
}

impl DeliveryStatus {
    pub fn label(&self) -> &str {
        match self {
            DeliveryStatus::OnTime => "On Time",
            DeliveryStatus::Delayed => "Delayed",
            DeliveryStatus::Failed => "Failed",
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::Other(label) => label,
        }
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DeliveryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Processing state of a refund
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefundStatus {
    Processed,
    Pending,
    Rejected,
    Other(String),
}

impl RefundStatus {
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "processed" => RefundStatus::Processed,
            "pending" => RefundStatus::Pending,
            "rejected" => RefundStatus::Rejected,
            _ => RefundStatus::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RefundStatus::Processed => "Processed",
            RefundStatus::Pending => "Pending",
            RefundStatus::Rejected => "Rejected",
            RefundStatus::Other(label) => label,
        }
    }
}

impl Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fulfillment columns carried into the join
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentProjection {
    pub delivery_status: Option<DeliveryStatus>,
    pub actual_delivery_date: Option<NaiveDateTime>,
    pub warehouse_hub: Option<String>,
    pub delivery_zone: Option<String>,
    pub delay_reason: Option<String>,
}

/// Customer columns carried into the join
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProjection {
    pub city: Option<String>,
    pub customer_segment: Option<String>,
}

/// Returns collapsed to one row per order
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnAggregate {
    pub refund_amount: f64,
    /// First return date in input order
    pub return_date: Option<NaiveDateTime>,
    pub return_count: usize,
}

/// One row of the left-joined tables, before null filling
///
/// `None` on a side means the join found no matching row there.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub order: Order,
    pub item: Option<OrderItem>,
    pub fulfillment: Option<FulfillmentProjection>,
    pub customer: Option<CustomerProjection>,
    pub returns: Option<ReturnAggregate>,
}

/// Fully joined, null-filled row with calendar buckets
///
/// `discount_amount`, `refund_amount` and `delay_reason` are plain values:
/// absent inputs were filled when the row was derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedOrderLine {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: NaiveDateTime,
    pub order_channel: Option<String>,
    pub order_status: Option<String>,
    pub payment_method: Option<String>,
    pub coupon_code: Option<String>,
    pub gross_amount: f64,
    pub discount_amount: f64,
    pub net_amount: f64,

    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub item_total: Option<f64>,

    pub delivery_status: Option<DeliveryStatus>,
    pub actual_delivery_date: Option<NaiveDateTime>,
    pub warehouse_hub: Option<String>,
    pub delivery_zone: Option<String>,
    pub delay_reason: String,

    pub city: Option<String>,
    pub customer_segment: Option<String>,

    pub refund_amount: f64,
    pub return_date: Option<NaiveDateTime>,

    pub day: NaiveDate,
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
    /// `YYYY-MM`
    pub month: String,
}

impl EnrichedOrderLine {
    pub fn is_returned(&self) -> bool {
        self.refund_amount > 0.0
    }
}
