//! Join engine: combines the five raw tables into one row per order line
//!
//! Every step is a left join driven by the orders table, so no order is
//! ever lost. Join keys are not deduplicated: duplicate keys on the right
//! side fan rows out multiplicatively, exactly like a relational left join.

use std::collections::{HashMap, HashSet};

use crate::config::StatusVocabulary;
use crate::core::records::{
    Customer, CustomerProjection, FulfillmentProjection, FulfillmentRecord, JoinedRow,
    ReturnAggregate, ReturnRecord,
};
use crate::io::RawTables;

/// Bookkeeping produced alongside the joined rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Joined row count
    pub rows: usize,
    /// Orders that had no item rows
    pub orders_without_items: usize,
    /// Orders with no fulfillment row
    pub orders_without_fulfillment: usize,
    /// Orders whose customer is unknown
    pub orders_without_customer: usize,
    /// Item rows referring to an order that does not exist; a left join
    /// driven by orders cannot carry them
    pub orphan_items: usize,
    /// Orders with more than one return row, collapsed into one aggregate
    pub orders_with_repeat_returns: usize,
}

/// Build the key -> row indices mapping for one side of a join
fn index_by<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, Vec<usize>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        index.entry(key(row)).or_default().push(i);
    }
    index
}

/// Matching right rows for a key, or a single `None` when there are none
fn matches_or_none<'a, T>(index: &HashMap<&str, Vec<usize>>, key: &str, rows: &'a [T]) -> Vec<Option<&'a T>> {
    match index.get(key) {
        Some(indices) => indices.iter().map(|&i| Some(&rows[i])).collect(),
        None => vec![None],
    }
}

/// Collapse returns to one aggregate per order
///
/// Refunds are summed (empty amounts count as zero). The return date is the
/// first non-empty one in input order.
pub fn aggregate_returns(returns: &[ReturnRecord]) -> HashMap<&str, ReturnAggregate> {
    let mut aggregates: HashMap<&str, ReturnAggregate> = HashMap::new();

    for record in returns {
        let aggregate = aggregates
            .entry(record.order_id.as_str())
            .or_insert(ReturnAggregate {
                refund_amount: 0.0,
                return_date: None,
                return_count: 0,
            });

        aggregate.refund_amount += record.refund_amount.unwrap_or(0.0);
        aggregate.return_count += 1;
        if aggregate.return_date.is_none() {
            aggregate.return_date = record.return_date;
        }
    }

    aggregates
}

fn project_fulfillment(record: &FulfillmentRecord, vocabulary: &StatusVocabulary) -> FulfillmentProjection {
    FulfillmentProjection {
        delivery_status: record.status(vocabulary),
        actual_delivery_date: record.actual_delivery_date,
        warehouse_hub: record.warehouse_hub.clone(),
        delivery_zone: record.delivery_zone.clone(),
        delay_reason: record.delay_reason.clone(),
    }
}

fn project_customer(customer: &Customer) -> CustomerProjection {
    CustomerProjection {
        city: customer.city.clone(),
        customer_segment: customer.customer_segment.clone(),
    }
}

/// Left-join orders with items, fulfillment, customers and aggregated returns
///
/// Output order follows the orders table; within an order, items, then
/// fulfillment rows, then customer rows keep their input order.
pub fn join_tables(tables: &RawTables, vocabulary: &StatusVocabulary) -> (Vec<JoinedRow>, JoinReport) {
    let items_by_order = index_by(&tables.order_items, |item| item.order_id.as_str());
    let fulfillment_by_order = index_by(&tables.fulfillment, |f| f.order_id.as_str());
    let customers_by_id = index_by(&tables.customers, |c| c.customer_id.as_str());
    let returns_by_order = aggregate_returns(&tables.returns);

    let mut report = JoinReport::default();
    let mut rows = Vec::with_capacity(tables.order_items.len().max(tables.orders.len()));

    for order in &tables.orders {
        let order_id = order.order_id.as_str();

        let items = matches_or_none(&items_by_order, order_id, &tables.order_items);
        let fulfillments = matches_or_none(&fulfillment_by_order, order_id, &tables.fulfillment);
        let customers = matches_or_none(&customers_by_id, order.customer_id.as_str(), &tables.customers);
        let returns = returns_by_order.get(order_id);

        if items[0].is_none() {
            report.orders_without_items += 1;
        }
        if fulfillments[0].is_none() {
            report.orders_without_fulfillment += 1;
        }
        if customers[0].is_none() {
            report.orders_without_customer += 1;
        }

        for item in &items {
            for fulfillment in &fulfillments {
                for customer in &customers {
                    rows.push(JoinedRow {
                        order: order.clone(),
                        item: item.cloned(),
                        fulfillment: fulfillment.map(|f| project_fulfillment(f, vocabulary)),
                        customer: customer.map(project_customer),
                        returns: returns.cloned(),
                    });
                }
            }
        }
    }

    let known_orders: HashSet<&str> = tables.orders.iter().map(|o| o.order_id.as_str()).collect();
    report.orphan_items = tables
        .order_items
        .iter()
        .filter(|item| !known_orders.contains(item.order_id.as_str()))
        .count();
    report.orders_with_repeat_returns = returns_by_order
        .values()
        .filter(|aggregate| aggregate.return_count > 1)
        .count();
    report.rows = rows.len();

    if report.orphan_items > 0 {
        log::warn!(
            "{} order item rows reference unknown orders and are not part of the joined view",
            report.orphan_items
        );
    }
    log::debug!("join produced {} rows: {:?}", rows.len(), report);

    (rows, report)
}
