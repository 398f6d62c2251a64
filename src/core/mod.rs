// Core data structures for souqdash
pub mod error;
pub mod records;

// Re-exports for convenience
pub use error::{Error, Result};
pub use records::{
    Customer, CustomerProjection, DeliveryStatus, EnrichedOrderLine, FulfillmentProjection,
    FulfillmentRecord, JoinedRow, Order, OrderItem, RefundStatus, ReturnAggregate, ReturnRecord,
    TableKind,
};
