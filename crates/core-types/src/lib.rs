pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{
    AbcClass, Aggregation, CanonicalField, Dimension, LineMetric, LineStatus, QuadrantCategory,
    Severity, SortOrder,
};
pub use error::CoreError;
pub use structs::{PaymentMovement, SalesLine};
