//! Type definitions for the churn dashboard

pub mod customer;
pub mod prediction;

pub use customer::CustomerRecord;
pub use prediction::ChurnLabel;
