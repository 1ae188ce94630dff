//! Churn classifier loading and inference

pub mod inference;
pub mod loader;
pub mod schema;

pub use inference::{ChurnClassifier, ChurnModel};
pub use loader::ModelLoader;
pub use schema::FeatureSchema;
