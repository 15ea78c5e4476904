//! Metric extraction, one module per audited category.
//!
//! Extractors are pure functions of the records the gateway returned. Fetching
//! and failure handling live in [`crate::audit::engine`].

pub mod admin;
pub mod forms;
pub mod properties;
pub mod reporting;
pub mod sales;
pub mod workflows;
