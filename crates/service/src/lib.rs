//! Service layer for the product catalog and the recipe search widget.
//! - Catalog state lives in a `RecordStore` mirrored to one durable slot.
//! - Validation and search are pure functions over raw strings and records.
//! - Recipe search wraps the remote API with its fallback rules.

pub mod errors;
pub mod storage;
pub mod catalog;
pub mod debounce;
pub mod recipes;
