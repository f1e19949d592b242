//! # BMT Common Library
//!
//! Shared code for the mod compatibility database tools:
//! - Record and store models
//! - Schema validation against the record schema document
//! - Cross-record integrity checks
//! - Field normalization for loose submission input
//! - The store repository (single writer of the canonical file)
//! - Configuration loading and logging setup

pub mod config;
pub mod error;
pub mod integrity;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod schema;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use models::{CorrectTags, Loader, PlatformIds, Recommendation, Record, Store, Tag};
pub use store::{JsonFileStore, StoreRepository};
