//! # BMT API
//!
//! Read side of the mod compatibility database:
//! - The validation gate (schema + integrity) run in CI and before builds
//! - Derivation of the static API tree from a validated store
//! - Writing the tree under the dist directory

pub mod check;
pub mod derive;
pub mod stats;
pub mod writer;

pub use check::{run_gate, ValidatedStore, ValidationSummary};
pub use derive::{build_api, ApiTree, IndexEntry, ModDocument, PlatformKey, PlatformTree};
pub use stats::Stats;
pub use writer::{write_tree, WriteSummary};
