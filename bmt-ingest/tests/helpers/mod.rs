//! Test helpers for bmt-ingest integration tests
//!
//! - TestStore: temporary store file seeded with records
//! - MockModrinth: in-process stand-in for the Modrinth project API
//! - StubVerifier: fixed verification answer, records lookups

#![allow(dead_code)]

pub mod mock_modrinth;
pub mod test_store;

pub use mock_modrinth::MockModrinth;
pub use test_store::{issue, record, StubVerifier, TestStore};
