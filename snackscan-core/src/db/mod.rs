//! Database layer for snackscan
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository operations for scan records and wrap windows

pub mod repo;
pub mod schema;

pub use repo::{Database, StoredRecord};
