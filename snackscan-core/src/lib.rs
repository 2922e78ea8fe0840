//! # snackscan-core
//!
//! Core library for SnackOverflow food scans.
//!
//! This library provides:
//! - Recovery of a structured scan record from a free-form model reply
//! - "Food Wrap" analytics over a window of stored scans
//! - SQLite storage for scan records
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Data flow
//!
//! - **Raw reply:** text returned by the vision model (untrusted, maybe malformed)
//! - **Structured record:** schema-complete output of [`normalize`]
//! - **Wrap:** aggregate statistics computed on demand by [`analytics::aggregate`]
//!
//! ## Example
//!
//! ```rust
//! use snackscan_core::{FallbackDefaults, ResponseNormalizer};
//!
//! let normalizer = ResponseNormalizer::new(FallbackDefaults::default());
//! let record = normalizer.normalize(r#"Sure! {"fruit_name": "Banana", "freshness_level": 9}"#);
//! assert_eq!(record.subject_name, "Banana");
//! assert_eq!(record.quality_score, 9);
//! assert!(record.raw_fallback.is_none());
//! ```

// Re-export commonly used items at the crate root
pub use config::{Config, FallbackDefaults};
pub use db::{Database, StoredRecord};
pub use error::{Error, Result};
pub use normalize::{normalize, RecoveryTier, ResponseNormalizer};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod normalize;
pub mod types;
