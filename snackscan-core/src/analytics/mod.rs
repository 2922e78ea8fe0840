//! Analytics module for snackscan
//!
//! Provides the Food Wrap: aggregate statistics and insights over a window
//! of stored scans, including
//! - Subject frequency and top subject
//! - Calorie and freshness averages
//! - Purchase recommendation ratio
//! - Peak hour and hourly distribution
//! - Daily streaks
//! - Fruit / vegetable / other mix

pub mod wrap;

pub use crate::config::{CategoryKeywords, WrapConfig};
pub use wrap::{
    aggregate, classify, CategoryCounts, StreakStats, SubjectCount, WindowDescriptor,
    WrapOutcome, WrapSummary, WrapWindow,
};
