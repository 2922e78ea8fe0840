//! Core domain types for snackscan
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Raw reply** | Unstructured text returned by the vision model for one photo |
//! | **Structured record** | The schema-complete result of normalizing a raw reply |
//! | **Scan entry** | A stored record plus the time it was persisted (aggregation input) |
//! | **Wrap** | Aggregate statistics over the scan entries of a time window |
//!
//! Field names on [`StructuredRecord`] are the stable contract. The model is
//! prompted with its own key names (`fruit_name`, `freshness_level`, ...);
//! those are accepted as aliases by the normalizer only.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ============================================
// Quality state
// ============================================

/// Freshness state reported for a scanned item.
///
/// Known states are matched case-insensitively. Anything else the model
/// invents is kept verbatim in [`QualityState::Unrecognized`] so downstream
/// code stays exhaustive without losing the original label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QualityState {
    Fresh,
    Ripe,
    #[default]
    Good,
    Overripe,
    Spoiled,
    Unknown,
    Unrecognized(String),
}

impl QualityState {
    pub fn as_str(&self) -> &str {
        match self {
            QualityState::Fresh => "Fresh",
            QualityState::Ripe => "Ripe",
            QualityState::Good => "Good",
            QualityState::Overripe => "Overripe",
            QualityState::Spoiled => "Spoiled",
            QualityState::Unknown => "Unknown",
            QualityState::Unrecognized(label) => label,
        }
    }

    /// Parse a state label. Never fails; unknown labels are preserved.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "fresh" => QualityState::Fresh,
            "ripe" => QualityState::Ripe,
            "good" => QualityState::Good,
            "overripe" | "over-ripe" => QualityState::Overripe,
            "spoiled" | "rotten" => QualityState::Spoiled,
            "unknown" => QualityState::Unknown,
            _ => QualityState::Unrecognized(label.to_string()),
        }
    }

    /// True for any of the built-in states.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, QualityState::Unrecognized(_))
    }
}

impl From<String> for QualityState {
    fn from(label: String) -> Self {
        QualityState::parse(&label)
    }
}

impl From<QualityState> for String {
    fn from(state: QualityState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for QualityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================
// Food category
// ============================================

/// Category label assigned to a subject name during wrap aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Fruit,
    Vegetable,
    Other,
}

impl FoodCategory {
    /// Plural label for display ("Fruits").
    pub fn display_name(&self) -> &'static str {
        match self {
            FoodCategory::Fruit => "Fruits",
            FoodCategory::Vegetable => "Vegetables",
            FoodCategory::Other => "Other",
        }
    }
}

// ============================================
// Structured record
// ============================================

/// A schema-complete scan analysis recovered from one model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    /// Name of the scanned item (never empty)
    pub subject_name: String,
    /// Freshness score, 0-10
    pub quality_score: u8,
    /// Freshness state
    pub quality_state: QualityState,
    /// Color, texture, blemishes
    pub descriptive_notes: String,
    /// Whether the item is worth buying
    pub recommend: bool,
    /// "Eat now", "Wait a few days", ...
    pub usage_guidance: String,
    /// Estimated shelf life at room temperature
    pub shelf_life_days: u32,
    /// Calories per serving
    pub energy_value: u32,
    pub nutrition_notes: String,
    pub benefit_notes: String,
    pub recommendation_text: String,
    pub storage_guidance: String,
    /// Pun or bonus line; only kept when `recommend` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_text: Option<String>,
    /// Original reply, kept only when no JSON object could be recovered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_fallback: Option<String>,
}

impl StructuredRecord {
    /// True if this record was synthesized from defaults.
    pub fn is_fallback(&self) -> bool {
        self.raw_fallback.is_some()
    }
}

// ============================================
// Scan entry (aggregation input)
// ============================================

/// A persisted scan as seen by the wrap aggregator.
///
/// `quality_score` and `energy_value` are optional because stored rows may
/// carry NULL for them; the aggregator excludes missing values from sums and
/// means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// When the scan was persisted, in the local offset it was recorded with
    pub created_at: DateTime<FixedOffset>,
    pub subject_name: String,
    pub quality_score: Option<u8>,
    pub energy_value: Option<u32>,
    pub recommend: bool,
    pub bonus_text: Option<String>,
}

impl ScanEntry {
    /// Build an entry from a normalizer output and its persistence time.
    pub fn from_record(record: &StructuredRecord, created_at: DateTime<FixedOffset>) -> Self {
        Self {
            created_at,
            subject_name: record.subject_name.clone(),
            quality_score: Some(record.quality_score),
            energy_value: Some(record.energy_value),
            recommend: record.recommend,
            bonus_text: record.bonus_text.clone(),
        }
    }
}
