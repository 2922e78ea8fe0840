//! Model reply normalization.
//!
//! Turns the free-form text returned by the vision model into a
//! schema-complete [`StructuredRecord`]. The model is asked for strict JSON
//! but routinely wraps it in prose or code fences, truncates it, or answers
//! in plain text. Recovery is tiered and never fails:
//!
//! 1. **Whole match**: the trimmed reply is itself a `{...}` object.
//! 2. **Extraction**: the span from the first `{` to the last `}`.
//! 3. **Fallback**: a record built from [`FallbackDefaults`], with the
//!    original reply kept in `raw_fallback`.
//!
//! A recovered object is then read field by field. Missing or mistyped
//! fields take the configured default, so the result is always complete.
//!
//! A serialized [`StructuredRecord`] normalizes back to itself. Input that
//! is not in that canonical form is not preserved byte for byte: known
//! quality states are matched case-insensitively and come back in their
//! canonical spelling (`"fresh"` becomes `"Fresh"`), while unknown labels
//! are kept verbatim. A blank `bonus_text` is dropped.

use crate::config::FallbackDefaults;
use crate::types::{QualityState, StructuredRecord};
use serde_json::{Map, Value};

const SUBJECT_KEYS: &[&str] = &["subject_name", "fruit_name"];
const QUALITY_SCORE_KEYS: &[&str] = &["quality_score", "freshness_level"];
const QUALITY_STATE_KEYS: &[&str] = &["quality_state", "freshness_state"];
const DESCRIPTIVE_KEYS: &[&str] = &["descriptive_notes", "visual_indicators"];
const RECOMMEND_KEYS: &[&str] = &["recommend", "should_buy"];
const USAGE_KEYS: &[&str] = &["usage_guidance", "best_use"];
const SHELF_LIFE_KEYS: &[&str] = &["shelf_life_days"];
const ENERGY_KEYS: &[&str] = &["energy_value", "calories"];
const NUTRITION_KEYS: &[&str] = &["nutrition_notes", "nutrition_highlights"];
const BENEFIT_KEYS: &[&str] = &["benefit_notes", "health_benefits"];
const RECOMMENDATION_KEYS: &[&str] = &["recommendation_text", "purchase_recommendation"];
const STORAGE_KEYS: &[&str] = &["storage_guidance", "storage_method"];
const BONUS_KEYS: &[&str] = &["bonus_text", "food_pun"];

/// Which recovery tier produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryTier {
    /// The whole trimmed reply parsed as a JSON object
    WholeMatch,
    /// A `{...}` span inside the reply parsed as a JSON object
    Extracted,
    /// Nothing parsed; the record is synthesized from defaults
    Fallback,
}

impl RecoveryTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryTier::WholeMatch => "whole_match",
            RecoveryTier::Extracted => "extracted",
            RecoveryTier::Fallback => "fallback",
        }
    }
}

/// Normalizer bound to one fallback policy.
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    defaults: FallbackDefaults,
}

impl ResponseNormalizer {
    pub fn new(defaults: FallbackDefaults) -> Self {
        Self { defaults }
    }

    /// Normalize a raw model reply into a complete record.
    pub fn normalize(&self, raw_reply: &str) -> StructuredRecord {
        self.normalize_with_tier(raw_reply).0
    }

    /// Normalize a raw model reply, also reporting which tier succeeded.
    pub fn normalize_with_tier(&self, raw_reply: &str) -> (StructuredRecord, RecoveryTier) {
        match recover_object(raw_reply) {
            Some((object, tier)) => {
                tracing::debug!(
                    tier = tier.as_str(),
                    keys = object.len(),
                    "Recovered JSON object from model reply"
                );
                (self.record_from_object(&object), tier)
            }
            None => {
                tracing::warn!(
                    reply_len = raw_reply.len(),
                    "No JSON object recovered from model reply, using fallback defaults"
                );
                let mut record = self.defaults.to_record();
                record.raw_fallback = Some(raw_reply.to_string());
                (record, RecoveryTier::Fallback)
            }
        }
    }

    fn record_from_object(&self, object: &Map<String, Value>) -> StructuredRecord {
        let fields = FieldReader { object };
        let defaults = &self.defaults;

        let subject_name = fields
            .text(SUBJECT_KEYS)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| defaults.subject_name.clone());

        let quality_score = fields
            .number(QUALITY_SCORE_KEYS)
            .map(|score| score.clamp(0, 10) as u8)
            .unwrap_or(defaults.quality_score);

        let quality_state = fields
            .text(QUALITY_STATE_KEYS)
            .filter(|state| !state.trim().is_empty())
            .map(|state| QualityState::parse(&state))
            .unwrap_or_else(|| defaults.quality_state.clone());
        if !quality_state.is_recognized() {
            tracing::debug!(state = %quality_state, "Keeping unrecognized quality state");
        }

        let recommend = fields
            .boolean(RECOMMEND_KEYS)
            .unwrap_or(defaults.recommend);

        // Bonus lines only accompany a positive recommendation
        let bonus_text = fields
            .text(BONUS_KEYS)
            .filter(|text| !text.trim().is_empty())
            .filter(|_| recommend);

        StructuredRecord {
            subject_name,
            quality_score,
            quality_state,
            descriptive_notes: fields
                .text(DESCRIPTIVE_KEYS)
                .unwrap_or_else(|| defaults.descriptive_notes.clone()),
            recommend,
            usage_guidance: fields
                .text(USAGE_KEYS)
                .unwrap_or_else(|| defaults.usage_guidance.clone()),
            shelf_life_days: fields
                .non_negative(SHELF_LIFE_KEYS)
                .unwrap_or(defaults.shelf_life_days),
            energy_value: fields
                .non_negative(ENERGY_KEYS)
                .unwrap_or(defaults.energy_value),
            nutrition_notes: fields
                .text(NUTRITION_KEYS)
                .unwrap_or_else(|| defaults.nutrition_notes.clone()),
            benefit_notes: fields
                .text(BENEFIT_KEYS)
                .unwrap_or_else(|| defaults.benefit_notes.clone()),
            recommendation_text: fields
                .text(RECOMMENDATION_KEYS)
                .unwrap_or_else(|| defaults.recommendation_text.clone()),
            storage_guidance: fields
                .text(STORAGE_KEYS)
                .unwrap_or_else(|| defaults.storage_guidance.clone()),
            bonus_text,
            raw_fallback: None,
        }
    }
}

/// Normalize a raw model reply with the given fallback policy.
pub fn normalize(raw_reply: &str, defaults: &FallbackDefaults) -> StructuredRecord {
    ResponseNormalizer::new(defaults.clone()).normalize(raw_reply)
}

/// Run tiers 1 and 2. Returns `None` when the fallback tier must be used.
fn recover_object(raw: &str) -> Option<(Map<String, Value>, RecoveryTier)> {
    let trimmed = raw.trim();
    let (candidate, tier) = if trimmed.starts_with('{') && trimmed.ends_with('}') {
        (trimmed, RecoveryTier::WholeMatch)
    } else {
        (extract_json_object(trimmed)?, RecoveryTier::Extracted)
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some((object, tier)),
        Ok(other) => {
            tracing::debug!(tier = tier.as_str(), kind = ?other, "Parsed reply is not a JSON object");
            None
        }
        Err(e) => {
            tracing::debug!(tier = tier.as_str(), error = %e, "Model reply JSON failed to parse");
            None
        }
    }
}

/// The span from the first `{` to the last `}`, inclusive.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Lenient typed access to a recovered JSON object.
///
/// Each accessor takes the contract key followed by its upstream aliases and
/// returns the first non-null value that can be coerced to the wanted type.
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    fn value(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.object.get(*key))
            .find(|value| !value.is_null())
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        match self.value(keys)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn number(&self, keys: &[&str]) -> Option<i64> {
        let value = match self.value(keys)? {
            Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64())?,
            Value::String(s) => leading_number(s)?,
            _ => return None,
        };
        if !value.is_finite() {
            return None;
        }
        Some(value.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    }

    fn non_negative(&self, keys: &[&str]) -> Option<u32> {
        let value = self.number(keys)?;
        if value < 0 {
            return None;
        }
        Some(value.min(u32::MAX as i64) as u32)
    }

    fn boolean(&self, keys: &[&str]) -> Option<bool> {
        match self.value(keys)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "buy" | "1" => Some(true),
                "false" | "no" | "n" | "skip" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Parse the numeric prefix of a string such as `"95 kcal"` or `"8/10"`.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<f64>().ok()
}
