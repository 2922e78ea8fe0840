//! Food Wrap - scan history in review
//!
//! Generates "Spotify Wrapped"-style summaries over a window of stored scans:
//! what was scanned most, how often, at what time of day, and for how many
//! days in a row.
//!
//! Aggregation is a single read-only pass over the caller's entries. The
//! reference "now" is always the window end supplied by the caller; nothing
//! here reads the wall clock.

use crate::config::{CategoryKeywords, WrapConfig};
use crate::error::{Error, Result};
use crate::types::{FoodCategory, ScanEntry};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Time window a wrap covers, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl WrapWindow {
    /// Create a window, rejecting inverted bounds.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidWindow(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `now`.
    pub fn last_days(now: DateTime<FixedOffset>, days: u32) -> Result<Self> {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                Error::InvalidWindow(format!("{} days before {} is out of range", days, now))
            })?;
        Self::new(start, now)
    }

    /// Whether `ts` falls inside the window.
    pub fn contains(&self, ts: &DateTime<FixedOffset>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    /// Whole days spanned by the window.
    pub fn period_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Calendar dates touched by the window, counting both end dates.
    pub fn calendar_days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days() + 1
    }

    /// Describe this window for a given number of records.
    pub fn descriptor(&self, record_count: usize) -> WindowDescriptor {
        WindowDescriptor {
            start_date: self.start.date_naive(),
            end_date: self.end.date_naive(),
            period_days: self.period_days(),
            record_count,
        }
    }
}

/// Window metadata carried by every wrap result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowDescriptor {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_days: i64,
    pub record_count: usize,
}

impl WindowDescriptor {
    /// Get display name for this window (e.g., "30 days").
    pub fn display_name(&self) -> String {
        if self.period_days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.period_days)
        }
    }
}

/// Result of aggregating a window.
///
/// `NoData` means no scans were supplied at all, which is different from a
/// summary whose counters happen to be zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WrapOutcome {
    NoData { window: WindowDescriptor },
    Ready(Box<WrapSummary>),
}

impl WrapOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, WrapOutcome::NoData { .. })
    }

    pub fn summary(&self) -> Option<&WrapSummary> {
        match self {
            WrapOutcome::NoData { .. } => None,
            WrapOutcome::Ready(summary) => Some(summary.as_ref()),
        }
    }

    pub fn window(&self) -> &WindowDescriptor {
        match self {
            WrapOutcome::NoData { window } => window,
            WrapOutcome::Ready(summary) => &summary.window,
        }
    }
}

/// Complete wrap statistics for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrapSummary {
    pub window: WindowDescriptor,
    /// Number of scans
    pub total_scans: usize,
    /// Distinct subject names (case-sensitive)
    pub unique_subjects: usize,
    /// Most scanned subject; ties go to the one seen first
    pub top_subject: SubjectCount,
    /// Calories summed over scans that report them
    pub total_energy: u64,
    /// Mean calories over scans that report them
    pub avg_energy: Option<f64>,
    /// Mean freshness score over scans that report it
    pub avg_quality: Option<f64>,
    /// Percentage of scans recommended for purchase
    pub recommend_ratio: f64,
    /// Busiest hour of day (0-23); ties go to the smallest hour
    pub peak_hour: u8,
    /// Scan count by hour (0-23)
    pub hourly_distribution: [u32; 24],
    /// Longest run of consecutive days with at least one scan
    pub longest_streak: u32,
    pub streaks: StreakStats,
    pub category_counts: CategoryCounts,
    /// Scans that came with a bonus line
    pub bonus_count: usize,
    /// Most frequent subjects, descending
    pub top_n_frequency: Vec<SubjectCount>,
    /// Entries supplied outside the window (counted, not dropped)
    pub out_of_window: usize,
}

/// A subject name and how often it was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount {
    pub name: String,
    pub count: usize,
}

/// Streak details beyond the longest length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Longest run of consecutive active days
    pub longest_streak_days: u32,
    /// First day of the longest streak (earliest one on ties)
    pub longest_streak_start: Option<NaiveDate>,
    /// Last day of the longest streak
    pub longest_streak_end: Option<NaiveDate>,
    /// Consecutive active days ending on the window's end date
    pub current_streak_days: u32,
    /// Days with at least one scan
    pub active_days: u32,
    /// Calendar dates in the window, both ends included
    pub total_days: i64,
}

impl StreakStats {
    /// Calculate activity percentage.
    pub fn activity_percentage(&self) -> f64 {
        if self.total_days <= 0 {
            0.0
        } else {
            (self.active_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

/// Scan counts per food category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub fruit: usize,
    pub vegetable: usize,
    pub other: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: FoodCategory) -> usize {
        match category {
            FoodCategory::Fruit => self.fruit,
            FoodCategory::Vegetable => self.vegetable,
            FoodCategory::Other => self.other,
        }
    }

    fn increment(&mut self, category: FoodCategory) {
        match category {
            FoodCategory::Fruit => self.fruit += 1,
            FoodCategory::Vegetable => self.vegetable += 1,
            FoodCategory::Other => self.other += 1,
        }
    }
}

/// Classify a subject name by case-insensitive keyword containment.
///
/// Fruit keywords are checked first; names matching neither list are
/// [`FoodCategory::Other`].
pub fn classify(subject_name: &str, keywords: &CategoryKeywords) -> FoodCategory {
    let name = subject_name.to_lowercase();
    let matches = |list: &[String]| {
        list.iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .any(|keyword| !keyword.is_empty() && name.contains(&keyword))
    };

    if matches(&keywords.fruit) {
        FoodCategory::Fruit
    } else if matches(&keywords.vegetable) {
        FoodCategory::Vegetable
    } else {
        FoodCategory::Other
    }
}

/// Aggregate a window of scans into a wrap.
///
/// `entries` are expected to be pre-filtered to `window` by the caller;
/// entries outside it are reported in `out_of_window` but still counted.
pub fn aggregate(entries: &[ScanEntry], window: &WrapWindow, config: &WrapConfig) -> WrapOutcome {
    if entries.is_empty() {
        tracing::debug!(
            start = %window.start,
            end = %window.end,
            "No scans in wrap window"
        );
        return WrapOutcome::NoData {
            window: window.descriptor(0),
        };
    }

    let out_of_window = entries
        .iter()
        .filter(|entry| !window.contains(&entry.created_at))
        .count();
    if out_of_window > 0 {
        tracing::warn!(
            out_of_window,
            total = entries.len(),
            "Wrap received scans outside its window"
        );
    }

    let total_scans = entries.len();
    let frequencies = subject_frequencies(entries);
    let unique_subjects = frequencies.len();
    let top_subject = frequencies[0].clone();
    let top_n_frequency: Vec<SubjectCount> =
        frequencies.into_iter().take(config.top_n.max(1)).collect();

    // Calories and freshness: missing values are excluded from the mean
    let energies: Vec<u64> = entries
        .iter()
        .filter_map(|entry| entry.energy_value.map(u64::from))
        .collect();
    let total_energy: u64 = energies.iter().sum();
    let avg_energy = mean(total_energy as f64, energies.len());

    let scores: Vec<u64> = entries
        .iter()
        .filter_map(|entry| entry.quality_score.map(u64::from))
        .collect();
    let avg_quality = mean(scores.iter().sum::<u64>() as f64, scores.len());

    let recommended = entries.iter().filter(|entry| entry.recommend).count();
    let recommend_ratio = round1(recommended as f64 / total_scans as f64 * 100.0);

    let mut hourly_distribution = [0u32; 24];
    for entry in entries {
        hourly_distribution[entry.created_at.hour() as usize] += 1;
    }
    let peak_hour = peak_hour(&hourly_distribution);

    let active_dates: BTreeSet<NaiveDate> = entries
        .iter()
        .map(|entry| entry.created_at.date_naive())
        .collect();
    let active_dates: Vec<NaiveDate> = active_dates.into_iter().collect();
    let (longest_streak, longest_span) = longest_streak(&active_dates);
    let streaks = StreakStats {
        longest_streak_days: longest_streak,
        longest_streak_start: longest_span.map(|(start, _)| start),
        longest_streak_end: longest_span.map(|(_, end)| end),
        current_streak_days: current_streak(&active_dates, window.end.date_naive()),
        active_days: active_dates.len() as u32,
        total_days: window.calendar_days(),
    };

    let mut category_counts = CategoryCounts::default();
    for entry in entries {
        category_counts.increment(classify(&entry.subject_name, &config.categories));
    }

    let bonus_count = entries
        .iter()
        .filter(|entry| entry.bonus_text.as_deref().is_some_and(|text| !text.is_empty()))
        .count();

    tracing::debug!(
        total_scans,
        unique_subjects,
        longest_streak,
        peak_hour,
        "Wrap aggregated"
    );

    WrapOutcome::Ready(Box::new(WrapSummary {
        window: window.descriptor(total_scans),
        total_scans,
        unique_subjects,
        top_subject,
        total_energy,
        avg_energy,
        avg_quality,
        recommend_ratio,
        peak_hour,
        hourly_distribution,
        longest_streak,
        streaks,
        category_counts,
        bonus_count,
        top_n_frequency,
        out_of_window,
    }))
}

/// Subject counts ordered by descending count, then first appearance.
fn subject_frequencies(entries: &[ScanEntry]) -> Vec<SubjectCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SubjectCount> = Vec::new();

    for entry in entries {
        match index.get(entry.subject_name.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(&entry.subject_name, counts.len());
                counts.push(SubjectCount {
                    name: entry.subject_name.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Hour with the most scans; the smallest hour wins ties.
fn peak_hour(hourly: &[u32; 24]) -> u8 {
    let mut best = 0usize;
    for (hour, &count) in hourly.iter().enumerate() {
        if count > hourly[best] {
            best = hour;
        }
    }
    best as u8
}

/// Longest run of calendar-consecutive dates in a sorted, distinct list.
///
/// Returns the run length and its first and last day.
fn longest_streak(dates: &[NaiveDate]) -> (u32, Option<(NaiveDate, NaiveDate)>) {
    let Some(&first) = dates.first() else {
        return (0, None);
    };

    let mut longest = 1u32;
    let mut longest_span = (first, first);
    let mut current = 1u32;
    let mut current_start = first;

    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            current += 1;
        } else {
            current = 1;
            current_start = pair[1];
        }
        if current > longest {
            longest = current;
            longest_span = (current_start, pair[1]);
        }
    }

    (longest, Some(longest_span))
}

/// Consecutive active days ending on `today`, counting backwards.
fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    for date in dates.iter().rev() {
        let days_ago = (today - *date).num_days();
        if days_ago < 0 {
            continue;
        }
        if days_ago == i64::from(streak) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(round1(sum / count as f64))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, hour, 15, 0)
            .unwrap()
    }

    fn entry(name: &str, created_at: DateTime<FixedOffset>) -> ScanEntry {
        ScanEntry {
            created_at,
            subject_name: name.to_string(),
            quality_score: Some(7),
            energy_value: Some(100),
            recommend: true,
            bonus_text: None,
        }
    }

    fn january() -> WrapWindow {
        WrapWindow::new(at(1, 0), at(31, 23)).unwrap()
    }

    fn summarize(entries: &[ScanEntry]) -> WrapSummary {
        aggregate(entries, &january(), &WrapConfig::default())
            .summary()
            .cloned()
            .expect("expected a populated summary")
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let outcome = aggregate(&[], &january(), &WrapConfig::default());
        assert!(outcome.is_no_data());
        assert!(outcome.summary().is_none());
        assert_eq!(outcome.window().record_count, 0);
        assert_eq!(outcome.window().start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_longest_streak_skips_gaps() {
        let entries = vec![
            entry("Apple", at(1, 9)),
            entry("Apple", at(2, 9)),
            entry("Apple", at(3, 9)),
            entry("Apple", at(5, 9)),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.streaks.longest_streak_days, 3);
        assert_eq!(summary.streaks.longest_streak_start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(summary.streaks.longest_streak_end, NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(summary.streaks.active_days, 4);
    }

    #[test]
    fn test_single_day_streak_is_one() {
        let entries = vec![entry("Apple", at(4, 8)), entry("Pear", at(4, 20))];
        let summary = summarize(&entries);
        assert_eq!(summary.longest_streak, 1);
        assert_eq!(summary.streaks.active_days, 1);
    }

    #[test]
    fn test_streak_order_independent() {
        let entries = vec![
            entry("Apple", at(10, 9)),
            entry("Apple", at(8, 9)),
            entry("Apple", at(9, 9)),
            entry("Apple", at(1, 9)),
        ];
        assert_eq!(summarize(&entries).longest_streak, 3);
    }

    #[test]
    fn test_current_streak_counts_back_from_window_end() {
        let window = WrapWindow::new(at(1, 0), at(10, 22)).unwrap();
        let entries = vec![
            entry("Apple", at(6, 9)),
            entry("Apple", at(8, 9)),
            entry("Apple", at(9, 9)),
            entry("Apple", at(10, 9)),
        ];
        let outcome = aggregate(&entries, &window, &WrapConfig::default());
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.streaks.current_streak_days, 3);
        assert_eq!(summary.streaks.total_days, 10);

        let stale = vec![entry("Apple", at(8, 9))];
        let outcome = aggregate(&stale, &window, &WrapConfig::default());
        assert_eq!(outcome.summary().unwrap().streaks.current_streak_days, 0);
    }

    #[test]
    fn test_subject_frequency_and_top_subject() {
        let entries = vec![
            entry("A", at(1, 9)),
            entry("A", at(1, 10)),
            entry("B", at(1, 11)),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.top_subject.name, "A");
        assert_eq!(summary.top_subject.count, 2);
        assert_eq!(summary.unique_subjects, 2);
        assert_eq!(
            summary.top_n_frequency,
            vec![
                SubjectCount { name: "A".to_string(), count: 2 },
                SubjectCount { name: "B".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_frequency_ties_keep_first_seen_order() {
        let entries = vec![
            entry("Kiwi", at(1, 9)),
            entry("Plum", at(1, 9)),
            entry("Plum", at(1, 9)),
            entry("Kiwi", at(1, 9)),
            entry("kiwi", at(1, 9)),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.top_subject.name, "Kiwi");
        // Names are case-sensitive
        assert_eq!(summary.unique_subjects, 3);
        let names: Vec<&str> = summary
            .top_n_frequency
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kiwi", "Plum", "kiwi"]);
    }

    #[test]
    fn test_top_n_is_configurable() {
        let entries: Vec<ScanEntry> = ["a", "b", "c", "d"]
            .iter()
            .map(|name| entry(name, at(2, 12)))
            .collect();
        let config = WrapConfig {
            top_n: 2,
            ..Default::default()
        };
        let outcome = aggregate(&entries, &january(), &config);
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.top_n_frequency.len(), 2);
        assert_eq!(summary.unique_subjects, 4);
    }

    #[test]
    fn test_missing_energy_is_excluded_from_mean() {
        let mut entries = vec![
            entry("Apple", at(1, 9)),
            entry("Apple", at(1, 9)),
            entry("Apple", at(1, 9)),
        ];
        entries[0].energy_value = Some(100);
        entries[1].energy_value = None;
        entries[2].energy_value = Some(200);

        let summary = summarize(&entries);
        assert_eq!(summary.total_energy, 300);
        assert_eq!(summary.avg_energy, Some(150.0));
    }

    #[test]
    fn test_averages_absent_when_no_values() {
        let mut entries = vec![entry("Apple", at(1, 9))];
        entries[0].energy_value = None;
        entries[0].quality_score = None;

        let summary = summarize(&entries);
        assert_eq!(summary.total_energy, 0);
        assert_eq!(summary.avg_energy, None);
        assert_eq!(summary.avg_quality, None);
    }

    #[test]
    fn test_avg_quality_rounds_to_one_decimal() {
        let mut entries = vec![
            entry("Apple", at(1, 9)),
            entry("Apple", at(1, 9)),
            entry("Apple", at(1, 9)),
        ];
        entries[0].quality_score = Some(8);
        entries[1].quality_score = Some(7);
        entries[2].quality_score = Some(7);

        assert_eq!(summarize(&entries).avg_quality, Some(7.3));
    }

    #[test]
    fn test_recommend_ratio() {
        let mut entries: Vec<ScanEntry> = (0..4).map(|_| entry("Apple", at(1, 9))).collect();
        entries[2].recommend = false;
        entries[3].recommend = false;
        assert_eq!(summarize(&entries).recommend_ratio, 50.0);

        let mut entries: Vec<ScanEntry> = (0..3).map(|_| entry("Apple", at(1, 9))).collect();
        entries[0].recommend = false;
        assert_eq!(summarize(&entries).recommend_ratio, 66.7);
    }

    #[test]
    fn test_peak_hour_ties_go_to_smallest_hour() {
        let entries = vec![
            entry("Apple", at(1, 9)),
            entry("Apple", at(1, 14)),
            entry("Apple", at(2, 9)),
            entry("Apple", at(2, 14)),
            entry("Apple", at(3, 20)),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.peak_hour, 9);
        assert_eq!(summary.hourly_distribution[9], 2);
        assert_eq!(summary.hourly_distribution[14], 2);

        let late_first = vec![
            entry("Apple", at(1, 14)),
            entry("Apple", at(1, 9)),
            entry("Apple", at(2, 14)),
            entry("Apple", at(2, 9)),
        ];
        // Input order does not matter, only the hour value
        assert_eq!(summarize(&late_first).peak_hour, 9);
    }

    #[test]
    fn test_peak_hour_uses_local_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let created_at = tokyo.with_ymd_and_hms(2024, 1, 5, 7, 30, 0).unwrap();
        let summary = summarize(&[entry("Apple", created_at)]);
        assert_eq!(summary.peak_hour, 7);
    }

    #[test]
    fn test_category_counts() {
        let entries = vec![
            entry("Green Apple", at(1, 9)),
            entry("STRAWBERRY", at(1, 9)),
            entry("Baby Carrots", at(1, 9)),
            entry("Bell pepper", at(1, 9)),
            entry("Croissant", at(1, 9)),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.category_counts.fruit, 2);
        assert_eq!(summary.category_counts.vegetable, 2);
        assert_eq!(summary.category_counts.other, 1);
        assert_eq!(summary.category_counts.get(FoodCategory::Other), 1);
    }

    #[test]
    fn test_classify_uses_configured_keywords() {
        let keywords = CategoryKeywords {
            fruit: vec!["Durian".to_string()],
            vegetable: vec!["kale".to_string(), "".to_string()],
        };
        assert_eq!(classify("durian slice", &keywords), FoodCategory::Fruit);
        assert_eq!(classify("Curly Kale", &keywords), FoodCategory::Vegetable);
        // Empty keywords never match
        assert_eq!(classify("Apple", &keywords), FoodCategory::Other);

        // A name matching both lists is a fruit
        let defaults = CategoryKeywords::default();
        assert_eq!(classify("pineapple pepper salsa", &defaults), FoodCategory::Fruit);
    }

    #[test]
    fn test_bonus_count_ignores_empty_text() {
        let mut entries: Vec<ScanEntry> = (0..3).map(|_| entry("Apple", at(1, 9))).collect();
        entries[0].bonus_text = Some("Apple-solutely!".to_string());
        entries[1].bonus_text = Some(String::new());
        assert_eq!(summarize(&entries).bonus_count, 1);
    }

    #[test]
    fn test_input_is_not_reordered() {
        let entries = vec![
            entry("B", at(3, 9)),
            entry("A", at(1, 9)),
            entry("A", at(2, 9)),
        ];
        let before = entries.clone();
        let _ = summarize(&entries);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_out_of_window_entries_are_counted() {
        let window = WrapWindow::new(at(10, 0), at(20, 0)).unwrap();
        let entries = vec![entry("Apple", at(12, 9)), entry("Apple", at(25, 9))];
        let outcome = aggregate(&entries, &window, &WrapConfig::default());
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.out_of_window, 1);
        assert_eq!(summary.total_scans, 2);
    }

    #[test]
    fn test_window_construction() {
        assert!(WrapWindow::new(at(5, 0), at(4, 0)).is_err());

        let window = WrapWindow::last_days(at(31, 12), 30).unwrap();
        assert_eq!(window.start, at(1, 12));
        assert_eq!(window.period_days(), 30);
        assert!(window.contains(&at(1, 12)));
        assert!(window.contains(&at(31, 12)));
        assert!(!window.contains(&at(31, 13)));
        assert_eq!(window.descriptor(4).display_name(), "30 days");
    }

    #[test]
    fn test_activity_percentage() {
        let stats = StreakStats {
            active_days: 15,
            total_days: 30,
            ..Default::default()
        };
        assert_eq!(stats.activity_percentage(), 50.0);
        assert_eq!(StreakStats::default().activity_percentage(), 0.0);
    }

    #[test]
    fn test_activity_never_exceeds_full_window() {
        // 30 days back from noon touches 31 calendar dates
        let window = WrapWindow::last_days(at(31, 12), 30).unwrap();
        let mut entries = vec![entry("Apple", at(1, 13))];
        entries.extend((2..=31).map(|day| entry("Apple", at(day, 11))));

        let outcome = aggregate(&entries, &window, &WrapConfig::default());
        let streaks = &outcome.summary().unwrap().streaks;
        assert_eq!(streaks.active_days, 31);
        assert_eq!(streaks.total_days, 31);
        assert_eq!(streaks.activity_percentage(), 100.0);
        assert_eq!(streaks.longest_streak_days, 31);
    }

    #[test]
    fn test_same_day_window_counts_one_day() {
        let window = WrapWindow::new(at(7, 8), at(7, 20)).unwrap();
        assert_eq!(window.period_days(), 0);
        assert_eq!(window.calendar_days(), 1);

        let outcome = aggregate(&[entry("Apple", at(7, 9))], &window, &WrapConfig::default());
        let streaks = &outcome.summary().unwrap().streaks;
        assert_eq!(streaks.total_days, 1);
        assert_eq!(streaks.activity_percentage(), 100.0);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = aggregate(&[], &january(), &WrapConfig::default());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["window"]["record_count"], 0);

        let outcome = aggregate(&[entry("Apple", at(1, 9))], &january(), &WrapConfig::default());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["top_subject"]["name"], "Apple");
        assert_eq!(json["longest_streak"], 1);
    }
}
