//! Database repository layer
//!
//! Stores normalized scan records and serves the queries the CLI needs:
//! lookups by id, the most recent scans, and all scans inside a wrap window.

use crate::analytics::WrapWindow;
use crate::error::Result;
use crate::types::{QualityState, ScanEntry, StructuredRecord};
use chrono::{DateTime, FixedOffset, Local};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// A scan record as persisted, with its id and insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    /// Assigned by the store at insert time
    pub created_at: DateTime<FixedOffset>,
    pub record: StructuredRecord,
}

impl StoredRecord {
    /// View this record as wrap aggregation input.
    pub fn to_entry(&self) -> ScanEntry {
        ScanEntry::from_record(&self.record, self.created_at)
    }
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Scan record operations
    // ============================================

    /// Insert a record, stamping it with the current local time.
    pub fn insert_record(&self, record: &StructuredRecord) -> Result<StoredRecord> {
        self.insert_record_at(record, Local::now().fixed_offset())
    }

    /// Insert a record with an explicit creation time.
    pub fn insert_record_at(
        &self,
        record: &StructuredRecord,
        created_at: DateTime<FixedOffset>,
    ) -> Result<StoredRecord> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO food_analyses (
                subject_name, quality_score, quality_state, descriptive_notes,
                recommend, usage_guidance, shelf_life_days, energy_value,
                nutrition_notes, benefit_notes, recommendation_text, storage_guidance,
                bonus_text, raw_fallback, created_at, created_ts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                record.subject_name,
                record.quality_score,
                record.quality_state.as_str(),
                record.descriptive_notes,
                record.recommend,
                record.usage_guidance,
                record.shelf_life_days,
                record.energy_value,
                record.nutrition_notes,
                record.benefit_notes,
                record.recommendation_text,
                record.storage_guidance,
                record.bonus_text,
                record.raw_fallback,
                created_at.to_rfc3339(),
                created_at.timestamp_millis(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(
            id,
            subject = %record.subject_name,
            fallback = record.is_fallback(),
            "Stored scan record"
        );

        Ok(StoredRecord {
            id,
            created_at,
            record: record.clone(),
        })
    }

    /// Get a record by ID
    pub fn get_record(&self, id: i64) -> Result<Option<StoredRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                "SELECT * FROM food_analyses WHERE id = ?",
                [id],
                Self::row_to_stored,
            )
            .optional()?;
        Ok(record)
    }

    /// Most recent records, newest first.
    pub fn recent_records(&self, limit: usize) -> Result<Vec<StoredRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM food_analyses ORDER BY created_ts DESC, id DESC LIMIT ?",
        )?;
        let records = stmt
            .query_map([limit as i64], Self::row_to_stored)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// All scans inside a window, oldest first.
    pub fn entries_between(&self, window: &WrapWindow) -> Result<Vec<ScanEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT created_at, subject_name, quality_score, energy_value, recommend, bonus_text
            FROM food_analyses
            WHERE created_ts >= ?1 AND created_ts <= ?2
            ORDER BY created_ts ASC, id ASC
            "#,
        )?;
        let entries = stmt
            .query_map(
                params![
                    window.start.timestamp_millis(),
                    window.end.timestamp_millis()
                ],
                Self::row_to_entry,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            count = entries.len(),
            start = %window.start,
            end = %window.end,
            "Loaded wrap window"
        );
        Ok(entries)
    }

    /// Total number of stored records
    pub fn count_records(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM food_analyses", [], |r| r.get(0))?;
        Ok(count)
    }

    fn parse_created_at(row: &Row) -> rusqlite::Result<DateTime<FixedOffset>> {
        let created_at_str: String = row.get("created_at")?;
        DateTime::parse_from_rfc3339(&created_at_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })
    }

    fn row_to_stored(row: &Row) -> rusqlite::Result<StoredRecord> {
        let quality_state: Option<String> = row.get("quality_state")?;
        let text = |column: &str| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
        };

        let record = StructuredRecord {
            subject_name: row.get("subject_name")?,
            quality_score: row
                .get::<_, Option<i64>>("quality_score")?
                .map(|score| score.clamp(0, 10) as u8)
                .unwrap_or_default(),
            quality_state: quality_state
                .map(|state| QualityState::parse(&state))
                .unwrap_or(QualityState::Unknown),
            descriptive_notes: text("descriptive_notes")?,
            recommend: row.get("recommend")?,
            usage_guidance: text("usage_guidance")?,
            shelf_life_days: row
                .get::<_, Option<u32>>("shelf_life_days")?
                .unwrap_or_default(),
            energy_value: row.get::<_, Option<u32>>("energy_value")?.unwrap_or_default(),
            nutrition_notes: text("nutrition_notes")?,
            benefit_notes: text("benefit_notes")?,
            recommendation_text: text("recommendation_text")?,
            storage_guidance: text("storage_guidance")?,
            bonus_text: row.get("bonus_text")?,
            raw_fallback: row.get("raw_fallback")?,
        };

        Ok(StoredRecord {
            id: row.get("id")?,
            created_at: Self::parse_created_at(row)?,
            record,
        })
    }

    fn row_to_entry(row: &Row) -> rusqlite::Result<ScanEntry> {
        Ok(ScanEntry {
            created_at: Self::parse_created_at(row)?,
            subject_name: row.get("subject_name")?,
            quality_score: row
                .get::<_, Option<i64>>("quality_score")?
                .map(|score| score.clamp(0, 10) as u8),
            energy_value: row.get("energy_value")?,
            recommend: row.get("recommend")?,
            bonus_text: row.get("bonus_text")?,
        })
    }
}
