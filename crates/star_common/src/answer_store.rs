//! Persisted answer cache keyed by question text.
//!
//! A question's canonical rewrite is fixed after first generation: lookups
//! match on the question alone, and the user's current draft is only
//! consulted on a miss. Entries live until purged.
//!
//! Every mutation is a full load-modify-save of the table. There is no
//! locking; concurrent writers race and the last full rewrite wins, which
//! is acceptable for a single local user only.

use crate::error::StarError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Answer cache table, columns `question,answer`.
pub const ANSWERS_FILE: &str = "star_answers.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
}

/// Where a submitted answer's rewrite came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cached,
    Generated,
}

/// Storage behind the cache. Implementations load and rewrite the whole
/// table; there is no partial update.
pub trait AnswerTable {
    fn load(&self) -> Result<Vec<AnswerRecord>, StarError>;
    fn save(&self, records: &[AnswerRecord]) -> Result<(), StarError>;
}

/// CSV-file table, the default storage.
pub struct CsvAnswerTable {
    path: PathBuf,
}

impl CsvAnswerTable {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(ANSWERS_FILE),
        }
    }
}

impl AnswerTable for CsvAnswerTable {
    /// A missing or malformed file degrades to an empty table.
    fn load(&self) -> Result<Vec<AnswerRecord>, StarError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("answer cache unreadable: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::new();
        for row in reader.deserialize::<AnswerRecord>() {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("answer cache malformed, ignoring stored entries: {}", e);
                    return Ok(Vec::new());
                }
            }
        }
        Ok(records)
    }

    fn save(&self, records: &[AnswerRecord]) -> Result<(), StarError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        Ok(())
    }
}

/// Lookup-or-compute cache over an [`AnswerTable`].
pub struct AnswerStore<T: AnswerTable> {
    table: T,
}

impl<T: AnswerTable> AnswerStore<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// Return the canonical rewrite for `question`, generating and
    /// persisting it on first use.
    ///
    /// On a hit the stored answer is returned and `compute` is never
    /// called - the current `draft` does not influence a hit. On a miss,
    /// `compute(draft)` runs; only a definite success is written back.
    /// `Ok(None)` from `compute` means the backend produced no usable
    /// text and surfaces as [`StarError::GenerationFailed`].
    pub fn get_or_compute<F>(
        &self,
        question: &str,
        draft: &str,
        compute: F,
    ) -> Result<(String, AnswerSource), StarError>
    where
        F: FnOnce(&str) -> Result<Option<String>, StarError>,
    {
        let records = self.table.load()?;
        if let Some(hit) = records.iter().find(|r| r.question == question) {
            info!("answer cache hit");
            return Ok((hit.answer.clone(), AnswerSource::Cached));
        }

        let answer = compute(draft)?.ok_or(StarError::GenerationFailed)?;
        self.insert(question, &answer)?;
        Ok((answer, AnswerSource::Generated))
    }

    /// Write `question -> answer`, replacing any prior entry for the same
    /// question text (last write wins, no versioning).
    pub fn insert(&self, question: &str, answer: &str) -> Result<(), StarError> {
        let mut records = self.table.load()?;
        records.retain(|r| r.question != question);
        records.push(AnswerRecord {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        self.table.save(&records)
    }

    /// Stored answer for `question`, if any.
    pub fn lookup(&self, question: &str) -> Result<Option<String>, StarError> {
        Ok(self
            .table
            .load()?
            .into_iter()
            .find(|r| r.question == question)
            .map(|r| r.answer))
    }

    /// Number of cached answers.
    pub fn count(&self) -> Result<usize, StarError> {
        Ok(self.table.load()?.len())
    }

    /// Delete every cached answer.
    pub fn purge(&self) -> Result<(), StarError> {
        self.table.save(&[])
    }
}
