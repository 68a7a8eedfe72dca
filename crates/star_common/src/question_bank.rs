//! Question pools loaded from flat CSV tables.
//!
//! Reads degrade to empty rather than failing: a missing or malformed
//! source file means the feature that depends on it simply has nothing to
//! offer until the file is fixed.

use crate::error::StarError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Static general pool, maintained by hand. Read-only from our side.
pub const GENERAL_QUESTIONS_FILE: &str = "star_questions.csv";

/// Job-specific generated pool, fully overwritten on each generation.
pub const JOB_QUESTIONS_FILE: &str = "interview_questions.csv";

/// Optional pre-seeded general interview pool.
pub const INTERVIEW_SEED_FILE: &str = "general_interview_questions.csv";

#[derive(Debug, Serialize, Deserialize)]
struct QuestionRow {
    question: String,
}

/// Access to the question pool files under one data directory.
pub struct QuestionBank {
    data_dir: PathBuf,
}

impl QuestionBank {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The static general pool. Empty entries are dropped; any read
    /// failure degrades to an empty pool with a logged warning.
    pub fn load_general(&self) -> Vec<String> {
        let path = self.data_dir.join(GENERAL_QUESTIONS_FILE);
        match read_question_column(&path) {
            Ok(questions) => questions,
            Err(e) => {
                warn!("general question pool unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// The persisted pools in fixed order: job-specific first, then the
    /// general interview seed. Absent sources are skipped silently.
    /// Questions appearing in more than one source are kept as
    /// duplicates; concatenation does not deduplicate.
    pub fn load_combined_persisted(&self) -> Vec<String> {
        let mut pool = Vec::new();
        for name in [JOB_QUESTIONS_FILE, INTERVIEW_SEED_FILE] {
            let path = self.data_dir.join(name);
            if !path.exists() {
                continue;
            }
            match read_question_column(&path) {
                Ok(mut questions) => pool.append(&mut questions),
                Err(e) => warn!("skipping {}: {}", name, e),
            }
        }
        pool
    }

    /// Overwrite the job-specific pool with freshly generated questions.
    pub fn write_job_pool(&self, questions: &[String]) -> Result<(), StarError> {
        std::fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(JOB_QUESTIONS_FILE);

        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        for question in questions {
            writer
                .serialize(QuestionRow {
                    question: question.clone(),
                })
                .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        Ok(())
    }
}

/// Read the `question` column of a CSV table, dropping blank entries.
fn read_question_column(path: &Path) -> Result<Vec<String>, StarError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| StarError::StorageDegraded(e.to_string()))?;

    let mut questions = Vec::new();
    for row in reader.deserialize::<QuestionRow>() {
        let row = row.map_err(|e| StarError::StorageDegraded(e.to_string()))?;
        let question = row.question.trim().to_string();
        if !question.is_empty() {
            questions.push(question);
        }
    }
    Ok(questions)
}
