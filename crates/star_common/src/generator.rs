//! Interview question generation from a job description.

use crate::error::StarError;
use crate::llm::TextGenClient;
use crate::question_bank::QuestionBank;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::info;

/// Builds a fresh interview pool: generate candidates, persist them, fold
/// in the persisted pools, shuffle.
pub struct QuestionGenerator<'a> {
    client: &'a TextGenClient,
    bank: &'a QuestionBank,
    strict_dedup: bool,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(client: &'a TextGenClient, bank: &'a QuestionBank, strict_dedup: bool) -> Self {
        Self {
            client,
            bank,
            strict_dedup,
        }
    }

    /// Generate a shuffled interview pool from a job description.
    ///
    /// The candidates overwrite the persisted job pool before the
    /// persisted pools are read back and appended, so each candidate
    /// appears twice in the result - once directly and once via the
    /// re-read. That double weighting is the long-standing behavior;
    /// `strict_dedup` collapses exact duplicates (first occurrence kept)
    /// before the shuffle.
    pub fn generate_from_job_description(&self, text: &str) -> Result<Vec<String>, StarError> {
        let candidates = self.client.generate_questions(text)?;
        self.bank.write_job_pool(&candidates)?;

        let mut pool = candidates;
        pool.extend(self.bank.load_combined_persisted());

        if self.strict_dedup {
            let before = pool.len();
            let mut seen = HashSet::new();
            pool.retain(|q| seen.insert(q.clone()));
            info!(
                removed = before - pool.len(),
                "deduplicated generated pool"
            );
        }

        pool.shuffle(&mut rand::thread_rng());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, CompletionBackend};
    use crate::question_bank::INTERVIEW_SEED_FILE;
    use std::collections::HashMap;

    struct ScriptedBackend {
        response: String,
    }

    impl CompletionBackend for ScriptedBackend {
        fn complete(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<String, StarError> {
            Ok(self.response.clone())
        }
    }

    fn client_with(response: &str) -> TextGenClient {
        TextGenClient::with_backend(
            Box::new(ScriptedBackend {
                response: response.to_string(),
            }),
            600,
        )
    }

    fn multiset(pool: &[String]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for q in pool {
            *counts.entry(q.as_str()).or_insert(0) += 1;
        }
        counts
    }

    const TWO_QUESTIONS: &str = "Tell me about a time you led a team?\n\
                                 Describe a situation where you handled conflicting priorities?\n";

    #[test]
    fn test_candidates_appear_twice_by_construction() {
        let dir = tempfile::tempdir().unwrap();
        let bank = QuestionBank::new(dir.path());
        let client = client_with(TWO_QUESTIONS);

        let pool = QuestionGenerator::new(&client, &bank, false)
            .generate_from_job_description("a job description")
            .unwrap();

        let counts = multiset(&pool);
        assert_eq!(pool.len(), 4);
        assert_eq!(counts["Tell me about a time you led a team?"], 2);
        assert_eq!(
            counts["Describe a situation where you handled conflicting priorities?"],
            2
        );
    }

    #[test]
    fn test_shuffle_preserves_multiset_with_seed_pool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(INTERVIEW_SEED_FILE),
            "question\nWhat is a failure you learned the most from?\n",
        )
        .unwrap();
        let bank = QuestionBank::new(dir.path());
        let client = client_with(TWO_QUESTIONS);

        let pool = QuestionGenerator::new(&client, &bank, false)
            .generate_from_job_description("a job description")
            .unwrap();

        // 2 candidates x2 via the store re-read, plus the seed question
        let counts = multiset(&pool);
        assert_eq!(pool.len(), 5);
        assert_eq!(counts["Tell me about a time you led a team?"], 2);
        assert_eq!(counts["What is a failure you learned the most from?"], 1);
    }

    #[test]
    fn test_strict_dedup_collapses_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let bank = QuestionBank::new(dir.path());
        let client = client_with(TWO_QUESTIONS);

        let pool = QuestionGenerator::new(&client, &bank, true)
            .generate_from_job_description("a job description")
            .unwrap();

        let counts = multiset(&pool);
        assert_eq!(pool.len(), 2);
        assert!(counts.values().all(|&n| n == 1));
    }

    #[test]
    fn test_generation_overwrites_prior_job_pool() {
        let dir = tempfile::tempdir().unwrap();
        let bank = QuestionBank::new(dir.path());

        let first = client_with("Tell me about a time you shipped something hard?\n");
        QuestionGenerator::new(&first, &bank, false)
            .generate_from_job_description("first job")
            .unwrap();

        let second = client_with(TWO_QUESTIONS);
        let pool = QuestionGenerator::new(&second, &bank, false)
            .generate_from_job_description("second job")
            .unwrap();

        assert!(!pool
            .iter()
            .any(|q| q == "Tell me about a time you shipped something hard?"));
    }

    #[test]
    fn test_backend_failure_leaves_store_untouched() {
        struct FailingBackend;
        impl CompletionBackend for FailingBackend {
            fn complete(
                &self,
                _messages: &[ChatMessage],
                _max_tokens: u32,
            ) -> Result<String, StarError> {
                Err(StarError::Upstream("rate limited".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let bank = QuestionBank::new(dir.path());
        bank.write_job_pool(&["Existing question from before?".to_string()])
            .unwrap();

        let client = TextGenClient::with_backend(Box::new(FailingBackend), 600);
        let result = QuestionGenerator::new(&client, &bank, false)
            .generate_from_job_description("a job description");

        assert!(matches!(result, Err(StarError::Upstream(_))));
        assert_eq!(
            bank.load_combined_persisted(),
            vec!["Existing question from before?".to_string()]
        );
    }
}
