//! Per-mode practice session state.
//!
//! Each user action is one synchronous request; the cursors are serialized
//! to a JSON file between requests so drafts and flags survive re-renders.
//! There is no hidden global state - everything a render needs lives in
//! [`SessionState`].

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Practice mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free-text daily journal, no question.
    Diary,
    /// Random question from the static general pool.
    General,
    /// Generated job-specific pool, cycled in order.
    Interview,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Diary => write!(f, "diary"),
            Mode::General => write!(f, "general"),
            Mode::Interview => write!(f, "interview"),
        }
    }
}

/// Where a mode's interaction currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No active question (diary mode never leaves the question-free states).
    #[default]
    Idle,
    QuestionShown,
    AwaitingSubmit,
    ShowingResult,
}

/// Per-mode cursor: current question index, draft buffer, and the one-shot
/// clear flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeCursor {
    #[serde(default)]
    pub phase: Phase,

    /// Index into the mode's pool. Only meaningful while it is in range;
    /// an out-of-range index (the pool shrank underneath us) means no
    /// question is displayed.
    #[serde(default)]
    pub current_index: Option<usize>,

    #[serde(default)]
    pub input_buffer: String,

    /// One-shot: the next render shows an empty input regardless of the
    /// stored buffer, then the flag is spent.
    #[serde(default)]
    pub clear_flag: bool,
}

impl ModeCursor {
    /// The input text a render should display. Consumes a pending clear
    /// flag: the forced-empty render happens exactly once.
    pub fn render_input(&mut self) -> String {
        if self.clear_flag {
            self.clear_flag = false;
            self.input_buffer.clear();
        }
        self.input_buffer.clone()
    }

    /// Show a uniformly random question from a pool of `pool_len`.
    /// Returns the drawn index, or `None` for an empty pool.
    pub fn show_random(&mut self, pool_len: usize) -> Option<usize> {
        if pool_len == 0 {
            self.current_index = None;
            self.phase = Phase::Idle;
            return None;
        }
        let index = rand::thread_rng().gen_range(0..pool_len);
        self.show_question(index);
        Some(index)
    }

    /// Show the question at `index`, starting from a blank draft.
    pub fn show_question(&mut self, index: usize) {
        self.current_index = Some(index);
        self.input_buffer.clear();
        self.clear_flag = false;
        self.phase = Phase::QuestionShown;
    }

    /// Capture the submitted draft before the backend call runs. A clear
    /// flag that was never rendered is spent here: submit is the mode's
    /// next mutating action and must observe it consumed.
    pub fn begin_submit(&mut self, draft: &str) {
        self.clear_flag = false;
        self.input_buffer = draft.to_string();
        self.phase = Phase::AwaitingSubmit;
    }

    /// The backend call succeeded.
    pub fn finish_submit(&mut self) {
        self.phase = Phase::ShowingResult;
    }

    /// Explicit clear: force the next render empty. Lands on
    /// `QuestionShown` while a question is active, otherwise `Idle`.
    pub fn clear(&mut self, has_question: bool) {
        self.clear_flag = true;
        self.phase = if has_question {
            Phase::QuestionShown
        } else {
            Phase::Idle
        };
    }

    /// Advance to the next question, wrapping past the end of the pool.
    /// Returns the new index, or `None` for an empty pool.
    pub fn advance(&mut self, pool_len: usize) -> Option<usize> {
        if pool_len == 0 {
            self.current_index = None;
            self.phase = Phase::Idle;
            return None;
        }

        let next = match self.current_index {
            Some(i) if i + 1 < pool_len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.current_index = Some(next);
        self.clear_flag = true;
        self.phase = Phase::QuestionShown;
        Some(next)
    }

    /// Index into `pool`, honoring the range-validity rule.
    pub fn question<'p>(&self, pool: &'p [String]) -> Option<&'p str> {
        self.current_index
            .and_then(|i| pool.get(i))
            .map(String::as_str)
    }
}

/// All per-mode cursors plus the interview pool from the latest generate
/// action. The interview pool is rebuilt only by generating again, never
/// restored from the persisted CSV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub diary: ModeCursor,
    #[serde(default)]
    pub general: ModeCursor,
    #[serde(default)]
    pub interview: ModeCursor,

    /// Shuffled pool installed by the latest generate action.
    #[serde(default)]
    pub interview_pool: Vec<String>,

    /// Timestamp of the last save.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SessionState {
    pub fn cursor(&self, mode: Mode) -> &ModeCursor {
        match mode {
            Mode::Diary => &self.diary,
            Mode::General => &self.general,
            Mode::Interview => &self.interview,
        }
    }

    pub fn cursor_mut(&mut self, mode: Mode) -> &mut ModeCursor {
        match mode {
            Mode::Diary => &mut self.diary,
            Mode::General => &mut self.general,
            Mode::Interview => &mut self.interview,
        }
    }

    /// Install a freshly generated interview pool and point the cursor at
    /// its first question.
    pub fn install_interview_pool(&mut self, pool: Vec<String>) {
        self.interview_pool = pool;
        if self.interview_pool.is_empty() {
            self.interview = ModeCursor::default();
        } else {
            self.interview.show_question(0);
        }
    }

    /// The interview question currently under the cursor.
    pub fn interview_question(&self) -> Option<&str> {
        self.interview.question(&self.interview_pool)
    }

    /// Load session state from `path`. An absent or unreadable file is a
    /// fresh session, never an error.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("session state unreadable, starting fresh: {}", e);
                Self::default()
            }
        }
    }

    /// Persist session state to `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.updated_at = Some(chrono::Utc::now());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context("Failed to write session state")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Question number {}?", i)).collect()
    }

    #[test]
    fn test_round_robin_wraps_to_start() {
        let mut cursor = ModeCursor::default();
        cursor.show_question(0);

        let n = 5;
        for _ in 0..n {
            cursor.advance(n);
        }
        assert_eq!(cursor.current_index, Some(0));
    }

    #[test]
    fn test_advance_sets_clear_flag_and_phase() {
        let mut cursor = ModeCursor::default();
        cursor.show_question(0);
        cursor.begin_submit("draft");
        cursor.finish_submit();

        cursor.advance(3);
        assert_eq!(cursor.current_index, Some(1));
        assert!(cursor.clear_flag);
        assert_eq!(cursor.phase, Phase::QuestionShown);
    }

    #[test]
    fn test_show_random_stays_in_range() {
        let mut cursor = ModeCursor::default();
        for _ in 0..50 {
            let index = cursor.show_random(3).unwrap();
            assert!(index < 3);
            assert_eq!(cursor.phase, Phase::QuestionShown);
        }
    }

    #[test]
    fn test_show_random_on_empty_pool() {
        let mut cursor = ModeCursor::default();
        assert_eq!(cursor.show_random(0), None);
        assert_eq!(cursor.phase, Phase::Idle);
    }

    #[test]
    fn test_advance_on_empty_pool() {
        let mut cursor = ModeCursor::default();
        assert_eq!(cursor.advance(0), None);
        assert_eq!(cursor.current_index, None);
    }

    #[test]
    fn test_clear_flag_is_one_shot() {
        let mut cursor = ModeCursor::default();
        cursor.show_question(0);
        cursor.begin_submit("an earlier draft");

        cursor.clear(true);
        // forced-empty render consumes the flag
        assert_eq!(cursor.render_input(), "");
        assert!(!cursor.clear_flag);

        // the next mutating action observes the flag spent; the new draft
        // is rendered, not forced empty
        cursor.begin_submit("a new draft");
        assert_eq!(cursor.render_input(), "a new draft");
    }

    #[test]
    fn test_unrendered_clear_flag_is_spent_by_submit() {
        let mut cursor = ModeCursor::default();
        cursor.show_question(0);
        cursor.clear(true);

        cursor.begin_submit("straight to submit");
        assert!(!cursor.clear_flag);
        assert_eq!(cursor.render_input(), "straight to submit");
    }

    #[test]
    fn test_clear_without_question_goes_idle() {
        let mut cursor = ModeCursor::default();
        cursor.begin_submit("diary text");
        cursor.clear(false);
        assert_eq!(cursor.phase, Phase::Idle);
        assert!(cursor.clear_flag);
    }

    #[test]
    fn test_question_index_validity() {
        let mut cursor = ModeCursor::default();
        let pool = pool(2);

        cursor.show_question(1);
        assert_eq!(cursor.question(&pool), Some("Question number 1?"));

        // pool shrank underneath the cursor: no question displayed
        cursor.show_question(7);
        assert_eq!(cursor.question(&pool), None);

        assert_eq!(cursor.question(&[]), None);
    }

    #[test]
    fn test_install_interview_pool_points_at_first() {
        let mut state = SessionState::default();
        state.install_interview_pool(pool(3));

        assert_eq!(state.interview.current_index, Some(0));
        assert_eq!(state.interview.phase, Phase::QuestionShown);
        assert_eq!(state.interview_question(), Some("Question number 0?"));
    }

    #[test]
    fn test_install_empty_pool_resets_cursor() {
        let mut state = SessionState::default();
        state.install_interview_pool(pool(2));
        state.install_interview_pool(Vec::new());

        assert_eq!(state.interview.current_index, None);
        assert_eq!(state.interview.phase, Phase::Idle);
        assert_eq!(state.interview_question(), None);
    }

    #[test]
    fn test_state_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut state = SessionState::default();
        state.install_interview_pool(pool(2));
        state.general.show_question(1);
        state.general.begin_submit("my general draft");
        state.save(&path).unwrap();

        let loaded = SessionState::load(&path);
        assert_eq!(loaded.interview_pool.len(), 2);
        assert_eq!(loaded.general.input_buffer, "my general draft");
        assert_eq!(loaded.general.phase, Phase::AwaitingSubmit);
        assert!(loaded.updated_at.is_some());
    }

    #[test]
    fn test_absent_state_file_is_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = SessionState::load(&dir.path().join("missing.json"));
        assert_eq!(state.interview_pool.len(), 0);
        assert_eq!(state.general.phase, Phase::Idle);
    }

    #[test]
    fn test_corrupt_state_file_is_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = SessionState::load(&path);
        assert_eq!(state.diary.phase, Phase::Idle);
    }
}
