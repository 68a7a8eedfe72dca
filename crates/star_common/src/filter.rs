//! Quality gate for generated question lines.
//!
//! Backends emit preamble, headers, and malformed fragments alongside the
//! questions we asked for. The gate is a heuristic: it neither removes all
//! noise nor keeps every valid question, and pools generated by earlier
//! versions depend on its exact behavior.

/// Strategy deciding whether a generated output line is a usable question.
pub trait QuestionFilter {
    fn keep(&self, line: &str) -> bool;
}

/// Default gate: more than four whitespace-separated tokens AND a literal
/// question mark. Both parts are load-bearing - the token count drops
/// headers like "Questions:" and fragments like "ok?", the mark drops
/// prose preamble.
#[derive(Debug, Default)]
pub struct DefaultQuestionFilter;

impl QuestionFilter for DefaultQuestionFilter {
    fn keep(&self, line: &str) -> bool {
        line.split_whitespace().count() > 4 && line.contains('?')
    }
}

/// Strip enumeration leftovers (dashes, surrounding whitespace) from a raw
/// output line before filtering.
pub fn clean_line(line: &str) -> &str {
    line.trim_matches(|c: char| c == '-' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_real_question() {
        let filter = DefaultQuestionFilter;
        assert!(filter.keep("Tell me about a time you led a team?"));
    }

    #[test]
    fn test_drops_preamble_without_question_mark() {
        let filter = DefaultQuestionFilter;
        assert!(!filter.keep("Sure, here are some questions:"));
    }

    #[test]
    fn test_drops_short_fragment() {
        let filter = DefaultQuestionFilter;
        assert!(!filter.keep("ok?"));
    }

    #[test]
    fn test_five_tokens_required() {
        let filter = DefaultQuestionFilter;
        // exactly four tokens: not enough
        assert!(!filter.keep("Why did you leave?"));
        // five tokens passes
        assert!(filter.keep("Why did you leave there?"));
    }

    #[test]
    fn test_clean_line_strips_bullets() {
        assert_eq!(
            clean_line("- Tell me about a time you led a team?"),
            "Tell me about a time you led a team?"
        );
        assert_eq!(clean_line("  plain text  "), "plain text");
    }
}
