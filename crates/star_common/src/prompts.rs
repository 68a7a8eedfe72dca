//! Prompt assembly for the rewrite and question-generation capabilities.
//!
//! Enforces an input-size cap on pasted job descriptions so a single
//! oversized paste cannot blow the backend's context window.

use tracing::warn;

/// Maximum characters of source text carried into a prompt.
pub const MAX_SOURCE_CHARS: usize = 11_000;

/// Prompt asking the backend to restate an answer in concise STAR form.
/// When the answer was written against a question, the question is
/// included for context.
pub fn rewrite_prompt(answer_text: &str, question: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(q) = question {
        body.push_str(&format!("Question: {}\n", q));
    }
    body.push_str(&format!("Answer: {}", answer_text));

    format!(
        "Please rewrite the following STAR-format answer in more concise and natural English:\n\n{}",
        body
    )
}

/// Prompt asking for behavioral interview questions derived from a job
/// description: one per line, question-mark-terminated, no enumeration
/// markers (the output filter cleans up stragglers anyway).
pub fn question_generation_prompt(job_description: &str) -> String {
    let source = cap_source(job_description);

    format!(
        "Generate 50 simple and clear behavioral interview questions based on the \
         following job description. Each question should be answerable using the \
         STAR format. Write one question per line, ending with a question mark, \
         with no numbering or bullet points.\n\n{}",
        source
    )
}

/// Truncate source text to [`MAX_SOURCE_CHARS`], cutting on a char
/// boundary and logging how much was dropped.
fn cap_source(text: &str) -> &str {
    if text.len() <= MAX_SOURCE_CHARS {
        return text;
    }

    let mut end = MAX_SOURCE_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        dropped_chars = text.len() - end,
        "job description exceeds prompt cap, truncating"
    );
    &text[..end]
}
