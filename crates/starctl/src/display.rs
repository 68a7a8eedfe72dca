//! Terminal output helpers for starctl.

use console::style;
use star_common::answer_store::AnswerSource;
use star_common::StarError;

const HR: &str = "──────────────────────────────────────────────";

pub fn header(title: &str) {
    println!();
    println!("{}", style(title).cyan().bold());
    rule();
}

pub fn rule() {
    println!("{}", style(HR).dim());
}

pub fn question(text: &str) {
    println!();
    println!("{}", style("Question").bold());
    println!("  {}", text);
}

pub fn result(text: &str, source: Option<AnswerSource>) {
    let tag = match source {
        Some(AnswerSource::Cached) => " (cached)",
        Some(AnswerSource::Generated) | None => "",
    };
    println!();
    println!("{}{}", style("Rewritten response").bold(), style(tag).dim());
    println!("{}", text);
    println!();
}

/// Render a failure at the action boundary. Session state is untouched;
/// retryable failures say so.
pub fn error(err: &StarError) {
    let hint = if err.is_retryable() {
        " You can retry the same action."
    } else {
        ""
    };
    eprintln!("{} {}{}", style("error:").red().bold(), err, hint);
}

pub fn notice(text: &str) {
    println!("{}", style(text).yellow());
}

pub fn success(text: &str) {
    println!("{} {}", style("ok").green().bold(), text);
}

pub fn kv(key: &str, value: &str) {
    println!("{:width$} {}", key, value, width = 15);
}
