//! Command handlers for starctl.
//!
//! Each handler is one synchronous request: load session state, apply the
//! action, save state, render. Backend and storage failures are rendered
//! here at the action boundary and leave the saved state untouched, so
//! the user can re-trigger the same action.

use anyhow::{Context, Result};
use star_common::answer_store::{AnswerStore, CsvAnswerTable};
use star_common::config::StarConfig;
use star_common::generator::QuestionGenerator;
use star_common::llm::TextGenClient;
use star_common::paths;
use star_common::question_bank::QuestionBank;
use star_common::session::{Mode, SessionState};
use star_common::StarError;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::display;

/// Everything one request needs: config, resolved paths, loaded state.
struct App {
    config: StarConfig,
    data_dir: PathBuf,
    state_path: PathBuf,
    state: SessionState,
}

impl App {
    fn open() -> Result<Self> {
        let config = StarConfig::load()?;
        let data_dir = config.storage.resolve_data_dir();
        let state_path = paths::session_state_path();
        let state = SessionState::load(&state_path);
        Ok(Self {
            config,
            data_dir,
            state_path,
            state,
        })
    }

    fn bank(&self) -> QuestionBank {
        QuestionBank::new(&self.data_dir)
    }

    fn store(&self) -> AnswerStore<CsvAnswerTable> {
        AnswerStore::new(CsvAnswerTable::new(&self.data_dir))
    }

    fn client(&self) -> Result<TextGenClient, StarError> {
        TextGenClient::from_settings(&self.config.llm)
    }

    fn save_state(&mut self) -> Result<()> {
        self.state.save(&self.state_path)
    }
}

/// Draw a random question from the general pool.
pub fn question() -> Result<()> {
    let mut app = App::open()?;
    let pool = app.bank().load_general();

    if pool.is_empty() {
        display::notice(
            "No general questions available. Add star_questions.csv to the data directory.",
        );
        return Ok(());
    }

    if let Some(index) = app.state.general.show_random(pool.len()) {
        app.save_state()?;
        display::question(&pool[index]);
    }
    Ok(())
}

/// Generate an interview pool from a job description.
pub fn generate(file: Option<PathBuf>) -> Result<()> {
    let mut app = App::open()?;
    let text = read_text(file.as_deref())?;

    let client = match app.client() {
        Ok(client) => client,
        Err(e) => {
            display::error(&e);
            return Ok(());
        }
    };

    let bank = app.bank();
    let generator = QuestionGenerator::new(&client, &bank, app.config.questions.strict_dedup);

    match generator.generate_from_job_description(&text) {
        Ok(pool) => {
            let count = pool.len();
            app.state.install_interview_pool(pool);
            app.save_state()?;
            display::success(&format!(
                "Generated interview pool with {} questions.",
                count
            ));
            if let Some(q) = app.state.interview_question() {
                display::question(q);
            }
        }
        Err(e) => display::error(&e),
    }
    Ok(())
}

/// Submit an answer draft for rewriting.
pub fn submit(mode: Mode, text: Option<String>) -> Result<()> {
    let mut app = App::open()?;
    let draft = match text {
        Some(text) => text,
        None => read_stdin()?,
    };

    // Resolve the question key for the mode. Diary has no question at all.
    let question: Option<String> = match mode {
        Mode::Diary => None,
        Mode::General => {
            let pool = app.bank().load_general();
            match app.state.general.question(&pool) {
                Some(q) => Some(q.to_string()),
                None => {
                    display::notice("No active general question. Run `starctl question` first.");
                    return Ok(());
                }
            }
        }
        Mode::Interview => match app.state.interview_question() {
            Some(q) => Some(q.to_string()),
            None => {
                display::notice("No interview pool. Run `starctl generate` first.");
                return Ok(());
            }
        },
    };

    let client = match app.client() {
        Ok(client) => client,
        Err(e) => {
            display::error(&e);
            return Ok(());
        }
    };

    app.state.cursor_mut(mode).begin_submit(&draft);

    // Diary rewrites are never cached: there is no question key to cache
    // under. The other modes go through the answer store.
    let outcome = match &question {
        None => client
            .rewrite(&draft, None)
            .and_then(|r| r.ok_or(StarError::GenerationFailed))
            .map(|text| (text, None)),
        Some(q) => {
            let store = app.store();
            store
                .get_or_compute(q, &draft, |d| client.rewrite(d, Some(q.as_str())))
                .map(|(text, source)| (text, Some(source)))
        }
    };

    match outcome {
        Ok((rewritten, source)) => {
            app.state.cursor_mut(mode).finish_submit();
            app.save_state()?;
            if let Some(q) = &question {
                display::question(q);
            }
            display::result(&rewritten, source);
        }
        Err(e) => display::error(&e),
    }
    Ok(())
}

/// Advance to the next interview question, wrapping past the end.
pub fn next() -> Result<()> {
    let mut app = App::open()?;
    let len = app.state.interview_pool.len();

    if len == 0 {
        display::notice("No interview pool. Run `starctl generate` first.");
        return Ok(());
    }

    if let Some(index) = app.state.interview.advance(len) {
        app.save_state()?;
        display::kv("question", &format!("{} of {}", index + 1, len));
        if let Some(q) = app.state.interview_question() {
            display::question(q);
        }
    }
    Ok(())
}

/// Clear the input buffer for a mode.
pub fn clear(mode: Mode) -> Result<()> {
    let mut app = App::open()?;

    let has_question = match mode {
        Mode::Diary => false,
        Mode::General => {
            let pool = app.bank().load_general();
            app.state.general.question(&pool).is_some()
        }
        Mode::Interview => app.state.interview_question().is_some(),
    };

    app.state.cursor_mut(mode).clear(has_question);
    app.save_state()?;
    display::notice(&format!("Cleared {} input.", mode));
    Ok(())
}

/// Show the current question and draft for a mode. This is the render
/// step: it consumes a pending clear flag.
pub fn show(mode: Mode) -> Result<()> {
    let mut app = App::open()?;

    let question: Option<String> = match mode {
        Mode::Diary => None,
        Mode::General => {
            let pool = app.bank().load_general();
            app.state.general.question(&pool).map(str::to_string)
        }
        Mode::Interview => app.state.interview_question().map(str::to_string),
    };

    match (&question, mode) {
        (Some(q), _) => display::question(q),
        (None, Mode::Diary) => {}
        (None, _) => display::notice("No active question."),
    }

    let buffer = app.state.cursor_mut(mode).render_input();
    app.save_state()?;

    if buffer.is_empty() {
        display::kv("draft", "(empty)");
    } else {
        display::kv("draft", &buffer);
    }
    Ok(())
}

/// Show configuration and data overview.
pub fn status() -> Result<()> {
    let app = App::open()?;

    display::header(&format!("starctl v{}", env!("CARGO_PKG_VERSION")));
    display::kv("config", &paths::config_path().display().to_string());
    display::kv("data_dir", &app.data_dir.display().to_string());
    display::kv("backend", &app.config.llm.base_url);
    display::kv("model", &app.config.llm.model);

    let key_present = std::env::var(&app.config.llm.api_key_env)
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    display::kv(
        "api_key",
        &format!(
            "{} ({})",
            app.config.llm.api_key_env,
            if key_present { "set" } else { "missing" }
        ),
    );

    let bank = app.bank();
    display::kv("general_pool", &bank.load_general().len().to_string());
    display::kv(
        "persisted_pools",
        &bank.load_combined_persisted().len().to_string(),
    );

    match app.store().count() {
        Ok(count) => display::kv("cached_answers", &count.to_string()),
        Err(_) => display::kv("cached_answers", "unavailable"),
    }

    let cursor_pos = app
        .state
        .interview
        .current_index
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    display::kv(
        "interview_pool",
        &format!(
            "{} questions (cursor {})",
            app.state.interview_pool.len(),
            cursor_pos
        ),
    );

    if let Some(ts) = app.state.updated_at {
        display::kv("last_activity", &ts.to_rfc3339());
    }
    display::rule();
    Ok(())
}

/// Delete all cached rewritten answers.
pub fn purge(yes: bool) -> Result<()> {
    let app = App::open()?;

    if !yes {
        print!("This will delete all cached rewritten answers. Continue? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Purge cancelled.");
            return Ok(());
        }
    }

    match app.store().purge() {
        Ok(()) => display::success("Answer cache emptied."),
        Err(e) => display::error(&e),
    }
    Ok(())
}

/// Interactive practice loop: draw, answer, advance, without re-running
/// the binary for every step.
pub fn practice(mode: Mode) -> Result<()> {
    display::header("STAR practice");
    println!("Mode: {}. Type an answer to submit it, or a command:", mode);
    if mode == Mode::General {
        println!("  question    - draw a new random question");
    }
    if mode == Mode::Interview {
        println!("  next        - advance to the next question");
    }
    println!("  show        - show the current question and draft");
    println!("  clear       - clear the input buffer");
    println!("  exit, quit  - leave practice");
    println!();

    loop {
        print!("star> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "question" if mode == Mode::General => question()?,
            "next" if mode == Mode::Interview => next()?,
            "show" => show(mode)?,
            "clear" => clear(mode)?,
            _ => submit(mode, Some(input.to_string()))?,
        }
    }
    Ok(())
}

fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => read_stdin(),
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;
    Ok(text)
}
