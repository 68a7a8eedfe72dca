//! STAR Journal control - terminal front-end for STAR practice.
//!
//! Draw behavioral questions, submit answer drafts for rewriting, and
//! build job-specific interview pools from a pasted job description.

mod commands;
mod display;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use star_common::session::Mode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "starctl")]
#[command(about = "STAR Journal - practice STAR-format behavioral answers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Diary,
    General,
    Interview,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Diary => Mode::Diary,
            ModeArg::General => Mode::General,
            ModeArg::Interview => Mode::Interview,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a random question from the general pool
    Question,

    /// Generate an interview pool from a job description
    Generate {
        /// Job-description text file; read from stdin when omitted
        file: Option<PathBuf>,
    },

    /// Submit an answer draft for rewriting
    Submit {
        /// Practice mode the draft belongs to
        #[arg(long, value_enum)]
        mode: ModeArg,

        /// Draft text; read from stdin when omitted
        text: Option<String>,
    },

    /// Advance to the next interview question
    Next,

    /// Clear the input buffer for a mode
    Clear {
        #[arg(long, value_enum)]
        mode: ModeArg,
    },

    /// Show the current question and draft for a mode
    Show {
        #[arg(long, value_enum)]
        mode: ModeArg,
    },

    /// Interactive practice loop
    Practice {
        #[arg(long, value_enum, default_value = "general")]
        mode: ModeArg,
    },

    /// Show configuration and data overview
    Status,

    /// Delete all cached rewritten answers
    Purge {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Question => commands::question(),
        Commands::Generate { file } => commands::generate(file),
        Commands::Submit { mode, text } => commands::submit(mode.into(), text),
        Commands::Next => commands::next(),
        Commands::Clear { mode } => commands::clear(mode.into()),
        Commands::Show { mode } => commands::show(mode.into()),
        Commands::Practice { mode } => commands::practice(mode.into()),
        Commands::Status => commands::status(),
        Commands::Purge { yes } => commands::purge(yes),
    }
}
