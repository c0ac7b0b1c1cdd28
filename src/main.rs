//! # Glint - Cheap Syntax Highlighting
//!
//! Tokenizes a source file line by line and prints the classified spans.
//!
//! ## Quick Start
//!
//! ```bash
//! # Highlight a file using the bundled syntax rules
//! cargo run -- src/main.rs
//!
//! # Force a language and print JSON
//! cargo run -- --language c --json notes.txt
//!
//! # List available languages
//! cargo run -- --list-languages
//! ```

mod output;
mod settings;

use anyhow::Context;
use clap::Parser;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use glint_profile::{LanguageProfile, ProfileRegistry, TokenClass};
use glint_tokenizer::{ContinuationState, Token, TokenizedLine, tokenize_line};

use output::Format;
use settings::Settings;

/// Glint - a data-driven syntax highlighter
#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to highlight
    #[arg(value_name = "FILE", required_unless_present = "list_languages")]
    file: Option<PathBuf>,

    /// Syntax file with language rule tables
    #[arg(short, long, value_name = "PATH")]
    syntax: Option<PathBuf>,

    /// Language to use instead of detecting it from the extension
    #[arg(short, long, value_name = "NAME")]
    language: Option<String>,

    /// Print one JSON object per line
    #[arg(long)]
    json: bool,

    /// List the languages in the syntax file and exit
    #[arg(long)]
    list_languages: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn load_registry(syntax_file: Option<&Path>) -> anyhow::Result<ProfileRegistry> {
    match syntax_file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read syntax file {}", path.display()))?;
            ProfileRegistry::from_toml_str(&source)
                .with_context(|| format!("Invalid syntax file {}", path.display()))
        }
        None => ProfileRegistry::builtin().context("Invalid bundled syntax file"),
    }
}

/// Picks the profile for `file`. `None` means the file is shown unhighlighted.
fn select_profile(
    registry: &ProfileRegistry,
    language: Option<&str>,
    settings: &Settings,
    file: &Path,
) -> anyhow::Result<Option<Arc<LanguageProfile>>> {
    if let Some(name) = language {
        let profile = registry
            .get(name)
            .with_context(|| format!("Unknown language: {}", name))?;
        return Ok(Some(profile));
    }

    let profile = registry.lookup_path(file).or_else(|| {
        settings
            .default_language
            .as_deref()
            .and_then(|name| registry.get(name))
    });

    if profile.is_none() {
        tracing::warn!("No syntax for {}, showing plain text", file.display());
    }
    Ok(profile)
}

/// Result for a line when no profile applies.
fn plain_line(text: &str) -> TokenizedLine {
    let tokens = if text.is_empty() {
        Vec::new()
    } else {
        vec![Token::new(TokenClass::Plain, 0, text.len())]
    };

    TokenizedLine {
        tokens,
        ..Default::default()
    }
}

fn list_languages(registry: &ProfileRegistry) {
    for name in registry.names() {
        let extensions = registry
            .get(name)
            .map(|profile| profile.extensions().join(", "))
            .unwrap_or_default();
        println!("{}: {}", name, extensions);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::load();
    let syntax_file = args.syntax.as_deref().or(settings.syntax_file.as_deref());
    let registry = load_registry(syntax_file)?;
    tracing::info!("Loaded {} languages", registry.len());

    if args.list_languages {
        list_languages(&registry);
        return Ok(());
    }

    let file = args.file.context("No input file given")?;
    let profile = select_profile(&registry, args.language.as_deref(), &settings, &file)?;
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let format = if args.json { Format::Json } else { Format::Text };
    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut state = ContinuationState::None;

    for (index, line) in text.lines().enumerate() {
        let result = match &profile {
            Some(profile) => tokenize_line(profile, line, state),
            None => plain_line(line),
        };
        output::write_line(&mut out, format, index + 1, line, &result, settings.show_plain)?;
        state = result.outgoing;
    }

    out.flush()?;
    Ok(())
}
