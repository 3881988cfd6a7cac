//! Terminal front end.
//!
//! A line-oriented view over [`AppController`](bookscout::AppController). Each
//! input line is one user action:
//!
//! - any plain text: the new content of the search field (debounced)
//! - `/search <text>`: search immediately
//! - `:more`: load the next page
//! - `:fav <n>`: toggle favorite on result `n`
//! - `:favs`: list favorites
//! - `:q`: quit
//!
//! # Usage
//!
//! ```text
//! bookscout [--config <file.toml>] [key=value ...]
//! ```
//!
//! `key=value` pairs override the configuration file, e.g. `page_size=10`.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use bookscout::observability::init_tracing;
use bookscout::ui::{compute_viewmodel, favorites_viewmodel, render};
use bookscout::{BookscoutError, Config, ControllerHandle, Result, ViewChannels};

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    config_file: Option<PathBuf>,
    overrides: BTreeMap<String, String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg == "--config" {
                let path = args
                    .next()
                    .ok_or_else(|| BookscoutError::Config("--config needs a path".to_string()))?;
                parsed.config_file = Some(PathBuf::from(path));
            } else if let Some((key, value)) = arg.split_once('=') {
                parsed.overrides.insert(key.to_string(), value.to_string());
            } else {
                return Err(BookscoutError::Config(format!("unexpected argument `{arg}`")));
            }
        }
        Ok(parsed)
    }

    fn load_config(&self) -> Result<Config> {
        let base = match &self.config_file {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        Ok(base.with_overrides(&self.overrides))
    }
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Type(String),
    Submit(String),
    More,
    Favorite(usize),
    Favorites,
    Quit,
    Unknown(String),
}

impl Line {
    fn parse(line: &str) -> Self {
        let search = line
            .strip_prefix("/search")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '));
        if let Some(text) = search {
            return Self::Submit(text.trim().to_string());
        }

        let Some(command) = line.strip_prefix(':') else {
            return Self::Type(line.to_string());
        };

        match command.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["more"] => Self::More,
            ["favs"] => Self::Favorites,
            ["q" | "quit"] => Self::Quit,
            ["fav", n] => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map_or_else(|| Self::Unknown(line.to_string()), Self::Favorite),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bookscout: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Args::parse(std::env::args().skip(1))?.load_config()?;
    init_tracing(&config);

    let (controller, handle, mut channels) = bookscout::initialize(&config)?;
    let controller_task = tokio::spawn(controller.run());

    let mut query = config.initial_query.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show_results(query.as_deref(), &channels)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Line::parse(line.trim_end()) {
                    Line::Type(text) => {
                        query = Some(text.clone());
                        handle.search(text)?;
                    }
                    Line::Submit(text) => {
                        query = Some(text.clone());
                        handle.submit(text)?;
                    }
                    Line::More => handle.load_more()?,
                    Line::Favorite(n) => toggle(&handle, &channels, n)?,
                    Line::Favorites => {
                        let favorites = channels.favorites.borrow().clone();
                        render(&favorites_viewmodel(&favorites), &mut std::io::stdout().lock())?;
                    }
                    Line::Quit => break,
                    Line::Unknown(text) => eprintln!("unknown command: {text}"),
                }
            }
            Ok(()) = channels.results.changed() => show_results(query.as_deref(), &channels)?,
            Ok(()) = channels.error.changed() => show_results(query.as_deref(), &channels)?,
        }
    }

    handle.shutdown()?;
    if let Err(e) = controller_task.await {
        tracing::warn!(error = %e, "controller task ended abnormally");
    }
    Ok(())
}

fn show_results(query: Option<&str>, channels: &ViewChannels) -> Result<()> {
    let results = channels.results.borrow().clone();
    let error = channels.error.borrow().clone();
    let vm = compute_viewmodel(query, results.as_deref(), error.as_deref());
    render(&vm, &mut std::io::stdout().lock())?;
    Ok(())
}

fn toggle(handle: &ControllerHandle, channels: &ViewChannels, position: usize) -> Result<()> {
    let record = channels
        .results
        .borrow()
        .as_ref()
        .and_then(|results| results.get(position - 1).cloned());

    match record {
        Some(record) => handle.toggle_favorite(record),
        None => {
            eprintln!("no result #{position}");
            Ok(())
        }
    }
}
