//! Terminal front end for the task list.
//!
//! Reads one command per line from stdin and prints the list after every
//! change. Logs go to stderr so they never interleave with the list.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tasklist_core::environment::{SystemClock, UuidGenerator};
use tasklist_runtime::StoreConfig;
use todo::command::{Command, HELP};
use todo::surface::{HtmlFileSurface, TerminalSurface};
use todo::{App, AppError, Config, FileStore, TodoEnvironment, TodoRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();

    tracing::info!(storage = %config.storage_path.display(), "Starting task list");

    let mut app = build_app(&config);
    app.render().context("Failed to draw the initial view")?;

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;

        match Command::parse(&line) {
            Ok(None) => {},
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Show)) => app.render()?,
            Ok(Some(command)) => match command.into_events(&app.view()) {
                Ok(events) => absorb_store_errors(app.dispatch_all(events))?,
                Err(error) => eprintln!("{error}"),
            },
            Err(error) => eprintln!("{error}\nType 'help' for a list of commands."),
        }

        prompt()?;
    }

    tracing::info!("Goodbye");
    Ok(())
}

fn build_app(config: &Config) -> App {
    let mut store = FileStore::new(&config.storage_path);
    if let Some(quota) = config.storage_quota_bytes {
        store = store.with_quota(quota);
    }

    let environment = TodoEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
        TodoRepository::new(Arc::new(store)),
    );
    let store_config =
        StoreConfig::default().with_max_feedback_actions(config.max_feedback_actions);

    let app = App::new(environment, store_config)
        .with_surface(Box::new(TerminalSurface::new(io::stdout())));

    match &config.html_output {
        Some(path) => {
            tracing::info!(path = %path.display(), "Writing HTML view");
            app.with_surface(Box::new(HtmlFileSurface::new(path)))
        },
        None => app,
    }
}

/// A rejected action is reported and the session goes on; output failures end it
fn absorb_store_errors(result: Result<(), AppError>) -> anyhow::Result<()> {
    match result {
        Err(AppError::Store(error)) => {
            tracing::error!(%error, "Action rejected");
            Ok(())
        },
        other => other.map_err(Into::into),
    }
}

fn prompt() -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ").context("Failed to write prompt")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
