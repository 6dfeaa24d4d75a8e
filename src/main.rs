//! Event check-in tracker
//!
//! Records attendee sign-ins per team against an advisory capacity, keeps the
//! state in a local SQLite-backed key-value store, and renders a live terminal dashboard.

mod config;
mod db;
mod errors;
mod models;
mod store;
mod ui;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::{LocalStorage, Repository};
use store::{AttendanceStore, UnsavedCheckIn};
use ui::form::{self, FormInput};
use ui::Presenter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging; stdout belongs to the dashboard
    init_tracing(&config);

    tracing::info!("Starting check-in tracker");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Storage key: {}", config.storage_key);
    tracing::info!("Capacity: {}", config.capacity);

    // Initialize storage
    let pool = db::init_database(&config.db_path).await?;
    let repo = Repository::new(pool);

    // Restore before any input is accepted
    let mut store = AttendanceStore::new(repo, config.storage_key.clone(), config.capacity);
    store.restore().await;

    let (redraw_tx, redraw_rx) = mpsc::unbounded_channel();
    let mut presenter = Presenter::new(config.capacity, config.milestone_every, redraw_tx);
    presenter.show_state(store.state(), store.view()).await;

    let stdin = BufReader::new(tokio::io::stdin());
    let result = run(&mut store, &mut presenter, stdin, redraw_rx).await;

    presenter.shutdown();
    tracing::info!("Check-in tracker stopped");
    result.map_err(Into::into)
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Process form input one line at a time until EOF or `/quit`.
///
/// Storage failures are logged and the session goes on with the in-memory state.
/// Lines that are not valid UTF-8 are skipped.
async fn run<S, R>(
    store: &mut AttendanceStore<S>,
    presenter: &mut Presenter,
    mut input: R,
    mut redraw_rx: mpsc::UnboundedReceiver<()>,
) -> Result<(), errors::AppError>
where
    S: LocalStorage,
    R: AsyncBufRead + Unpin,
{
    draw(presenter).await;

    // Kept across iterations: a cancelled read leaves its partial line here
    let mut buf = Vec::new();
    loop {
        tokio::select! {
            read = input.read_until(b'\n', &mut buf) => {
                if read? == 0 {
                    break;
                }
                let line = match String::from_utf8(std::mem::take(&mut buf)) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(
                            "Skipping input line that is not valid UTF-8: {:?}",
                            String::from_utf8_lossy(e.as_bytes())
                        );
                        continue;
                    }
                };
                match form::parse_line(&line) {
                    FormInput::Submit(request) => {
                        let record = match store.check_in(request).await {
                            Ok(record) => record,
                            Err(UnsavedCheckIn { record, error }) => {
                                tracing::error!(
                                    "Check-in of '{}' was not saved: {}",
                                    record.name,
                                    error
                                );
                                record
                            }
                        };
                        presenter.on_check_in(&record, store.view()).await;
                    }
                    FormInput::Clear => match store.clear().await {
                        Ok(()) => {
                            store.reset();
                            presenter.show_state(store.state(), store.view()).await;
                        }
                        Err(e) => {
                            tracing::error!("Saved attendance data was not cleared: {}", e)
                        }
                    },
                    FormInput::Quit => break,
                    FormInput::Blank => continue,
                }
                draw(presenter).await;
            }
            Some(()) = redraw_rx.recv() => {
                // Effects often fire together; one redraw covers them all
                while redraw_rx.try_recv().is_ok() {}
                draw(presenter).await;
            }
        }
    }

    Ok(())
}

/// Repaint the whole screen with the dashboard and the input prompt.
async fn draw(presenter: &Presenter) {
    print!("\x1b[2J\x1b[H");
    println!("{}", presenter.render().await);
    println!("{}", form::prompt());
}
