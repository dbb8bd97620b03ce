use crate::OutputFormat;
use crate::app;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::controller::{Controller, RecordingDisplay};
use crate::edit::TimeFields;
use crate::format::DisplayOptions;
use crate::platform::StatePaths;
use crate::state::{Session, with_session_lock};
use crate::style::LabelStyle;
use crate::terminal::TerminalDisplay;
use crate::tick::Ticker;
use anyhow::{Context, Result};
use serde_json::json;
use std::io;
use tokio::io::BufReader;

/// Interactive stopwatch on the current terminal.
pub fn run(paths: &StatePaths, config: &Config) -> Result<()> {
    let session = Session::load(&paths.session)?;

    let style = LabelStyle::load(&config.style.path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring stylesheet: {:#}", e);
        None
    });

    println!("ptimer: s start/pause, r reset, e <time> edit, ? help, q quit");

    let display = TerminalDisplay::new(io::stdout(), style);
    let controller = Controller::from_session(&session, SystemClock, display);
    let ticker = Ticker::new(config.display.tick_interval());

    tracing::info!(
        saved = %controller.label(),
        tick = ?ticker.period(),
        "Starting interactive timer"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let controller = runtime.block_on(app::run(
        controller,
        BufReader::new(tokio::io::stdin()),
        ticker,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        },
    ));
    // stdin may still be blocked in a read that would hold a normal drop
    runtime.shutdown_background();
    let controller = controller?;

    println!();

    with_session_lock(&paths.lock, &paths.session, |stored| {
        controller.persist(stored);
        Ok(())
    })?;

    tracing::info!(saved = %controller.label(), "Session saved");
    Ok(())
}

/// Prints the saved time using the saved display options.
pub fn show(paths: &StatePaths, output: OutputFormat) -> Result<()> {
    let session = Session::load(&paths.session)?;
    let options = session.display_options();
    let label = options.format(session.saved_time());

    match output {
        OutputFormat::Text => println!("{}", label),
        OutputFormat::Json => {
            let value = json!({
                "time": label,
                "saved_seconds": session.saved_seconds,
                "options": options,
                "updated_at": session.updated_at,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

/// Overwrites the saved time.
pub fn set(paths: &StatePaths, fields: TimeFields) -> Result<()> {
    let label = with_session_lock(&paths.lock, &paths.session, |session| {
        let mut controller =
            Controller::from_session(session, SystemClock, RecordingDisplay::default());
        controller.edit_time(fields)?;
        controller.persist(session);
        Ok(controller.label())
    })?;

    println!("✓ Time set to {}", label);
    Ok(())
}

/// Zeroes the saved time.
pub fn reset(paths: &StatePaths) -> Result<()> {
    let label = with_session_lock(&paths.lock, &paths.session, |session| {
        let mut controller =
            Controller::from_session(session, SystemClock, RecordingDisplay::default());
        controller.reset();
        controller.persist(session);
        Ok(controller.label())
    })?;

    println!("✓ Timer reset to {}", label);
    Ok(())
}

/// Shows the display options, changing any that were given.
pub fn options(
    paths: &StatePaths,
    show_milliseconds: Option<bool>,
    show_full_format: Option<bool>,
    output: OutputFormat,
) -> Result<()> {
    let options = if show_milliseconds.is_none() && show_full_format.is_none() {
        Session::load(&paths.session)?.display_options()
    } else {
        with_session_lock(&paths.lock, &paths.session, |session| {
            let current = session.display_options();
            let updated = DisplayOptions {
                show_milliseconds: show_milliseconds.unwrap_or(current.show_milliseconds),
                show_full_format: show_full_format.unwrap_or(current.show_full_format),
            };
            session.set_display_options(updated);
            Ok(updated)
        })?
    };

    match output {
        OutputFormat::Text => {
            println!("show_milliseconds = {}", options.show_milliseconds);
            println!("show_full_format = {}", options.show_full_format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
    }
    Ok(())
}
