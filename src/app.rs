//! The interactive event loop: one task that either refreshes the display
//! on a tick or handles a command line, never both at once.

use crate::clock::Clock;
use crate::controller::{ActionState, Controller, TimeDisplay};
use crate::edit::TimeFields;
use crate::error::CommandError;
use crate::tick::Ticker;
use anyhow::{Context, Result};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartPause,
    Reset,
    Edit(TimeFields),
    ToggleMilliseconds,
    ToggleFullFormat,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            // 0 and 1 mirror the keypad shortcuts
            "s" | "start" | "pause" | "0" => Command::StartPause,
            "r" | "reset" | "1" => Command::Reset,
            "e" | "edit" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingTime);
                }
                Command::Edit(rest.parse()?)
            }
            "m" | "ms" => Command::ToggleMilliseconds,
            "f" | "full" => Command::ToggleFullFormat,
            "?" | "h" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };

        Ok(command)
    }
}

/// Applies a command. `Quit` is handled by the loop and ignored here.
pub fn apply<C: Clock, D: TimeDisplay>(
    controller: &mut Controller<C, D>,
    command: Command,
) -> Result<(), CommandError> {
    match command {
        Command::StartPause => controller.start_pause(),
        Command::Reset => controller.reset(),
        Command::Edit(fields) => controller.edit_time(fields)?,
        Command::ToggleMilliseconds => controller.toggle_show_milliseconds(),
        Command::ToggleFullFormat => controller.toggle_show_full_format(),
        Command::Help => {
            let menu = help_text(&controller.actions());
            controller.notify(&menu);
        }
        Command::Quit => {}
    }
    Ok(())
}

pub fn help_text(actions: &[ActionState]) -> String {
    actions
        .iter()
        .map(|action| {
            let check = match action.checked {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "",
            };
            let disabled = if action.enabled { "" } else { " (disabled)" };
            format!("  {:<10} {}{}{}", action.shortcut, check, action.label, disabled)
        })
        .chain(std::iter::once(format!("  {:<10} Quit", "q")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs until `quit`, end of input or `shutdown` resolves, and hands the
/// controller back so the caller can persist it. The ticker is active
/// exactly while the timer runs.
pub async fn run<C, D, R, S>(
    mut controller: Controller<C, D>,
    input: R,
    mut ticker: Ticker,
    shutdown: S,
) -> Result<Controller<C, D>>
where
    C: Clock,
    D: TimeDisplay,
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        ticker.sync(controller.is_running());

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read command")? else {
                    tracing::debug!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = apply(&mut controller, command) {
                            tracing::debug!("Command rejected: {}", e);
                            controller.notify(&e.to_string());
                        }
                    }
                    Err(e) => controller.notify(&e.to_string()),
                }
            }
            _ = ticker.tick() => controller.tick(),
        }
    }

    ticker.sync(false);
    Ok(controller)
}
