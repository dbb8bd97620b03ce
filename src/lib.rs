pub mod app;
pub mod clock;
pub mod commands;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod format;
pub mod platform;
pub mod state;
pub mod stopwatch;
pub mod style;
pub mod terminal;
pub mod tick;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
