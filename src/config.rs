//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    engine::EngineSettings,
    state::{timer_mode, ModeDurations},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-flow")]
#[command(about = "A background-resilient Pomodoro timer daemon")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work session length in seconds
    #[arg(long, default_value_t = timer_mode::WORK_SECONDS, value_parser = clap::value_parser!(u64).range(1..=timer_mode::MAX_DURATION_SECONDS))]
    pub work_secs: u64,

    /// Short break length in seconds
    #[arg(long, default_value_t = timer_mode::SHORT_BREAK_SECONDS, value_parser = clap::value_parser!(u64).range(1..=timer_mode::MAX_DURATION_SECONDS))]
    pub short_break_secs: u64,

    /// Long break length in seconds
    #[arg(long, default_value_t = timer_mode::LONG_BREAK_SECONDS, value_parser = clap::value_parser!(u64).range(1..=timer_mode::MAX_DURATION_SECONDS))]
    pub long_break_secs: u64,

    /// Interval between reconciliation ticks in milliseconds
    #[arg(long, default_value = "900", value_parser = clap::value_parser!(u64).range(50..))]
    pub tick_ms: u64,

    /// Seconds between wake-up detection samples
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    pub wake_check_secs: u64,

    /// Show a desktop notification when a run completes
    #[arg(long)]
    pub desktop_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Engine settings derived from the CLI
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            durations: ModeDurations {
                work: self.work_secs,
                short_break: self.short_break_secs,
                long_break: self.long_break_secs,
            },
            tick_interval: Duration::from_millis(self.tick_ms),
        }
    }

    pub fn wake_check_interval(&self) -> Duration {
        Duration::from_secs(self.wake_check_secs)
    }
}
