//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::{services::PowerAction, settings::ScheduleSettings, state::ScheduleRequest};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "sleep-scheduler")]
#[command(about = "Put this machine to sleep or hibernation after a countdown")]
#[command(version)]
pub struct Config {
    /// Delay before the action fires, in seconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub duration: Option<i64>,

    /// Power action to perform when the countdown ends
    #[arg(short, long, value_enum)]
    pub action: Option<PowerAction>,

    /// File holding the last-used duration and action
    #[arg(long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Log the action instead of suspending the host
    #[arg(long)]
    pub dry_run: bool,

    /// Print events as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Combine CLI values with the saved record; the CLI wins
    pub fn request(&self, saved: Option<&ScheduleSettings>) -> Option<ScheduleRequest> {
        let duration = self
            .duration
            .or_else(|| saved.map(|s| s.to_request().duration_seconds))?;
        let action = self
            .action
            .or_else(|| saved.map(|s| s.action))
            .unwrap_or_default();
        Some(ScheduleRequest::new(duration, action))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("sleep-scheduler").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_values_override_saved_settings() {
        let config = parse(&["-d", "90", "-a", "hibernate"]);
        let saved = ScheduleSettings::new(10, PowerAction::Sleep);
        assert_eq!(
            config.request(Some(&saved)),
            Some(ScheduleRequest::new(90, PowerAction::Hibernate))
        );
    }

    #[test]
    fn saved_settings_fill_missing_values() {
        let config = parse(&["--action", "sleep"]);
        let saved = ScheduleSettings::new(600, PowerAction::Hibernate);
        assert_eq!(
            config.request(Some(&saved)),
            Some(ScheduleRequest::new(600, PowerAction::Sleep))
        );
    }

    #[test]
    fn sleep_is_the_default_action() {
        assert_eq!(parse(&["-d", "5"]).request(None), Some(ScheduleRequest::new(5, PowerAction::Sleep)));
    }

    #[test]
    fn no_duration_anywhere_yields_no_request() {
        assert_eq!(parse(&[]).request(None), None);
    }

    #[test]
    fn negative_durations_reach_validation() {
        assert_eq!(parse(&["--duration", "-3"]).duration, Some(-3));
    }

    #[test]
    fn verbose_switches_log_level() {
        assert_eq!(parse(&["-v"]).log_level(), "debug");
        assert_eq!(parse(&[]).log_level(), "info");
        assert_eq!(parse(&[]).settings, PathBuf::from("settings.json"));
    }
}
