//! Main CLI parser and top-level argument handling.
//!
//! Connection options are global so they can follow any subcommand, and each
//! one falls back to a `BOXLINK_*` environment variable (a `.env` file is
//! loaded before parsing).

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for watching and controlling an audio box.
#[derive(Debug, Parser)]
#[command(name = "boxlink")]
#[command(about = "Watch and control an audio box through its live status stream")]
#[command(version)]
pub struct Cli {
    /// Base URL of the box (development fallback when not served from it)
    #[arg(long = "base-url", env = "BOXLINK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// "yes" when running on the box itself; selects --origin as base URL
    #[arg(long = "served-from-box", env = "BOXLINK_SERVED_FROM_BOX", global = true)]
    pub served_from_box: Option<String>,

    /// Origin of the box when served from it
    #[arg(long = "origin", env = "BOXLINK_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Event type that carries status snapshots
    #[arg(long = "event-name", env = "BOXLINK_EVENT_NAME", global = true)]
    pub event_name: Option<String>,

    /// Stream endpoint path relative to the base URL
    #[arg(long = "events-path", env = "BOXLINK_EVENTS_PATH", global = true)]
    pub events_path: Option<String>,

    /// Liveness window in milliseconds
    #[arg(
        long = "liveness-timeout-ms",
        env = "BOXLINK_LIVENESS_TIMEOUT_MS",
        global = true
    )]
    pub liveness_timeout_ms: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "boxlink",
            "watch",
            "--verbose",
            "--base-url",
            "http://10.0.0.7",
            "--liveness-timeout-ms",
            "3000",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.7"));
        assert_eq!(cli.liveness_timeout_ms, Some(3000));
        assert!(matches!(cli.command, Some(Commands::Watch { json: false })));
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::parse_from(["boxlink", "watch", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Watch { json: true })));

        let cli = Cli::parse_from(["boxlink", "powerdown"]);
        assert!(matches!(cli.command, Some(Commands::Powerdown)));

        let cli = Cli::parse_from(["boxlink", "stop-wifi"]);
        assert!(matches!(cli.command, Some(Commands::StopWifi)));
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        let result = Cli::try_parse_from(["boxlink", "--liveness-timeout-ms", "soon", "watch"]);
        assert!(result.is_err());
    }
}
