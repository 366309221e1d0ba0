use std::path::PathBuf;

use clap::Parser;

/// Default number of simulation ticks in headless mode.
pub const DEFAULT_TICKS: u64 = 20;

/// Simulated microgrid dashboard.
///
/// Without `--tui`, runs headless on virtual time and prints one line per
/// simulation tick.
#[derive(Debug, Parser)]
#[command(name = "microgrid-dash", version, about, long_about = None)]
pub struct Cli {
    /// Load parameters from a TOML config file
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (default, overcast, calm)
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Launch the interactive terminal dashboard
    #[arg(long)]
    pub tui: bool,

    /// Number of simulation ticks to run headless
    #[arg(long, default_value_t = DEFAULT_TICKS, conflicts_with = "tui")]
    pub ticks: u64,

    /// Hour of day the run starts at (defaults to the local clock)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub start_hour: Option<u32>,

    /// Emit one JSON object per tick instead of text
    #[arg(long, conflicts_with = "tui")]
    pub json: bool,

    /// Merge a partial snapshot from a JSON file before the first tick
    #[arg(long, value_name = "FILE")]
    pub apply: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_headless() {
        let cli = Cli::try_parse_from(["microgrid-dash"]).unwrap();
        assert!(!cli.tui);
        assert_eq!(cli.ticks, DEFAULT_TICKS);
        assert!(cli.preset.is_none());
    }

    #[test]
    fn supports_preset_and_seed() {
        let cli =
            Cli::try_parse_from(["microgrid-dash", "--preset", "calm", "--seed", "7"]).unwrap();
        assert_eq!(cli.preset.as_deref(), Some("calm"));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let err = Cli::try_parse_from([
            "microgrid-dash",
            "--config",
            "a.toml",
            "--preset",
            "calm",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn start_hour_is_range_checked() {
        assert!(Cli::try_parse_from(["microgrid-dash", "--start-hour", "24"]).is_err());
        let cli = Cli::try_parse_from(["microgrid-dash", "--start-hour", "6"]).unwrap();
        assert_eq!(cli.start_hour, Some(6));
    }
}
