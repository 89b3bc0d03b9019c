use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "duewatch",
    version,
    about = "Countdown dashboard for a TaskWarrior task feed"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// TOML file to read instead of the default location.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// URL of the task feed.
    #[arg(long = "endpoint")]
    pub endpoint: Option<String>,

    /// IANA timezone used for due dates, e.g. Europe/Madrid.
    #[arg(long = "timezone")]
    pub timezone: Option<String>,

    #[arg(long = "refresh-ms")]
    pub refresh_ms: Option<u64>,

    /// Keep redrawing the countdowns until interrupted.
    #[arg(short = 'w', long = "watch")]
    pub watch: bool,

    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl GlobalCli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            timezone: self.timezone.clone(),
            refresh_interval_ms: self.refresh_ms,
        }
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::GlobalCli;

    #[test]
    fn parses_watch_invocation() {
        let cli = GlobalCli::parse_from([
            "duewatch",
            "-vv",
            "--watch",
            "--endpoint",
            "http://tasks.local/tasks",
            "--refresh-ms",
            "500",
        ]);

        assert_eq!(cli.verbose, 2);
        assert!(cli.watch);
        let overrides = cli.overrides();
        assert_eq!(
            overrides.endpoint.as_deref(),
            Some("http://tasks.local/tasks")
        );
        assert_eq!(overrides.refresh_interval_ms, Some(500));
        assert_eq!(overrides.timezone, None);
    }
}
