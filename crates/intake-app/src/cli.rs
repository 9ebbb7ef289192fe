use std::path::PathBuf;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use intake_telemetry::LogFormat;

/// Reads records from stdin when passed as `--records`.
pub const STDIN_MARKER: &str = "-";
const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Arguments for a single intake run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "intake",
    about = "Rename newly uploaded objects and notify their downstream consumers"
)]
pub struct Cli {
    /// Notification document to process, or `-` for stdin.
    #[arg(long, env = "INTAKE_RECORDS", default_value = STDIN_MARKER)]
    pub records: String,
    /// Directory backing the local container.
    #[arg(long, env = "INTAKE_ROOT")]
    pub root: PathBuf,
    /// Records processed in parallel.
    #[arg(
        long,
        env = "INTAKE_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,
    /// Seconds to wait for a downstream webhook to answer.
    #[arg(
        long,
        env = "INTAKE_NOTIFY_TIMEOUT_SECS",
        default_value_t = DEFAULT_NOTIFY_TIMEOUT_SECS
    )]
    pub notify_timeout_secs: u64,
    /// Log output format: `json` or `pretty`.
    #[arg(long, env = "INTAKE_LOG_FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
    /// Write batch metrics in Prometheus text format to this file after the run.
    #[arg(long, env = "INTAKE_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,
}

impl Cli {
    /// Records path, or `None` when reading from stdin.
    #[must_use]
    pub fn records_path(&self) -> Option<PathBuf> {
        (self.records != STDIN_MARKER).then(|| PathBuf::from(&self.records))
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value).ok_or_else(|| format!("unknown log format '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["intake", "--root", "/data"])?;
        assert_eq!(cli.records, STDIN_MARKER);
        assert_eq!(cli.records_path(), None);
        assert_eq!(cli.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(cli.notify_timeout_secs, DEFAULT_NOTIFY_TIMEOUT_SECS);
        assert_eq!(cli.root, PathBuf::from("/data"));
        assert_eq!(cli.metrics_file, None);
        Ok(())
    }

    #[test]
    fn explicit_values_parse() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "intake",
            "--root",
            "/data",
            "--records",
            "batch.json",
            "--concurrency",
            "2",
            "--log-format",
            "json",
            "--metrics-file",
            "metrics.prom",
        ])?;
        assert_eq!(cli.records_path(), Some(PathBuf::from("batch.json")));
        assert_eq!(cli.concurrency, 2);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.metrics_file, Some(PathBuf::from("metrics.prom")));
        Ok(())
    }

    #[test]
    fn rejects_zero_concurrency_and_unknown_format() {
        assert!(Cli::try_parse_from(["intake", "--root", "/d", "--concurrency", "0"]).is_err());
        assert!(Cli::try_parse_from(["intake", "--root", "/d", "--log-format", "xml"]).is_err());
    }
}
