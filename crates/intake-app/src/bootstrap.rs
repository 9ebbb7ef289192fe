use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use intake_config::{IntakeConfiguration, container_from_env};
use intake_core::{IntakeEngine, StorageGateway, SystemClock};
use intake_fsops::LocalStorageGateway;
use intake_notify::WebhookNotifier;
use intake_telemetry::{GlobalContextGuard, LoggingConfig, Metrics};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::dispatch::{BatchReport, run_batch};
use crate::error::{AppError, AppResult};
use crate::records::parse_records;

/// Dependencies required to run one batch.
pub struct BootstrapDependencies {
    cli: Cli,
    config: IntakeConfiguration,
    container: Option<String>,
    metrics: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from parsed arguments and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingEnv`] when `INTAKE_PATHS` is unset, and configuration or
    /// telemetry errors when those cannot be initialised.
    pub fn from_env(cli: Cli) -> AppResult<Self> {
        let config = IntakeConfiguration::from_env()
            .map_err(|err| AppError::config("intake_configuration.from_env", err))?;
        Self::new(cli, config, container_from_env())
    }

    /// Assemble dependencies from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] for a zero concurrency and telemetry errors when
    /// the metrics registry cannot be built.
    pub fn new(
        cli: Cli,
        config: IntakeConfiguration,
        container: Option<String>,
    ) -> AppResult<Self> {
        if cli.concurrency == 0 {
            return Err(AppError::InvalidConfig {
                field: "concurrency",
                reason: "must_be_positive",
                value: Some(cli.concurrency.to_string()),
            });
        }
        let metrics = Metrics::new().map_err(|err| AppError::telemetry("metrics.new", err))?;
        Ok(Self {
            cli,
            config,
            container,
            metrics,
        })
    }

    /// Metrics registry shared with the batch run.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Entry point for the intake binary: parse arguments, run one batch, print the report.
///
/// # Errors
///
/// Returns an error if bootstrap fails, the batch cannot be read, or the report cannot be
/// written. Individual record failures are reported in the output instead.
pub async fn run_app() -> AppResult<()> {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        format: cli.log_format.unwrap_or_else(intake_telemetry::LogFormat::infer),
        ..LoggingConfig::default()
    };
    intake_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("batch");

    let dependencies = BootstrapDependencies::from_env(cli)?;
    let report = run_app_with(&dependencies).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)
        .map_err(|source| AppError::Report { source })?;
    writeln!(stdout).map_err(|err| AppError::io("write_report", None, err))?;
    Ok(())
}

/// Run one batch using injected dependencies.
///
/// # Errors
///
/// Returns an error if the container cannot be opened, the notifier cannot be built, the
/// notification document cannot be read or decoded, or the metrics file cannot be written.
pub async fn run_app_with(dependencies: &BootstrapDependencies) -> AppResult<BatchReport> {
    let BootstrapDependencies {
        cli,
        config,
        container,
        metrics,
    } = dependencies;

    let mut gateway = LocalStorageGateway::open(&cli.root, config.clone())
        .map_err(|err| AppError::fsops("local_storage.open", err))?;
    if let Some(container) = container {
        gateway = gateway.with_container(container.clone());
    }
    let gateway = Arc::new(gateway);
    let notifier = WebhookNotifier::new(Duration::from_secs(cli.notify_timeout_secs))
        .map_err(|err| AppError::notify("webhook.new", err))?;
    let engine = IntakeEngine::new(
        gateway.configuration().clone(),
        gateway.clone(),
        Arc::new(notifier),
        Arc::new(SystemClock),
    );
    info!(
        root = %gateway.root().display(),
        container = %gateway.container_name(),
        rules = config.len(),
        "intake engine ready"
    );

    let document = read_records(cli.records_path()).await?;
    let batch = parse_records(&document)?;
    let report = run_batch(&engine, batch, cli.concurrency, metrics).await;
    if let Some(path) = &cli.metrics_file {
        write_metrics(metrics, path).await?;
    }
    Ok(report)
}

async fn write_metrics(metrics: &Metrics, path: &Path) -> AppResult<()> {
    let rendered = metrics
        .render()
        .map_err(|err| AppError::telemetry("metrics.render", err))?;
    tokio::fs::write(path, rendered)
        .await
        .map_err(|err| AppError::io("write_metrics", Some(path.to_path_buf()), err))?;
    debug!(path = %path.display(), "metrics written");
    Ok(())
}

async fn read_records(path: Option<PathBuf>) -> AppResult<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| AppError::io("read_records", Some(path), err)),
        None => {
            let mut document = String::new();
            tokio::io::stdin()
                .read_to_string(&mut document)
                .await
                .map_err(|err| AppError::io("read_records", None, err))?;
            Ok(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_test_support::fixtures::{rules, temp_root};

    fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("intake").chain(args.iter().copied()))
    }

    #[test]
    fn zero_concurrency_is_rejected() -> anyhow::Result<()> {
        let mut args = cli(&["--root", "/data"])?;
        args.concurrency = 0;
        let err = BootstrapDependencies::new(args, rules(&[("in", "T")])?, None);
        assert!(matches!(
            err,
            Err(AppError::InvalidConfig {
                field: "concurrency",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn missing_root_fails_bootstrap() -> anyhow::Result<()> {
        let root = temp_root()?;
        let missing = root.path().join("absent");
        let args = cli(&["--root", &missing.to_string_lossy(), "--records", "unused.json"])?;
        let deps = BootstrapDependencies::new(args, rules(&[("in", "T")])?, None)?;
        assert!(matches!(
            run_app_with(&deps).await,
            Err(AppError::FsOps { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_records_file_fails_bootstrap() -> anyhow::Result<()> {
        let root = temp_root()?;
        let records = root.path().join("missing.json");
        let args = cli(&[
            "--root",
            &root.path().to_string_lossy(),
            "--records",
            &records.to_string_lossy(),
        ])?;
        let deps = BootstrapDependencies::new(args, rules(&[("in", "T")])?, None)?;
        assert!(matches!(
            run_app_with(&deps).await,
            Err(AppError::Io {
                operation: "read_records",
                ..
            })
        ));
        Ok(())
    }
}
