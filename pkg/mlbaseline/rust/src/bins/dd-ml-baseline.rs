// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use tokio::signal::unix::{SignalKind, signal};

use dd_ml_baseline::config::{self, Config};
use dd_ml_baseline::extractors::{TooltipSummary, validate};
use dd_ml_baseline::host::{FilePanelHost, LogNotifier};
use dd_ml_baseline::model::{run_label, training_label};
use dd_ml_baseline::ports::{DatasourceResolver, PanelHost};
use dd_ml_baseline::query::PanelData;
use dd_ml_baseline::{LoudMlClient, ModelLifecycle, StatusPoller, build_model_config};

const DEFAULT_PANEL_PATH: &str = "/var/lib/datadog-agent/ml-baseline/panel.json";

/// Baseline models for dashboard panels, backed by Loud ML.
#[derive(Parser, Debug)]
#[command(name = "dd-ml-baseline", version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Persisted panel options
    #[arg(long, global = true, default_value = DEFAULT_PANEL_PATH)]
    panel: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the model a panel request would produce, without contacting the ML service
    Describe {
        /// Panel request as JSON
        #[arg(long)]
        data: PathBuf,
    },
    /// Create the panel's baseline model if needed and train it
    Create {
        #[arg(long)]
        data: PathBuf,
    },
    /// Retrain the attached model on the request's time range
    Train {
        #[arg(long)]
        data: PathBuf,
    },
    /// Forecast with the attached model over the request's time range
    Forecast {
        #[arg(long)]
        data: PathBuf,
    },
    /// Start the attached model if stopped, stop it if running
    ToggleRun,
    /// Refresh the attached model's status until interrupted
    Watch,
}

fn read_data(path: &Path) -> Result<PanelData> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn lifecycle(config: &Config, panel: &Path) -> Result<Arc<ModelLifecycle>> {
    let client = LoudMlClient::new(&config.loudml_url, config.request_timeout())
        .context("creating Loud ML client")?;
    let host = FilePanelHost::open(panel)?;
    Ok(Arc::new(ModelLifecycle::new(
        Arc::new(client),
        Arc::new(config.resolver()),
        Arc::new(LogNotifier),
        Arc::new(host),
        config.lifecycle_settings(),
    )))
}

/// Prints what the panel would build from `data` as JSON on stdout.
#[allow(clippy::print_stdout)]
async fn describe(config: &Config, panel: &Path, data: &PanelData) -> Result<()> {
    let tooltip = TooltipSummary::from_data(data);
    let mut out = json!({
        "feature": tooltip.feature,
        "interval": tooltip.interval,
        "match_all": tooltip.match_all,
        "fill": tooltip.fill,
    });

    match (validate(data.targets()).into_result(), data.first_target()) {
        (Ok(()), Some(source)) => {
            let datasource = config.resolver().resolve(source.datasource.as_ref()).await?;
            let bucket = FilePanelHost::open(panel)?
                .options()
                .datasource_options
                .input_bucket
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| config.default_bucket.clone());
            let settings = config.lifecycle_settings();
            let model = build_model_config(
                source,
                &datasource,
                &bucket,
                &settings.template,
                &settings.bounds,
            );
            out["valid"] = json!(true);
            out["model"] = serde_json::to_value(&model)?;
        }
        (Err(reason), _) => {
            out["valid"] = json!(false);
            out["reason"] = json!(reason.to_string());
        }
        (Ok(()), None) => out["valid"] = json!(false),
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn watch(lifecycle: Arc<ModelLifecycle>, config: &Config) -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    lifecycle.refresh_status().await;
    let poller = StatusPoller::spawn(lifecycle.clone(), config.poll_interval());
    info!("watching model status every {}s", config.poll_interval);

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }

    poller.shutdown().await;
    let status = lifecycle.status().await;
    info!(
        "last known status: {} ({})",
        training_label(status.as_ref()),
        run_label(status.as_ref())
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(&config::config_path(cli.config))?;

    let log_level = config::get_log_level(&config);
    simple_logger::init_with_level(log_level)?;
    info!(
        "dd-ml-baseline starting (version {})",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Command::Describe { data } => describe(&config, &cli.panel, &read_data(&data)?).await?,
        Command::Create { data } => {
            let outcome = lifecycle(&config, &cli.panel)?
                .create_baseline(&read_data(&data)?)
                .await?;
            info!(
                "model {} {} (job {})",
                outcome.name,
                if outcome.created { "created" } else { "reused" },
                outcome.job
            );
        }
        Command::Train { data } => {
            let job = lifecycle(&config, &cli.panel)?
                .train(&read_data(&data)?)
                .await?;
            info!("train job {job}");
        }
        Command::Forecast { data } => {
            let job = lifecycle(&config, &cli.panel)?
                .forecast(&read_data(&data)?)
                .await?;
            info!("forecast job {job}");
        }
        Command::ToggleRun => {
            let lifecycle = lifecycle(&config, &cli.panel)?;
            lifecycle.refresh_status().await;
            let running = lifecycle.toggle_run().await?;
            info!("model {}", if running { "started" } else { "stopped" });
        }
        Command::Watch => watch(lifecycle(&config, &cli.panel)?, &config).await?,
    }
    Ok(())
}
