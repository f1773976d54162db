// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

use crate::datasource::{Datasource, StaticDatasourceResolver};
use crate::errors::Error;
use crate::lifecycle::{DEFAULT_BUCKET, LifecycleSettings};
use crate::model::ModelConfig;
use crate::normalize::NormalizeBounds;

const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/ml-baseline.yaml";
const DEFAULT_LOUDML_URL: &str = "http://localhost:8077";

fn default_loudml_url() -> String {
    DEFAULT_LOUDML_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    15
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_loudml_url")]
    pub loudml_url: String,
    /// Seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Seconds between two status refreshes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_bucket")]
    pub default_bucket: String,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub bounds: NormalizeBounds,
    #[serde(default)]
    pub model_template: ModelConfig,
    #[serde(default)]
    pub datasources: Vec<Datasource>,
    #[serde(default)]
    pub default_datasource: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loudml_url: default_loudml_url(),
            request_timeout: default_request_timeout(),
            poll_interval: default_poll_interval(),
            default_bucket: default_bucket(),
            log_level: None,
            bounds: NormalizeBounds::default(),
            model_template: ModelConfig::default(),
            datasources: Vec::new(),
            default_datasource: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            template: self.model_template.clone(),
            bounds: self.bounds,
            default_bucket: self.default_bucket.clone(),
        }
    }

    pub fn resolver(&self) -> StaticDatasourceResolver {
        StaticDatasourceResolver::new(self.datasources.clone(), self.default_datasource.clone())
    }

    fn check(&self) -> std::result::Result<(), Error> {
        self.bounds.check().map_err(Error::Config)?;
        if self.request_timeout == 0 {
            return Err(Error::Config("request_timeout must be positive".to_string()));
        }
        if self.poll_interval == 0 {
            return Err(Error::Config("poll_interval must be positive".to_string()));
        }
        if self.default_bucket.is_empty() {
            return Err(Error::Config("default_bucket must not be empty".to_string()));
        }
        if let Some(name) = &self.default_datasource
            && !self.datasources.iter().any(|ds| &ds.name == name)
        {
            return Err(Error::Config(format!(
                "default_datasource {name} is not among the configured datasources"
            )));
        }
        Ok(())
    }
}

/// `--config` first, then `DD_ML_BASELINE_CONFIG`, then the agent's config
/// directory.
pub fn config_path(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| env::var("DD_ML_BASELINE_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Reads and validates the configuration. A missing file yields the
/// defaults. `DD_ML_BASELINE_URL` overrides the service URL.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        }
    } else {
        warn!("config file {} not found, using defaults", path.display());
        Config::default()
    };

    if let Ok(url) = env::var("DD_ML_BASELINE_URL") {
        debug!("ML service url overridden by DD_ML_BASELINE_URL");
        config.loudml_url = url;
    }

    config
        .check()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Parse a Go log level string into a log::Level
/// Unknown levels silently default to Info
fn parse_log_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" | "off" => log::Level::Error,
        _ => log::Level::Info,
    }
}

/// Priority: DD_LOG_LEVEL > LOG_LEVEL > YAML config > default Info
pub fn get_log_level(config: &Config) -> log::Level {
    if let Ok(level) = env::var("DD_LOG_LEVEL") {
        return parse_log_level(&level);
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        return parse_log_level(&level);
    }
    config
        .log_level
        .as_deref()
        .map(parse_log_level)
        .unwrap_or(log::Level::Info)
}
