// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Model descriptions exchanged with the ML service.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tag-equality filter applied to a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
    pub tag: String,
    pub value: String,
}

/// Value used for a feature when a bucket has no data.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawFeatureDefault")]
pub enum FeatureDefault {
    Value(f64),
    /// Repeat the previous bucket's value.
    Previous,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeatureDefault {
    Number(f64),
    Text(String),
}

impl TryFrom<RawFeatureDefault> for FeatureDefault {
    type Error = String;

    fn try_from(raw: RawFeatureDefault) -> Result<Self, Self::Error> {
        match raw {
            RawFeatureDefault::Number(n) => Ok(FeatureDefault::Value(n)),
            RawFeatureDefault::Text(s) if s == "previous" => Ok(FeatureDefault::Previous),
            RawFeatureDefault::Text(s) => s
                .parse()
                .map(FeatureDefault::Value)
                .map_err(|_| format!("invalid feature default: {s}")),
        }
    }
}

impl Serialize for FeatureDefault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureDefault::Value(v) => serializer.serialize_f64(*v),
            FeatureDefault::Previous => serializer.serialize_str("previous"),
        }
    }
}

/// Whether a feature is fed to the model, predicted by it, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureIo {
    #[serde(rename = "i")]
    Input,
    #[serde(rename = "o")]
    Output,
    #[default]
    #[serde(rename = "io")]
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub measurement: String,
    pub field: String,
    pub metric: String,
    #[serde(default)]
    pub io: FeatureIo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FeatureDefault>,
    #[serde(default)]
    pub match_all: Vec<TagMatch>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seasonality {
    #[serde(default)]
    pub daytime: bool,
    #[serde(default)]
    pub weekday: bool,
}

/// A model as created on the ML service. The same type serves as the
/// template the derived configuration is overlaid on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_bucket: Option<String>,
    pub bucket_interval: String,
    pub interval: String,
    pub offset: String,
    pub span: u32,
    pub forecast: u32,
    pub max_evals: u32,
    pub seasonality: Seasonality,
    pub grace_period: u32,
    pub min_threshold: f64,
    pub max_threshold: f64,
    pub features: Vec<Feature>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: "donut".to_string(),
            default_bucket: None,
            bucket_interval: "20m".to_string(),
            interval: "60s".to_string(),
            offset: "10s".to_string(),
            span: 10,
            forecast: 5,
            max_evals: 21,
            seasonality: Seasonality::default(),
            grace_period: 0,
            min_threshold: 0.0,
            max_threshold: 0.0,
            features: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Posts an annotation whenever the model flags an anomaly.
    Anomaly,
}

impl HookKind {
    fn kind(self) -> &'static str {
        match self {
            HookKind::Anomaly => "annotations",
        }
    }

    fn name(self) -> &'static str {
        match self {
            HookKind::Anomaly => "add_annotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    pub bucket: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub config: HookConfig,
}

pub fn create_hook(kind: HookKind, bucket: &str) -> HookDescriptor {
    HookDescriptor {
        kind: kind.kind().to_string(),
        name: kind.name().to_string(),
        config: HookConfig {
            bucket: bucket.to_string(),
        },
    }
}

/// Identifier of a background job started on the ML service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(pub String);

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The service reports `run` as an object while the model is serving.
fn deserialize_run<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(!matches!(
        value,
        serde_json::Value::Null | serde_json::Value::Bool(false)
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_run")]
    pub run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteState {
    #[serde(default)]
    pub trained: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingProgress {
    #[serde(default)]
    pub eval: u32,
    #[serde(default)]
    pub max_evals: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<TrainingProgress>,
}

/// Snapshot of a model as the ML service sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteModel {
    #[serde(default)]
    pub settings: RemoteSettings,
    #[serde(default)]
    pub state: RemoteState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingStatus>,
}

impl RemoteModel {
    /// State of a model the service has just created: known by name only
    /// and not running.
    pub fn stopped(name: &str) -> Self {
        Self {
            settings: RemoteSettings {
                name: name.to_string(),
                run: false,
            },
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.settings.run
    }

    pub fn is_trained(&self) -> bool {
        self.state.trained
    }

    pub fn is_training(&self) -> bool {
        self.training.as_ref().is_some_and(|t| t.state == "running")
    }
}

pub fn training_label(model: Option<&RemoteModel>) -> &'static str {
    match model {
        Some(m) if m.is_training() => "Training...",
        Some(m) if m.is_trained() => "Trained.",
        _ => "Not trained.",
    }
}

pub fn run_label(model: Option<&RemoteModel>) -> &'static str {
    if model.is_some_and(RemoteModel::is_running) {
        "Stop"
    } else {
        "Play"
    }
}
