// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use async_trait::async_trait;
use dd_ml_baseline::model::{HookDescriptor, JobHandle, ModelConfig, RemoteModel, RemoteSettings};
use dd_ml_baseline::panel::PanelOptions;
use dd_ml_baseline::ports::{Notice, NotificationSink, PanelHost, RemoteModelService};
use dd_ml_baseline::query::{PanelData, TimeRange};
use dd_ml_baseline::{Error, RemoteOperation, Result};

pub const PANEL_DATA: &str = r#"{
    "request": {
        "range": {"from": 1600000000000, "to": 1600086400000},
        "targets": [{
            "refId": "A",
            "datasource": "influx",
            "measurement": "disk",
            "select": [[{"type": "field", "params": ["used_percent"]}, {"type": "max", "params": []}]],
            "groupBy": [{"type": "time", "params": ["1h"]}, {"type": "fill", "params": ["previous"]}],
            "tags": [{"key": "path", "operator": "=", "value": "/var"}]
        }]
    }
}"#;

pub const DISK_MODEL: &str = "telegraf_disk_max_used_percent_path_/var_1h";

pub const CONFIG: &str = r#"
loudml_url: http://127.0.0.1:1
request_timeout: 2
default_bucket: baselines
datasources:
  - name: influx
    database: telegraf
"#;

pub fn panel_data() -> PanelData {
    serde_json::from_str(PANEL_DATA).unwrap()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Runs the binary with the given arguments. Logging is kept at error level
/// so stdout only carries command output.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dd-ml-baseline"))
        .args(args)
        .env("DD_LOG_LEVEL", "error")
        .env_remove("LOG_LEVEL")
        .env_remove("DD_ML_BASELINE_URL")
        .env_remove("DD_ML_BASELINE_CONFIG")
        .output()
        .expect("failed to run dd-ml-baseline")
}

/// ML service holding models in memory. Every call is recorded as
/// `"<operation>:<model>"`.
#[derive(Default)]
pub struct FakeService {
    models: Mutex<HashMap<String, RemoteModel>>,
    failing: Mutex<Vec<RemoteOperation>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<ModelConfig>>,
    ranges: Mutex<Vec<Option<TimeRange>>>,
}

impl FakeService {
    pub fn fail(&self, operation: RemoteOperation) {
        self.failing.lock().unwrap().push(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<ModelConfig> {
        self.created.lock().unwrap().clone()
    }

    pub fn ranges(&self) -> Vec<Option<TimeRange>> {
        self.ranges.lock().unwrap().clone()
    }

    /// Simulates a training job finishing on the service side.
    pub fn mark_trained(&self, name: &str) {
        if let Some(model) = self.models.lock().unwrap().get_mut(name) {
            model.state.trained = true;
        }
    }

    fn call(&self, operation: RemoteOperation, name: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}:{name}"));
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(Error::remote(operation, "service unavailable"));
        }
        Ok(())
    }

    fn set_running(&self, name: &str, run: bool) {
        if let Some(model) = self.models.lock().unwrap().get_mut(name) {
            model.settings.run = run;
        }
    }
}

#[async_trait]
impl RemoteModelService for FakeService {
    async fn get_model(&self, name: &str) -> Result<RemoteModel> {
        self.call(RemoteOperation::GetModel, name)?;
        self.models
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    async fn create_model(&self, model: &ModelConfig) -> Result<()> {
        self.call(RemoteOperation::CreateModel, &model.name)?;
        self.created.lock().unwrap().push(model.clone());
        self.models.lock().unwrap().insert(
            model.name.clone(),
            RemoteModel {
                settings: RemoteSettings {
                    name: model.name.clone(),
                    run: false,
                },
                ..RemoteModel::default()
            },
        );
        Ok(())
    }

    async fn create_model_hook(&self, model_name: &str, _hook: &HookDescriptor) -> Result<()> {
        self.call(RemoteOperation::CreateModelHook, model_name)
    }

    async fn train_model(&self, name: &str, data: &PanelData) -> Result<JobHandle> {
        self.call(RemoteOperation::TrainModel, name)?;
        self.ranges.lock().unwrap().push(data.range());
        Ok(JobHandle(format!("train-{}", self.calls().len())))
    }

    async fn forecast_model(&self, name: &str, data: &PanelData) -> Result<JobHandle> {
        self.call(RemoteOperation::ForecastModel, name)?;
        self.ranges.lock().unwrap().push(data.range());
        Ok(JobHandle(format!("forecast-{}", self.calls().len())))
    }

    async fn start_model(&self, name: &str) -> Result<()> {
        self.call(RemoteOperation::StartModel, name)?;
        self.set_running(name, true);
        Ok(())
    }

    async fn stop_model(&self, name: &str) -> Result<()> {
        self.call(RemoteOperation::StopModel, name)?;
        self.set_running(name, false);
        Ok(())
    }
}

/// Panel host keeping options in memory.
pub struct MemoryHost {
    options: Mutex<PanelOptions>,
}

impl MemoryHost {
    pub fn new(options: PanelOptions) -> Self {
        Self {
            options: Mutex::new(options),
        }
    }
}

impl PanelHost for MemoryHost {
    fn options(&self) -> PanelOptions {
        self.options.lock().unwrap().clone()
    }

    fn on_options_change(&self, options: PanelOptions) {
        *self.options.lock().unwrap() = options;
    }

    fn on_change_time_range(&self, _range: TimeRange) {}
}

#[derive(Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl NotificationSink for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
