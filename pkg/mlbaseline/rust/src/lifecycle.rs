// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Drives a baseline model through create, train, forecast and run/stop.
//!
//! Every user-facing action reports its outcome exactly once through the
//! notification sink and then returns it. Background refreshes never notify.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

use crate::builder::build_model_config;
use crate::errors::{Error, Result};
use crate::extractors::{InvalidReason, validate};
use crate::model::{HookKind, JobHandle, ModelConfig, RemoteModel, create_hook};
use crate::normalize::NormalizeBounds;
use crate::ports::{DatasourceResolver, Notice, NotificationSink, PanelHost, RemoteModelService};
use crate::query::PanelData;

pub const DEFAULT_BUCKET: &str = "loudml";

const MODEL_CREATED: &str = "Model has been created on Loud ML server";
const TRAIN_STARTED: &str = "Model train job started on Loud ML server";
const FORECAST_STARTED: &str = "Model forecast job started on Loud ML server";

const INVALID_QUERY_ERROR: &str = "Query cannot be used to build a model";
const DATASOURCE_ERROR: &str = "Datasource error";
const GET_ERROR: &str = "Model lookup error";
const CREATE_ERROR: &str = "Model create error";
const HOOK_ERROR: &str = "Model hook error";
const TRAIN_ERROR: &str = "Model train job error";
const FORECAST_ERROR: &str = "Model forecast job error";
const START_ERROR: &str = "Model start error";
const STOP_ERROR: &str = "Model stop error";

/// Inputs to model building that come from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleSettings {
    pub template: ModelConfig,
    pub bounds: NormalizeBounds,
    /// Output bucket when the panel does not name one.
    pub default_bucket: String,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            template: ModelConfig::default(),
            bounds: NormalizeBounds::default(),
            default_bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineOutcome {
    pub name: String,
    /// False when a model with the same name already existed.
    pub created: bool,
    pub job: JobHandle,
}

pub struct ModelLifecycle {
    service: Arc<dyn RemoteModelService>,
    resolver: Arc<dyn DatasourceResolver>,
    notifier: Arc<dyn NotificationSink>,
    host: Arc<dyn PanelHost>,
    settings: LifecycleSettings,
    snapshot: RwLock<Option<RemoteModel>>,
}

impl ModelLifecycle {
    pub fn new(
        service: Arc<dyn RemoteModelService>,
        resolver: Arc<dyn DatasourceResolver>,
        notifier: Arc<dyn NotificationSink>,
        host: Arc<dyn PanelHost>,
        settings: LifecycleSettings,
    ) -> Self {
        let snapshot = host.options().model;
        Self {
            service,
            resolver,
            notifier,
            host,
            settings,
            snapshot: RwLock::new(snapshot),
        }
    }

    fn report(&self, title: &str, err: Error) -> Error {
        self.notifier.notify(Notice::error(title, err.to_string()));
        err
    }

    fn model_name(&self, title: &str) -> Result<String> {
        let options = self.host.options();
        if options.has_model() {
            Ok(options.model_name)
        } else {
            Err(self.report(title, Error::NoModel))
        }
    }

    /// Points the panel at `model` and makes it the current snapshot.
    async fn attach(&self, model: RemoteModel) {
        let options = self
            .host
            .options()
            .with_model_name(&model.settings.name)
            .with_model(model.clone());
        self.host.on_options_change(options);
        *self.snapshot.write().await = Some(model);
    }

    /// Builds a model from the panel's first query target, creates it on the
    /// ML service unless a model with the same name exists, attaches it to
    /// the panel and starts training.
    pub async fn create_baseline(&self, data: &PanelData) -> Result<BaselineOutcome> {
        // 1. The query must describe exactly one usable series.
        validate(data.targets())
            .into_result()
            .map_err(|reason| self.report(INVALID_QUERY_ERROR, Error::InvalidQuery(reason)))?;
        let source = data.first_target().ok_or_else(|| {
            self.report(
                INVALID_QUERY_ERROR,
                Error::InvalidQuery(InvalidReason::NoTargets),
            )
        })?;

        // 2. Resolve the data source the target reads from.
        let datasource = self
            .resolver
            .resolve(source.datasource.as_ref())
            .await
            .map_err(|e| self.report(DATASOURCE_ERROR, e))?;

        // 3. Build the model.
        let bucket = self
            .host
            .options()
            .datasource_options
            .input_bucket
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.settings.default_bucket.clone());
        let model = build_model_config(
            source,
            &datasource,
            &bucket,
            &self.settings.template,
            &self.settings.bounds,
        );
        let name = model.name.clone();

        // 4. Retrain an existing model, or create it with its anomaly hook.
        let (attached, created) = match self.service.get_model(&name).await {
            Ok(existing) => {
                info!("model {name} already exists, retraining");
                (existing, false)
            }
            Err(e) if e.is_not_found() => {
                self.service
                    .create_model(&model)
                    .await
                    .map_err(|e| self.report(CREATE_ERROR, e))?;
                let hook = create_hook(HookKind::Anomaly, &bucket);
                self.service
                    .create_model_hook(&name, &hook)
                    .await
                    .map_err(|e| self.report(HOOK_ERROR, e))?;
                info!("created model {name} writing to bucket {bucket}");
                self.notifier.notify(Notice::success(MODEL_CREATED));
                (RemoteModel::stopped(&name), true)
            }
            Err(e) => return Err(self.report(GET_ERROR, e)),
        };

        // 5. Attach the model to the panel, then train it on the current range.
        self.attach(attached).await;
        let job = self.start_training(&name, data).await?;

        Ok(BaselineOutcome { name, created, job })
    }

    async fn start_training(&self, name: &str, data: &PanelData) -> Result<JobHandle> {
        let job = self
            .service
            .train_model(name, data)
            .await
            .map_err(|e| self.report(TRAIN_ERROR, e))?;
        info!("train job {job} started for model {name}");
        self.notifier.notify(Notice::success(TRAIN_STARTED));
        Ok(job)
    }

    /// Retrains the attached model on the panel's current range.
    pub async fn train(&self, data: &PanelData) -> Result<JobHandle> {
        let name = self.model_name(TRAIN_ERROR)?;
        self.start_training(&name, data).await
    }

    pub async fn forecast(&self, data: &PanelData) -> Result<JobHandle> {
        let name = self.model_name(FORECAST_ERROR)?;
        let job = self
            .service
            .forecast_model(&name, data)
            .await
            .map_err(|e| self.report(FORECAST_ERROR, e))?;
        info!("forecast job {job} started for model {name}");
        self.notifier.notify(Notice::success(FORECAST_STARTED));
        Ok(job)
    }

    /// Stops a running model or starts a stopped one. Returns the new run
    /// state. The snapshot only changes once the service accepted the call.
    pub async fn toggle_run(&self) -> Result<bool> {
        let attached = self.host.options().model_name;
        let running = self
            .snapshot
            .read()
            .await
            .as_ref()
            .is_some_and(|m| m.settings.name == attached && m.is_running());
        let title = if running { STOP_ERROR } else { START_ERROR };
        let name = self.model_name(title)?;

        let call = if running {
            self.service.stop_model(&name).await
        } else {
            self.service.start_model(&name).await
        };
        call.map_err(|e| self.report(title, e))?;

        let model = {
            let mut snapshot = self.snapshot.write().await;
            // A snapshot of another model is replaced.
            let mut model = snapshot
                .take()
                .filter(|m| m.settings.name == name)
                .unwrap_or_else(|| RemoteModel::stopped(&name));
            model.settings.run = !running;
            *snapshot = Some(model.clone());
            model
        };
        info!(
            "model {name} {}",
            if running { "stopped" } else { "started" }
        );
        let options = self.host.options().with_model(model);
        self.host.on_options_change(options);
        Ok(!running)
    }

    /// Fetches the attached model's state. Failures are only logged.
    pub async fn refresh_status(&self) {
        let options = self.host.options();
        if !options.has_model() {
            return;
        }
        match self.service.get_model(&options.model_name).await {
            Ok(model) => *self.snapshot.write().await = Some(model),
            Err(e) => debug!("status refresh for {} failed: {e}", options.model_name),
        }
    }

    pub async fn status(&self) -> Option<RemoteModel> {
        self.snapshot.read().await.clone()
    }
}
