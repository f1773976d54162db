// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Collaborators the lifecycle is driven through. Each one is injected as an
//! `Arc<dyn Trait>` so hosts and tests can substitute their own.

use async_trait::async_trait;

use crate::datasource::Datasource;
use crate::errors::Result;
use crate::model::{HookDescriptor, JobHandle, ModelConfig, RemoteModel};
use crate::panel::PanelOptions;
use crate::query::{DatasourceRef, PanelData, TimeRange};

/// The external ML service.
#[async_trait]
pub trait RemoteModelService: Send + Sync {
    /// Fails with [`crate::Error::ModelNotFound`] when no model has this name.
    async fn get_model(&self, name: &str) -> Result<RemoteModel>;

    async fn create_model(&self, model: &ModelConfig) -> Result<()>;

    async fn create_model_hook(&self, model_name: &str, hook: &HookDescriptor) -> Result<()>;

    /// Trains on the time range of the panel's current request.
    async fn train_model(&self, name: &str, data: &PanelData) -> Result<JobHandle>;

    async fn forecast_model(&self, name: &str, data: &PanelData) -> Result<JobHandle>;

    async fn start_model(&self, name: &str) -> Result<()>;

    async fn stop_model(&self, name: &str) -> Result<()>;
}

/// Resolves a target's data source reference; `None` asks for the default.
#[async_trait]
pub trait DatasourceResolver: Send + Sync {
    async fn resolve(&self, reference: Option<&DatasourceRef>) -> Result<Datasource>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            detail: None,
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// The enclosing panel, handed to the core explicitly.
pub trait PanelHost: Send + Sync {
    /// Current persisted options.
    fn options(&self) -> PanelOptions;

    /// Replaces the persisted options wholesale.
    fn on_options_change(&self, options: PanelOptions);

    fn on_change_time_range(&self, range: TimeRange);
}
