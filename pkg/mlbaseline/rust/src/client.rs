// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! HTTP client for the Loud ML model API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{Error, RemoteOperation, Result};
use crate::model::{HookDescriptor, JobHandle, ModelConfig, RemoteModel};
use crate::ports::RemoteModelService;
use crate::query::PanelData;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelsResponse {
    Many(Vec<RemoteModel>),
    One(RemoteModel),
}

#[derive(Clone)]
pub struct LoudMlClient {
    base_url: Url,
    client: reqwest::Client,
}

impl LoudMlClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid ML service url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid ML service url {base_url}: not a base url"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    /// `<base>/models[/<name>[/<action>]]`, with the name percent-encoded.
    fn models_url(&self, name: Option<&str>, action: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("models");
            segments.extend(name);
            segments.extend(action);
        }
        url
    }

    async fn exchange(
        &self,
        operation: RemoteOperation,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<(StatusCode, String)> {
        debug!("{method} {url}");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(operation, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::remote(operation, e.to_string()))?;
        Ok((status, text))
    }

    async fn send(
        &self,
        operation: RemoteOperation,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value> {
        let (status, text) = self.exchange(operation, method, url, body).await?;
        decode(operation, status, text)
    }

    async fn job(&self, operation: RemoteOperation, url: Url) -> Result<JobHandle> {
        let value = self.send(operation, Method::POST, url, None).await?;
        Ok(job_handle(value))
    }
}

/// Non-2xx becomes `Error::Remote`. Bodies that are not JSON are kept as a
/// string value.
pub(crate) fn decode(operation: RemoteOperation, status: StatusCode, text: String) -> Result<Value> {
    if !status.is_success() {
        return Err(Error::remote(operation, error_message(status, &text)));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Prefers the `message` the service puts in error bodies.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status.to_string(),
        None => body.trim().to_string(),
    }
}

pub(crate) fn job_handle(value: Value) -> JobHandle {
    match value {
        Value::String(id) => JobHandle(id),
        Value::Object(ref map) => match map.get("job_id").or_else(|| map.get("id")) {
            Some(Value::String(id)) => JobHandle(id.clone()),
            _ => JobHandle(value.to_string()),
        },
        other => JobHandle(other.to_string()),
    }
}

/// `from`/`to` of the panel's request, in epoch seconds.
pub(crate) fn range_params(data: &PanelData) -> Vec<(&'static str, String)> {
    match data.range() {
        Some(range) => vec![
            ("from", (range.from / 1000).to_string()),
            ("to", (range.to / 1000).to_string()),
        ],
        None => Vec::new(),
    }
}

fn with_query(mut url: Url, params: &[(&str, String)]) -> Url {
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }
    url
}

#[async_trait]
impl RemoteModelService for LoudMlClient {
    async fn get_model(&self, name: &str) -> Result<RemoteModel> {
        let url = self.models_url(Some(name), None);
        let (status, text) = self
            .exchange(RemoteOperation::GetModel, Method::GET, url, None)
            .await?;
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ModelNotFound(name.to_string()));
        }
        let value = decode(RemoteOperation::GetModel, status, text)?;
        let models: ModelsResponse = serde_json::from_value(value)
            .map_err(|e| Error::remote(RemoteOperation::GetModel, e.to_string()))?;
        match models {
            ModelsResponse::One(model) => Ok(model),
            ModelsResponse::Many(models) => models
                .into_iter()
                .next()
                .ok_or_else(|| Error::ModelNotFound(name.to_string())),
        }
    }

    async fn create_model(&self, model: &ModelConfig) -> Result<()> {
        let body = serde_json::to_value(model)
            .map_err(|e| Error::remote(RemoteOperation::CreateModel, e.to_string()))?;
        let url = self.models_url(None, None);
        self.send(RemoteOperation::CreateModel, Method::POST, url, Some(body))
            .await?;
        Ok(())
    }

    async fn create_model_hook(&self, model_name: &str, hook: &HookDescriptor) -> Result<()> {
        let body = serde_json::to_value(hook)
            .map_err(|e| Error::remote(RemoteOperation::CreateModelHook, e.to_string()))?;
        let url = self.models_url(Some(model_name), Some("hooks"));
        self.send(RemoteOperation::CreateModelHook, Method::PUT, url, Some(body))
            .await?;
        Ok(())
    }

    async fn train_model(&self, name: &str, data: &PanelData) -> Result<JobHandle> {
        let mut params = range_params(data);
        params.push(("bg", "true".to_string()));
        let url = with_query(self.models_url(Some(name), Some("_train")), &params);
        self.job(RemoteOperation::TrainModel, url).await
    }

    async fn forecast_model(&self, name: &str, data: &PanelData) -> Result<JobHandle> {
        let mut params = range_params(data);
        params.push(("save_output_data", "true".to_string()));
        params.push(("bg", "true".to_string()));
        let url = with_query(self.models_url(Some(name), Some("_forecast")), &params);
        self.job(RemoteOperation::ForecastModel, url).await
    }

    async fn start_model(&self, name: &str) -> Result<()> {
        let url = self.models_url(Some(name), Some("_start"));
        self.send(RemoteOperation::StartModel, Method::POST, url, None)
            .await?;
        Ok(())
    }

    async fn stop_model(&self, name: &str) -> Result<()> {
        let url = self.models_url(Some(name), Some("_stop"));
        self.send(RemoteOperation::StopModel, Method::POST, url, None)
            .await?;
        Ok(())
    }
}
