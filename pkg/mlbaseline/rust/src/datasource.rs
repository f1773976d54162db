// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::ports::DatasourceResolver;
use crate::query::DatasourceRef;

fn default_kind() -> String {
    "influxdb".to_string()
}

/// A concrete data source a query target points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    pub name: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    /// InfluxQL database.
    #[serde(default)]
    pub database: Option<String>,
    /// Flux bucket, used when no database is set.
    #[serde(default)]
    pub default_bucket: Option<String>,
}

impl Datasource {
    fn matches(&self, key: &str) -> bool {
        self.name == key || self.uid.as_deref() == Some(key)
    }
}

/// Resolves references against a fixed list of data sources.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasourceResolver {
    datasources: Vec<Datasource>,
    default: Option<String>,
}

impl StaticDatasourceResolver {
    /// `default` names the data source used by targets without a reference;
    /// when unset, the first one is used.
    pub fn new(datasources: Vec<Datasource>, default: Option<String>) -> Self {
        Self {
            datasources,
            default,
        }
    }

    fn lookup(&self, reference: Option<&DatasourceRef>) -> Result<&Datasource> {
        let key = match reference {
            Some(r) => Some(r.key()),
            None => self.default.as_deref(),
        };
        let found = match key {
            Some(key) => self.datasources.iter().find(|ds| ds.matches(key)),
            None => self.datasources.first(),
        };
        found.ok_or_else(|| Error::Resolution {
            datasource: key.unwrap_or("default").to_string(),
            message: "no such datasource is configured".to_string(),
        })
    }
}

#[async_trait]
impl DatasourceResolver for StaticDatasourceResolver {
    async fn resolve(&self, reference: Option<&DatasourceRef>) -> Result<Datasource> {
        let ds = self.lookup(reference)?;
        debug!("resolved datasource {} ({})", ds.name, ds.kind);
        Ok(ds.clone())
    }
}
