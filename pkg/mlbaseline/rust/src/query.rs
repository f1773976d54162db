// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Query targets as emitted by the dashboard's InfluxQL query editor.
//!
//! Every field is optional: partial queries are normal input while the user
//! is still editing, so deserialization never fails on missing structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference from a query target to a named data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasourceRef {
    Name(String),
    Uid {
        uid: String,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

impl DatasourceRef {
    /// The identifier used to look the data source up: its name or uid.
    pub fn key(&self) -> &str {
        match self {
            DatasourceRef::Name(name) => name,
            DatasourceRef::Uid { uid, .. } => uid,
        }
    }
}

impl fmt::Display for DatasourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A select/group-by parameter. The editor emits both strings and numbers
/// (e.g. `percentile(90)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Text(String),
    Number(f64),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Text(s) => f.write_str(s),
            Param::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One function or field descriptor inside a select clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl SelectPart {
    pub fn is_field(&self) -> bool {
        self.kind == "field"
    }

    pub fn first_param(&self) -> Option<String> {
        self.params.first().map(|p| p.to_string())
    }
}

/// A group-by directive: `time`, `fill` or `tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl GroupBy {
    pub fn first_param(&self) -> Option<String> {
        self.params.first().map(|p| p.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: String,
    /// Joins this filter to the previous one (`AND` / `OR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl TagFilter {
    pub fn operator(&self) -> &str {
        self.operator.as_deref().unwrap_or("=")
    }

    /// Regex values are written `/.../` by the editor.
    pub fn is_regex(&self) -> bool {
        self.value.len() > 1 && self.value.starts_with('/') && self.value.ends_with('/')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<Vec<SelectPart>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<GroupBy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagFilter>>,
}

impl QueryTarget {
    /// The first select clause, if any.
    pub fn first_select(&self) -> Option<&[SelectPart]> {
        self.select.as_ref()?.first().map(Vec::as_slice)
    }

    pub fn group_by_kind(&self, kind: &str) -> Option<&GroupBy> {
        self.group_by.as_ref()?.iter().find(|g| g.kind == kind)
    }

    pub fn tags(&self) -> &[TagFilter] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Absolute time range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelRequest {
    #[serde(default)]
    pub targets: Vec<QueryTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TimeRange>,
}

/// What the host hands the panel on every render: the current request and
/// its targets. Series values are the host's concern and are not modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<PanelRequest>,
}

impl PanelData {
    pub fn targets(&self) -> &[QueryTarget] {
        self.request
            .as_ref()
            .map(|r| r.targets.as_slice())
            .unwrap_or_default()
    }

    pub fn first_target(&self) -> Option<&QueryTarget> {
        self.targets().first()
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.request.as_ref().and_then(|r| r.range)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    pub(crate) const CPU_TARGET: &str = r#"{
        "refId": "A",
        "datasource": "influx",
        "measurement": "cpu",
        "policy": "default",
        "select": [[{"type": "field", "params": ["usage_idle"]}, {"type": "mean", "params": []}]],
        "groupBy": [{"type": "time", "params": ["5m"]}, {"type": "fill", "params": ["null"]}],
        "tags": [
            {"key": "host", "operator": "=", "value": "server01"},
            {"condition": "AND", "key": "cpu", "operator": "=", "value": "cpu-total"}
        ]
    }"#;

    pub(crate) fn cpu_target() -> QueryTarget {
        serde_json::from_str(CPU_TARGET).unwrap()
    }

    #[test]
    fn test_parse_full_target() {
        let target = cpu_target();
        assert_eq!(target.ref_id.as_deref(), Some("A"));
        assert_eq!(
            target.datasource,
            Some(DatasourceRef::Name("influx".to_string()))
        );
        assert_eq!(target.measurement.as_deref(), Some("cpu"));
        assert_eq!(target.first_select().unwrap().len(), 2);
        assert_eq!(
            target.group_by_kind("time").unwrap().first_param().as_deref(),
            Some("5m")
        );
        assert_eq!(target.tags().len(), 2);
        assert_eq!(target.tags()[1].condition.as_deref(), Some("AND"));
    }

    #[test]
    fn test_parse_empty_target() {
        let target: QueryTarget = serde_json::from_str("{}").unwrap();
        assert!(target.first_select().is_none());
        assert!(target.group_by_kind("time").is_none());
        assert!(target.tags().is_empty());
    }

    #[test]
    fn test_parse_datasource_uid_reference() {
        let target: QueryTarget =
            serde_json::from_str(r#"{"datasource": {"uid": "P951FEA4DE68E13C5", "type": "influxdb"}}"#)
                .unwrap();
        let ds = target.datasource.unwrap();
        assert_eq!(ds.key(), "P951FEA4DE68E13C5");
        assert_eq!(
            ds,
            DatasourceRef::Uid {
                uid: "P951FEA4DE68E13C5".into(),
                kind: Some("influxdb".into())
            }
        );
    }

    #[test]
    fn test_numeric_params() {
        let part: SelectPart =
            serde_json::from_str(r#"{"type": "percentile", "params": [90]}"#).unwrap();
        assert_eq!(part.first_param().as_deref(), Some("90"));
    }

    #[test]
    fn test_regex_tag() {
        let tag = TagFilter {
            key: "host".into(),
            operator: Some("=~".into()),
            value: "/^web.*/".into(),
            condition: None,
        };
        assert!(tag.is_regex());
        assert_eq!(tag.operator(), "=~");
    }

    #[test]
    fn test_panel_data_without_request() {
        let data: PanelData = serde_json::from_str("{}").unwrap();
        assert!(data.targets().is_empty());
        assert!(data.first_target().is_none());
        assert!(data.range().is_none());
    }
}
