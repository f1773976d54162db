// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Persisted panel options.
//!
//! The host owns persistence; the core only ever produces a complete new
//! `PanelOptions` and hands it back through `PanelHost::on_options_change`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::RemoteModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphOptions {
    pub show_bars: bool,
    pub show_lines: bool,
    pub show_points: bool,
    pub is_stacked: bool,
    pub line_width: u32,
    pub fill: u32,
    pub fill_gradient: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            show_bars: false,
            show_lines: true,
            show_points: false,
            is_stacked: false,
            line_width: 1,
            fill: 1,
            fill_gradient: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPlacement {
    #[default]
    Under,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendOptions {
    pub as_table: bool,
    pub is_visible: bool,
    pub placement: LegendPlacement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_desc: Option<bool>,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            as_table: false,
            is_visible: true,
            placement: LegendPlacement::Under,
            sort_by: None,
            sort_desc: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YAxis {
    pub index: u32,
}

/// Per-series display override, keyed by series label in `PanelOptions::series`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<YAxis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdsMode {
    #[default]
    Absolute,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    /// `None` is the base step, below every other value.
    pub value: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub mode: ThresholdsMode,
    pub steps: Vec<ThresholdStep>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mode: ThresholdsMode::Absolute,
            steps: vec![
                ThresholdStep {
                    value: None,
                    color: "green".to_string(),
                },
                ThresholdStep {
                    value: Some(80.0),
                    color: "red".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDisplayOptions {
    pub values: bool,
    pub calcs: Vec<String>,
    pub thresholds: Thresholds,
}

impl Default for FieldDisplayOptions {
    fn default() -> Self {
        Self {
            values: false,
            calcs: vec!["mean".to_string()],
            thresholds: Thresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipOptions {
    pub mode: TooltipMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasourceOptions {
    pub epochs: u32,
    pub batchsize: u32,
    /// Bucket the model writes its output to. Stored in snake case like the
    /// dashboard panel does.
    #[serde(
        rename = "input_bucket",
        alias = "inputBucket",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_bucket: Option<String>,
}

impl Default for DatasourceOptions {
    fn default() -> Self {
        Self {
            epochs: 10,
            batchsize: 64,
            input_bucket: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    pub graph: GraphOptions,
    pub legend: LegendOptions,
    pub series: BTreeMap<String, SeriesOptions>,
    pub field_options: FieldDisplayOptions,
    pub tooltip_options: TooltipOptions,
    pub datasource_options: DatasourceOptions,
    pub model_name: String,
    /// Last known state of the attached model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<RemoteModel>,
}

impl PanelOptions {
    pub fn has_model(&self) -> bool {
        !self.model_name.is_empty()
    }

    pub fn with_model_name(&self, name: &str) -> Self {
        Self {
            model_name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_model(&self, model: RemoteModel) -> Self {
        Self {
            model: Some(model),
            ..self.clone()
        }
    }

    pub fn with_series_options(&self, label: &str, update: SeriesOptions) -> Self {
        let mut series = self.series.clone();
        series.insert(label.to_string(), update);
        Self {
            series,
            ..self.clone()
        }
    }

    pub fn with_series_color(&self, label: &str, color: &str) -> Self {
        let update = SeriesOptions {
            color: Some(color.to_string()),
            ..self.series.get(label).cloned().unwrap_or_default()
        };
        self.with_series_options(label, update)
    }

    pub fn with_series_axis(&self, label: &str, index: u32) -> Self {
        let update = SeriesOptions {
            y_axis: Some(YAxis { index }),
            ..self.series.get(label).cloned().unwrap_or_default()
        };
        self.with_series_options(label, update)
    }

    /// Sorting again by the same column flips the direction; a new column
    /// starts ascending.
    pub fn with_sort_toggled(&self, sort_by: &str) -> Self {
        let same = self.legend.sort_by.as_deref() == Some(sort_by);
        let sort_desc = same && !self.legend.sort_desc.unwrap_or(false);
        Self {
            legend: LegendOptions {
                sort_by: Some(sort_by.to_string()),
                sort_desc: Some(sort_desc),
                ..self.legend.clone()
            },
            ..self.clone()
        }
    }
}
