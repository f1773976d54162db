// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Derives the model name and configuration from a query target.

use crate::datasource::Datasource;
use crate::extractors::{
    model_database, model_feature, model_fill, model_func, model_measurement, model_select,
    model_tags, model_tags_map, model_time, model_time_format,
};
use crate::model::{Feature, FeatureIo, ModelConfig};
use crate::normalize::NormalizeBounds;
use crate::query::QueryTarget;

const BASELINE_MAX_EVALS: u32 = 10;

/// Name under which the model is stored on the ML service.
///
/// The database component comes from the resolved data source while the
/// others come from the raw target. A missing component still takes its
/// slot, so a target without tags yields `..._idle__5m`. Dots are replaced
/// so the name stays a valid identifier.
pub fn model_name(source: &QueryTarget, datasource: &Datasource) -> String {
    [
        model_database(datasource),
        model_measurement(source),
        model_select(source),
        model_tags(source),
        model_time_format(source),
    ]
    .map(Option::unwrap_or_default)
    .join("_")
    .replace('.', "_")
}

fn feature(source: &QueryTarget) -> Feature {
    Feature {
        name: model_select(source).unwrap_or_default(),
        measurement: model_measurement(source).unwrap_or_default(),
        field: model_feature(source).unwrap_or_default(),
        metric: model_func(source),
        io: FeatureIo::Both,
        default: model_fill(source),
        match_all: model_tags_map(source),
    }
}

/// Overlays `template` with everything derived from `source`. Neither input
/// is modified.
pub fn build_model_config(
    source: &QueryTarget,
    datasource: &Datasource,
    bucket: &str,
    template: &ModelConfig,
    bounds: &NormalizeBounds,
) -> ModelConfig {
    let time = model_time(source).unwrap_or_default();
    ModelConfig {
        name: model_name(source, datasource),
        max_evals: BASELINE_MAX_EVALS,
        interval: bounds.normalize_interval(&time),
        span: bounds.normalize_span(&time),
        default_bucket: Some(bucket.to_string()),
        bucket_interval: time,
        features: vec![feature(source)],
        ..template.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::datasource::tests::influx;
    use crate::model::{FeatureDefault, TagMatch};
    use crate::query::tests::cpu_target;

    #[test]
    fn test_model_name() {
        let name = model_name(&cpu_target(), &influx("influx", "telegraf"));
        assert_eq!(name, "telegraf_cpu_mean_usage_idle_host_server01_cpu_cpu-total_5m");
    }

    #[test]
    fn test_model_name_is_deterministic() {
        let ds = influx("influx", "telegraf");
        let target = cpu_target();
        assert_eq!(model_name(&target, &ds), model_name(&target.clone(), &ds.clone()));
    }

    #[test]
    fn test_model_name_replaces_dots() {
        let mut target = cpu_target();
        target.measurement = Some("cpu.load".into());
        target.tags = None;
        let name = model_name(&target, &influx("influx", "metrics.v1"));
        assert_eq!(name, "metrics_v1_cpu_load_mean_usage_idle__5m");
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_model_name_keeps_missing_components() {
        let mut target = cpu_target();
        target.tags = None;
        let name = model_name(&target, &influx("influx", "telegraf"));
        assert_eq!(name, "telegraf_cpu_mean_usage_idle__5m");

        let name = model_name(&QueryTarget::default(), &influx("influx", "telegraf"));
        assert_eq!(name, "telegraf____");
    }

    #[test]
    fn test_build_model_config() {
        let template = ModelConfig::default();
        let source = cpu_target();
        let before = source.clone();
        let model = build_model_config(
            &source,
            &influx("influx", "telegraf"),
            "loudml",
            &template,
            &NormalizeBounds::default(),
        );

        assert_eq!(source, before);
        assert_eq!(template, ModelConfig::default());

        assert_eq!(model.name, "telegraf_cpu_mean_usage_idle_host_server01_cpu_cpu-total_5m");
        assert_eq!(model.max_evals, 10);
        assert_eq!(model.interval, "60s");
        assert_eq!(model.span, 100);
        assert_eq!(model.bucket_interval, "5m");
        assert_eq!(model.default_bucket.as_deref(), Some("loudml"));
        assert_eq!(model.kind, template.kind);
        assert_eq!(model.offset, template.offset);
        assert_eq!(model.features.len(), 1);

        let feature = &model.features[0];
        assert_eq!(feature.name, "mean_usage_idle");
        assert_eq!(feature.measurement, "cpu");
        assert_eq!(feature.field, "usage_idle");
        assert_eq!(feature.metric, "mean");
        assert_eq!(feature.io, FeatureIo::Both);
        assert_eq!(feature.default, None);
        assert_eq!(
            feature.match_all[0],
            TagMatch {
                tag: "host".into(),
                value: "server01".into()
            }
        );
    }

    #[test]
    fn test_build_model_config_fill_and_bounds() {
        let mut source = cpu_target();
        source.group_by = Some(serde_json::from_str(
            r#"[{"type": "time", "params": ["2h"]}, {"type": "fill", "params": ["0"]}]"#,
        ).unwrap());
        let model = build_model_config(
            &source,
            &influx("influx", "telegraf"),
            "out",
            &ModelConfig::default(),
            &NormalizeBounds::default(),
        );
        assert_eq!(model.span, 12);
        assert_eq!(model.interval, "60s");
        assert_eq!(model.features[0].default, Some(FeatureDefault::Value(0.0)));
    }

    #[test]
    fn test_build_model_config_without_time() {
        let mut source = cpu_target();
        source.group_by = None;
        let model = build_model_config(
            &source,
            &influx("influx", "telegraf"),
            "out",
            &ModelConfig::default(),
            &NormalizeBounds::default(),
        );
        assert_eq!(model.interval, "5s");
        assert_eq!(model.span, 10);
        assert_eq!(model.bucket_interval, "");
    }
}
