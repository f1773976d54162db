// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Pure readers over a single query target.
//!
//! Nothing in here fails: absent `select`, `groupBy` or `tags` simply yield
//! `None` (or an empty collection), and callers pick a fallback.

use std::fmt;

use crate::datasource::Datasource;
use crate::model::{FeatureDefault, TagMatch};
use crate::query::{PanelData, QueryTarget, SelectPart};

const DEFAULT_METRIC: &str = "mean";

const FEATURE_PROMPT: &str = "Select one field";
const INTERVAL_PROMPT: &str = "Select a 'Group by' value";
const TAGS_PROMPT: &str = "(Optional) Select 'Tag(s)' or WHERE statement";
const FILL_PROMPT: &str = "Select a 'Fill' value";

/// Select parts that decorate an expression instead of aggregating it.
fn is_decorator(part: &SelectPart) -> bool {
    matches!(part.kind.as_str(), "field" | "alias" | "math")
}

fn first_field(target: &QueryTarget) -> Option<String> {
    target
        .first_select()?
        .iter()
        .find(|p| p.is_field())?
        .first_param()
        .filter(|f| !f.is_empty())
}

fn first_function(target: &QueryTarget) -> Option<String> {
    target
        .first_select()?
        .iter()
        .find(|p| !is_decorator(p))
        .map(|p| p.kind.clone())
}

/// InfluxQL rendering of the first select clause, e.g. `mean("usage_idle")`.
pub fn feature_expression(target: &QueryTarget) -> Option<String> {
    let parts = target.first_select()?;
    let field = first_field(target)?;

    let mut expr = format!("\"{field}\"");
    let mut alias = None;
    for part in parts.iter().filter(|p| !p.is_field()) {
        match part.kind.as_str() {
            "alias" => alias = part.first_param(),
            "math" => {
                if let Some(op) = part.first_param() {
                    expr = format!("{expr} {op}");
                }
            }
            kind if part.params.is_empty() => expr = format!("{kind}({expr})"),
            kind => {
                let args: Vec<String> = part.params.iter().map(|p| p.to_string()).collect();
                expr = format!("{kind}({expr}, {})", args.join(", "));
            }
        }
    }

    Some(match alias {
        Some(alias) => format!("{expr} AS {alias}"),
        None => expr,
    })
}

/// Raw duration of the `time` group-by clause, e.g. `5m`.
pub fn group_by_interval(target: &QueryTarget) -> Option<String> {
    target
        .group_by_kind("time")?
        .first_param()
        .filter(|p| !p.is_empty())
}

/// Raw parameter of the `fill` group-by clause.
pub fn fill_value(target: &QueryTarget) -> Option<String> {
    target
        .group_by_kind("fill")?
        .first_param()
        .filter(|p| !p.is_empty())
}

/// `host = server01 AND cpu = cpu-total`
pub fn format_tags(target: &QueryTarget) -> Option<String> {
    let tags = target.tags();
    if tags.is_empty() {
        return None;
    }

    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(tag.condition.as_deref().unwrap_or("AND"));
            out.push(' ');
        }
        out.push_str(&format!("{} {} {}", tag.key, tag.operator(), tag.value));
    }
    Some(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NoTargets,
    MissingSelect,
    MissingField,
    MissingTimeGroupBy,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NoTargets => write!(f, "no query is defined"),
            InvalidReason::MissingSelect => write!(f, "the query has no select clause"),
            InvalidReason::MissingField => write!(f, "the select clause has no field"),
            InvalidReason::MissingTimeGroupBy => {
                write!(f, "the query has no 'Group by' time interval")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(InvalidReason),
}

impl Validation {
    pub fn is_valid(self) -> bool {
        self == Validation::Valid
    }

    pub fn into_result(self) -> Result<(), InvalidReason> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(reason) => Err(reason),
        }
    }
}

/// Checks that the first target carries enough to build a model: a select
/// clause naming a field, and a time group-by.
pub fn validate(targets: &[QueryTarget]) -> Validation {
    let Some(target) = targets.first() else {
        return Validation::Invalid(InvalidReason::NoTargets);
    };
    match target.first_select() {
        None | Some([]) => return Validation::Invalid(InvalidReason::MissingSelect),
        Some(_) => {}
    }
    if first_field(target).is_none() {
        return Validation::Invalid(InvalidReason::MissingField);
    }
    if group_by_interval(target).is_none() {
        return Validation::Invalid(InvalidReason::MissingTimeGroupBy);
    }
    Validation::Valid
}

pub fn is_valid(targets: &[QueryTarget]) -> bool {
    validate(targets).is_valid()
}

/// Database component of the model name. Taken from the resolved data
/// source, not from the target.
pub fn model_database(datasource: &Datasource) -> Option<String> {
    [
        datasource.database.as_deref(),
        datasource.default_bucket.as_deref(),
        Some(datasource.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .map(str::to_string)
}

pub fn model_measurement(target: &QueryTarget) -> Option<String> {
    target.measurement.clone().filter(|m| !m.is_empty())
}

/// `mean_usage_idle`, or the bare field when no function is applied.
pub fn model_select(target: &QueryTarget) -> Option<String> {
    let field = first_field(target)?;
    Some(match first_function(target) {
        Some(func) => format!("{func}_{field}"),
        None => field,
    })
}

pub fn model_feature(target: &QueryTarget) -> Option<String> {
    first_field(target)
}

/// Aggregation function of the first select clause, `mean` when none is set.
pub fn model_func(target: &QueryTarget) -> String {
    first_function(target).unwrap_or_else(|| DEFAULT_METRIC.to_string())
}

pub fn model_fill(target: &QueryTarget) -> Option<FeatureDefault> {
    let fill = fill_value(target)?;
    match fill.as_str() {
        "previous" => Some(FeatureDefault::Previous),
        other => other.parse::<f64>().ok().map(FeatureDefault::Value),
    }
}

pub fn model_time(target: &QueryTarget) -> Option<String> {
    group_by_interval(target)
}

/// The time clause reduced to identifier characters (`$__interval` → `__interval`).
pub fn model_time_format(target: &QueryTarget) -> Option<String> {
    let time = model_time(target)?;
    let formatted: String = time
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!formatted.is_empty()).then_some(formatted)
}

fn equality_tags(target: &QueryTarget) -> impl Iterator<Item = &crate::query::TagFilter> {
    target
        .tags()
        .iter()
        .filter(|t| t.operator() == "=" && !t.is_regex() && !t.key.is_empty())
}

/// `host_server01_cpu_cpu-total`
pub fn model_tags(target: &QueryTarget) -> Option<String> {
    let parts: Vec<String> = equality_tags(target)
        .map(|t| format!("{}_{}", t.key, t.value))
        .collect();
    (!parts.is_empty()).then(|| parts.join("_"))
}

pub fn model_tags_map(target: &QueryTarget) -> Vec<TagMatch> {
    equality_tags(target)
        .map(|t| TagMatch {
            tag: t.key.clone(),
            value: t.value.clone(),
        })
        .collect()
}

/// The strings shown next to the "create model" action, each with a prompt
/// when the query does not provide the value yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipSummary {
    pub feature: String,
    pub interval: String,
    pub match_all: String,
    pub fill: String,
}

impl TooltipSummary {
    pub fn from_data(data: &PanelData) -> Self {
        Self::from_targets(data.targets())
    }

    pub fn from_targets(targets: &[QueryTarget]) -> Self {
        let target = targets.first();
        let extract = |f: fn(&QueryTarget) -> Option<String>, prompt: &str| {
            target.and_then(f).unwrap_or_else(|| prompt.to_string())
        };
        Self {
            feature: extract(feature_expression, FEATURE_PROMPT),
            interval: extract(group_by_interval, INTERVAL_PROMPT),
            match_all: extract(format_tags, TAGS_PROMPT),
            fill: extract(fill_value, FILL_PROMPT),
        }
    }
}
