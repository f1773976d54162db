// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::sync::Arc;

use log::debug;

use crate::ports::PanelHost;
use crate::query::TimeRange;

/// Turns graph interactions into option updates on the host.
pub struct PanelController {
    host: Arc<dyn PanelHost>,
}

impl PanelController {
    pub fn new(host: Arc<dyn PanelHost>) -> Self {
        Self { host }
    }

    pub fn on_series_color_change(&self, label: &str, color: &str) {
        debug!("series {label}: color {color}");
        let options = self.host.options().with_series_color(label, color);
        self.host.on_options_change(options);
    }

    pub fn on_series_axis_toggle(&self, label: &str, y_axis: u32) {
        debug!("series {label}: y axis {y_axis}");
        let options = self.host.options().with_series_axis(label, y_axis);
        self.host.on_options_change(options);
    }

    pub fn on_toggle_sort(&self, sort_by: &str) {
        let options = self.host.options().with_sort_toggled(sort_by);
        self.host.on_options_change(options);
    }

    pub fn on_horizontal_region_selected(&self, from: i64, to: i64) {
        self.host.on_change_time_range(TimeRange { from, to });
    }
}
