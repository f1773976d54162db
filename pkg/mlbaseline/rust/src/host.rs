// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Standalone implementations of the host-side ports, used by the CLI.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::panel::PanelOptions;
use crate::ports::{Notice, NoticeKind, NotificationSink, PanelHost};
use crate::query::TimeRange;

/// Panel options persisted as a JSON file. Every change rewrites the file.
pub struct FilePanelHost {
    path: PathBuf,
    options: Mutex<PanelOptions>,
    time_range: Mutex<Option<TimeRange>>,
}

impl FilePanelHost {
    /// Loads options from `path`, or starts from defaults when the file does
    /// not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let options = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            warn!(
                "panel options file {} not found, starting from defaults",
                path.display()
            );
            PanelOptions::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            options: Mutex::new(options),
            time_range: Mutex::new(None),
        })
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        *self
            .time_range
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, options: &PanelOptions) -> Result<()> {
        let contents = serde_json::to_string_pretty(options)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

impl PanelHost for FilePanelHost {
    fn options(&self) -> PanelOptions {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn on_options_change(&self, options: PanelOptions) {
        if let Err(e) = self.persist(&options) {
            error!("failed to persist panel options: {e:#}");
        }
        *self.options.lock().unwrap_or_else(PoisonError::into_inner) = options;
    }

    fn on_change_time_range(&self, range: TimeRange) {
        info!("time range changed to {}..{}", range.from, range.to);
        *self
            .time_range
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(range);
    }
}

/// Reports notices through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notice: Notice) {
        let detail = notice.detail.as_deref().unwrap_or_default();
        match notice.kind {
            NoticeKind::Success => info!("{}", notice.title),
            NoticeKind::Error if detail.is_empty() => error!("{}", notice.title),
            NoticeKind::Error => error!("{}: {detail}", notice.title),
        }
    }
}
