// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Periodic refresh of the attached model's status.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::ModelLifecycle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

pub struct StatusPoller;

impl StatusPoller {
    /// Starts refreshing every `period`, the first time one period from now.
    pub fn spawn(lifecycle: Arc<ModelLifecycle>, period: Duration) -> PollHandle {
        let period = if period.is_zero() {
            warn!("poll interval must be positive, using {DEFAULT_POLL_INTERVAL:?}");
            DEFAULT_POLL_INTERVAL
        } else {
            period
        };
        let token = CancellationToken::new();
        let task = tokio::spawn(poll(lifecycle, period, token.clone()));
        PollHandle {
            token,
            task: Some(task),
        }
    }
}

async fn poll(lifecycle: Arc<ModelLifecycle>, period: Duration, token: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // Skip immediate first tick

    debug!("status poller started (every {period:?})");
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => lifecycle.refresh_status().await,
        }
    }
    debug!("status poller stopped");
}

/// Owns the poll task. Dropping the handle stops polling.
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Cancels polling and waits for the task to finish. A refresh already in
    /// flight runs to completion first.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("status poller task failed: {e}");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
