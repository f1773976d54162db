// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Baseline models for time-series dashboard panels.
//!
//! A panel's query target is turned into a Loud ML model definition, created
//! on the ML service if needed, trained on the panel's time range and then
//! started, stopped or forecast on demand. The panel host, the ML service,
//! datasource lookup and user notifications are reached through the traits
//! in [`ports`].

// Correctness
#![deny(clippy::string_slice)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod builder;
pub mod client;
pub mod config;
pub mod controller;
pub mod datasource;
pub mod errors;
pub mod extractors;
pub mod host;
pub mod lifecycle;
pub mod model;
pub mod normalize;
pub mod panel;
pub mod poller;
pub mod ports;
pub mod query;

pub use builder::{build_model_config, model_name};
pub use client::LoudMlClient;
pub use errors::{Error, RemoteOperation, Result};
pub use lifecycle::{BaselineOutcome, LifecycleSettings, ModelLifecycle};
pub use poller::{PollHandle, StatusPoller};
