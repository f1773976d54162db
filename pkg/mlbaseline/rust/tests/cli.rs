// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

mod helpers;

use helpers::{CONFIG, DISK_MODEL, PANEL_DATA, run_cli, write_file};
use serde_json::Value;

#[test]
fn test_describe_prints_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ml-baseline.yaml", CONFIG);
    let data = write_file(dir.path(), "data.json", PANEL_DATA);
    let panel = dir.path().join("panel.json");

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--panel",
        panel.to_str().unwrap(),
        "describe",
        "--data",
        data.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "describe should succeed");

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["valid"], Value::Bool(true));
    assert_eq!(out["feature"], "max(\"used_percent\")");
    assert_eq!(out["interval"], "1h");
    assert_eq!(out["match_all"], "path = /var");
    assert_eq!(out["fill"], "previous");
    assert_eq!(out["model"]["name"], DISK_MODEL);
    assert_eq!(out["model"]["default_bucket"], "baselines");
    assert_eq!(out["model"]["features"][0]["default"], "previous");
    assert!(!panel.exists(), "describe must not write panel options");
}

#[test]
fn test_describe_reports_invalid_query() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ml-baseline.yaml", CONFIG);
    let data = write_file(
        dir.path(),
        "data.json",
        r#"{"request": {"targets": [{"measurement": "disk"}]}}"#,
    );

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--panel",
        dir.path().join("panel.json").to_str().unwrap(),
        "describe",
        "--data",
        data.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["valid"], Value::Bool(false));
    assert_eq!(out["reason"], "the query has no select clause");
    assert_eq!(out["feature"], "Select one field");
}

#[test]
fn test_create_fails_when_service_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ml-baseline.yaml", CONFIG);
    let data = write_file(dir.path(), "data.json", PANEL_DATA);
    let panel = dir.path().join("panel.json");

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--panel",
        panel.to_str().unwrap(),
        "create",
        "--data",
        data.to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "create should fail without a service");
    assert!(!panel.exists(), "no model should be attached");
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "ml-baseline.yaml", "poll_interval: 0\n");

    let output = run_cli(&["--config", config.to_str().unwrap(), "toggle-run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("poll_interval"), "stderr: {stderr}");
}
