//! Failure artifacts and step-log export: path shape, error masking, and
//! test-level captures.

mod common;

use std::sync::Arc;

use common::{fast_config, MockBackend, MockElement, FAKE_JPEG};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crosstap_core::actions::Ui;
use crosstap_core::config::EngineConfig;
use crosstap_core::descriptor::ElementDescriptor;
use crosstap_core::diagnostics::LogEntry;
use crosstap_core::error::Error;
use crosstap_core::query::Platform;

fn missing_element() -> ElementDescriptor {
    ElementDescriptor::new(
        "ghost-button",
        "id",
        "com.example:id/ghost",
        "accessibilityId",
        "ghost-button",
    )
    .unwrap()
}

fn ui_in(dir: &tempfile::TempDir, backend: Arc<MockBackend>, platform: Platform) -> Ui {
    let config = EngineConfig {
        screenshot_dir: dir.path().to_path_buf(),
        ..fast_config()
    };
    let mut ui = Ui::new(config);
    ui.set_platform(platform);
    ui.set_backend(platform, backend);
    ui
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn strict_failure_writes_platform_subdir_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new();
    let mut ui = ui_in(&dir, backend, Platform::Android);

    let err = ui.click_with_wait(&missing_element()).await.unwrap_err();
    // The original resolution failure is returned, not an artifact error.
    assert!(matches!(err, Error::Timeout { .. }));

    let names = files_in(&dir.path().join("android"));
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("ghost-button-"));
    assert!(names[0].ends_with(".jpg"));
    assert_eq!(
        std::fs::read(dir.path().join("android").join(&names[0])).unwrap(),
        FAKE_JPEG
    );
}

#[tokio::test]
async fn ios_failures_land_under_the_ios_subdir() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new();
    let mut ui = ui_in(&dir, backend, Platform::Ios);

    ui.click_with_wait(&missing_element()).await.unwrap_err();

    assert_eq!(files_in(&dir.path().join("ios")).len(), 1);
    assert!(!dir.path().join("android").exists());
}

#[tokio::test]
async fn test_level_capture_returns_base64_under_fails() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new();
    let mut ui = ui_in(&dir, backend, Platform::Android);

    let encoded = ui.capture_test_failure("login_smoke").await.unwrap();
    assert_eq!(BASE64.decode(encoded).unwrap(), FAKE_JPEG);

    let names = files_in(&dir.path().join("fails"));
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("login_smoke-"));
    assert!(names[0].ends_with(".jpg"));
}

#[tokio::test]
async fn fresh_artifacts_survive_pruning() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new();
    let mut ui = ui_in(&dir, backend, Platform::Android);

    ui.capture_test_failure("recent").await.unwrap();
    let removed = ui.prune_artifacts().unwrap();

    assert_eq!(removed, 0);
    assert_eq!(files_in(&dir.path().join("fails")).len(), 1);
}

#[tokio::test]
async fn step_log_numbers_operations_in_invocation_order() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new();
    backend.add_element("com.example:id/login", MockElement::new("el-1"));
    let login = ElementDescriptor::new(
        "login-button",
        "id",
        "com.example:id/login",
        "accessibilityId",
        "login-button",
    )
    .unwrap();
    let mut ui = ui_in(&dir, backend, Platform::Android);

    ui.find(&login).await.unwrap();
    ui.click_with_wait(&login).await.unwrap();
    // Failures do not append steps.
    ui.click_with_wait(&missing_element()).await.unwrap_err();
    ui.tap_at(30, 40).await.unwrap();

    let entries = ui.step_log().entries();
    let numbers: Vec<u32> = entries.iter().map(|e| e.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(entries[2].message, "Tapped at (30, 40)");

    // Export round-trips through the camelCase JSON shape.
    let json = ui.step_log().to_json();
    assert!(json.contains("\"stepNumber\""));
    let parsed: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 3);

    ui.clear_step_log();
    assert!(ui.step_log().entries().is_empty());
}
