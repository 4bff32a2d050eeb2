// File: tests/config_wiring_tests.rs
// Purpose: The loaded configuration drives every configurable component

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use medforms::prescription::PRESCRIPTION_DRAFT_KEY;
use medforms::{
    BookingOutcome, DraftSnapshot, DraftStore, FileDraftStore, FormData, MedformsConfig,
    MemoryBridge, PresentationBridge, PrescriptionController, Severity, SubmissionBridge,
    Transport, TransportResponse,
};

fn write_config(dir: &std::path::Path) -> MedformsConfig {
    let draft_dir = dir.join("drafts");
    let config_path = dir.join("medforms.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[autosave]
interval_secs = 1

[toast]
visible_ms = 0
fade_ms = 0

[draft]
dir = "{}"

[booking]
endpoint = "/api/v2/appointments/"
listing_path = "/appointments/upcoming/"
"#,
            draft_dir.display()
        ),
    )
    .unwrap();

    MedformsConfig::load(&config_path).unwrap()
}

struct ConfirmingTransport;

#[async_trait]
impl Transport for ConfirmingTransport {
    async fn post_form(
        &self,
        path: &str,
        _fields: &[(String, String)],
        _csrf_token: &str,
    ) -> Result<TransportResponse> {
        assert_eq!(path, "/api/v2/appointments/");
        Ok(TransportResponse {
            status: 200,
            body: r#"{"scheduled_time":"2026-03-05T14:30:00"}"#.to_string(),
        })
    }
}

#[test]
fn draft_store_and_toast_tray_use_configured_values() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = write_config(temp_dir.path());

    // draft directory comes from the file and is created on demand
    let store = FileDraftStore::from_config(&config).unwrap();
    let mut snapshot = DraftSnapshot::new();
    snapshot.insert("patient", "12");
    store.set(PRESCRIPTION_DRAFT_KEY, &snapshot).unwrap();
    assert!(temp_dir
        .path()
        .join("drafts")
        .join("prescriptionDraft.json")
        .exists());

    // zero-duration toasts expire immediately
    let mut bridge = MemoryBridge::from_config(&config);
    bridge.show_toast("saved", Severity::Info);
    bridge.prune_expired();
    assert!(bridge.toasts().is_empty());
}

#[tokio::test]
async fn submission_bridge_uses_configured_paths() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = write_config(temp_dir.path());

    let mut bridge = SubmissionBridge::from_config(Box::new(ConfirmingTransport), &config);
    let form = FormData::from_fields([("csrfmiddlewaretoken", "tok"), ("doctor", "4")]);

    match bridge.submit(&form).await.unwrap() {
        BookingOutcome::Confirmed { listing_url, .. } => {
            assert_eq!(listing_url, "/appointments/upcoming/");
        }
        BookingOutcome::Failed => panic!("expected confirmation"),
    }
}

#[tokio::test]
async fn autosave_interval_comes_from_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = write_config(temp_dir.path());
    assert_eq!(config.autosave.interval(), Duration::from_secs(1));

    let store: Arc<dyn DraftStore> = Arc::new(FileDraftStore::from_config(&config).unwrap());
    let controller = PrescriptionController::new(store);

    let autosaver = controller.start_autosave_from_config(&config);
    assert!(autosaver.is_running());
    drop(autosaver);
}
