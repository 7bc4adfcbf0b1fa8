use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    thread,
};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::time::{Duration, sleep};

use super::{
    dependencies::{ImageEncoder, ImageSaver, SaveDependencies, SaveNotifier},
    file::FileSaveConfig,
    manager::SaveManager,
    pipeline::{SaveRequest, perform_save},
    types::{ExportError, SaveOutcome, SaveStatus, SaveTicket},
};
use crate::config::ExportFormat;
use crate::draw::PixelBuffer;
use crate::draw::color::RED;

#[derive(Clone)]
struct MockEncoder {
    should_fail: bool,
    calls: Arc<Mutex<usize>>,
}

impl ImageEncoder for MockEncoder {
    fn encode(&self, pixels: &PixelBuffer, _format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            Err(ExportError::Encode("encoder exploded".to_string()))
        } else {
            Ok(vec![0; (pixels.width() * pixels.height()) as usize])
        }
    }
}

#[derive(Clone)]
struct MockSaver {
    should_fail: bool,
    delay: Duration,
    path: PathBuf,
    calls: Arc<Mutex<usize>>,
}

impl ImageSaver for MockSaver {
    fn save(&self, _image_data: &[u8], _config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
        thread::sleep(self.delay);
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            Err(ExportError::Io(std::io::Error::other("save failed")))
        } else {
            Ok(self.path.clone())
        }
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    outcomes: Arc<Mutex<Vec<SaveOutcome>>>,
}

#[async_trait]
impl SaveNotifier for RecordingNotifier {
    async fn notify(&self, outcome: &SaveOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}

impl RecordingNotifier {
    async fn wait_for(&self, count: usize) -> Vec<SaveOutcome> {
        for _ in 0..100 {
            if self.outcomes.lock().unwrap().len() >= count {
                break;
            }
            sleep(Duration::from_millis(20)).await;
        }
        self.outcomes.lock().unwrap().clone()
    }
}

fn mock_dependencies(
    encoder_fails: bool,
    saver_fails: bool,
    delay: Duration,
) -> (SaveDependencies, MockSaver, RecordingNotifier) {
    let encoder = MockEncoder {
        should_fail: encoder_fails,
        calls: Arc::new(Mutex::new(0)),
    };
    let saver = MockSaver {
        should_fail: saver_fails,
        delay,
        path: PathBuf::from("/tmp/painting.png"),
        calls: Arc::new(Mutex::new(0)),
    };
    let notifier = RecordingNotifier::default();
    let deps = SaveDependencies {
        encoder: Arc::new(encoder),
        saver: Arc::new(saver.clone()),
        notifier: Arc::new(notifier.clone()),
    };
    (deps, saver, notifier)
}

fn snapshot() -> PixelBuffer {
    PixelBuffer::filled(4, 4, RED)
}

#[tokio::test]
async fn test_save_manager_creation() {
    let manager = SaveManager::new(&tokio::runtime::Handle::current());
    assert_eq!(manager.get_status().await, SaveStatus::Idle);
}

#[tokio::test]
async fn test_perform_save_success() {
    let (deps, saver, _) = mock_dependencies(false, false, Duration::ZERO);
    let request = SaveRequest {
        ticket: SaveTicket(7),
        pixels: snapshot(),
        config: FileSaveConfig::default(),
    };

    let result = perform_save(request, Arc::new(deps)).await.unwrap();
    assert_eq!(result.ticket, SaveTicket(7));
    assert_eq!(result.path, PathBuf::from("/tmp/painting.png"));
    assert_eq!(result.bytes_written, 16);
    assert_eq!(*saver.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_perform_save_encode_failure_skips_saver() {
    let (deps, saver, _) = mock_dependencies(true, false, Duration::ZERO);
    let request = SaveRequest {
        ticket: SaveTicket(1),
        pixels: snapshot(),
        config: FileSaveConfig::default(),
    };

    let err = perform_save(request, Arc::new(deps)).await.unwrap_err();
    assert!(matches!(err, ExportError::Encode(ref msg) if msg.contains("exploded")));
    assert_eq!(*saver.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_save_manager_with_dependencies() {
    let (deps, _, notifier) = mock_dependencies(false, false, Duration::ZERO);
    let manager = SaveManager::with_dependencies(&tokio::runtime::Handle::current(), deps);

    let ticket = manager
        .request_save(snapshot(), FileSaveConfig::default())
        .unwrap();

    let outcome = manager.wait_for_result(Duration::from_secs(2)).await;
    match outcome {
        Some(SaveOutcome::Success(result)) => {
            assert_eq!(result.ticket, ticket);
            assert_eq!(result.path, PathBuf::from("/tmp/painting.png"));
        }
        other => panic!("Expected success outcome, got {:?}", other),
    }
    assert_eq!(manager.get_status().await, SaveStatus::Success);
    assert_eq!(notifier.wait_for(1).await.len(), 1);
}

#[tokio::test]
async fn save_manager_records_failure_status() {
    let (deps, _, notifier) = mock_dependencies(false, true, Duration::ZERO);
    let manager = SaveManager::with_dependencies(&tokio::runtime::Handle::current(), deps);

    manager
        .request_save(snapshot(), FileSaveConfig::default())
        .unwrap();

    let outcomes = notifier.wait_for(1).await;
    match outcomes.first() {
        Some(SaveOutcome::Failed(_, msg)) => {
            assert!(msg.contains("save failed"), "unexpected failure message: {msg}");
        }
        other => panic!("Expected failure outcome, got {other:?}"),
    }
    assert!(matches!(manager.get_status().await, SaveStatus::Failed(_)));
}

#[tokio::test]
async fn cancel_skips_requests_not_yet_started() {
    let (deps, saver, notifier) = mock_dependencies(false, false, Duration::from_millis(200));
    let manager = SaveManager::with_dependencies(&tokio::runtime::Handle::current(), deps);

    let first = manager
        .request_save(snapshot(), FileSaveConfig::default())
        .unwrap();
    let second = manager
        .request_save(snapshot(), FileSaveConfig::default())
        .unwrap();
    assert_ne!(first, second);
    assert!(manager.cancel(second));

    let outcomes = notifier.wait_for(2).await;
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(&outcomes[0], SaveOutcome::Success(r) if r.ticket == first));
    assert_eq!(outcomes[1], SaveOutcome::Cancelled(second));
    assert_eq!(*saver.calls.lock().unwrap(), 1);
    assert_eq!(manager.get_status().await, SaveStatus::Cancelled);
    assert_eq!(manager.pending_cancellations(), 0);
}

#[tokio::test]
async fn cancel_ignores_unknown_and_finished_tickets() {
    let (deps, _, notifier) = mock_dependencies(false, false, Duration::ZERO);
    let manager = SaveManager::with_dependencies(&tokio::runtime::Handle::current(), deps);

    for never_issued in [SaveTicket(0), SaveTicket(1), SaveTicket(u64::MAX)] {
        assert!(!manager.cancel(never_issued));
    }
    assert_eq!(manager.pending_cancellations(), 0);

    let ticket = manager
        .request_save(snapshot(), FileSaveConfig::default())
        .unwrap();
    let outcomes = notifier.wait_for(1).await;
    assert!(matches!(&outcomes[0], SaveOutcome::Success(r) if r.ticket == ticket));

    assert!(!manager.cancel(ticket));
    assert_eq!(manager.pending_cancellations(), 0);
}

#[test]
fn request_save_returns_error_when_channel_closed() {
    let manager = SaveManager::with_closed_channel_for_test();
    let err = manager
        .request_save(snapshot(), FileSaveConfig::default())
        .expect_err("should fail when channel closed");
    assert!(
        matches!(err, ExportError::WorkerStopped),
        "unexpected error variant: {err:?}"
    );
}

#[tokio::test]
async fn default_dependencies_write_a_real_png() {
    let dir = TempDir::new().unwrap();
    let manager = SaveManager::new(&tokio::runtime::Handle::current());
    let config = FileSaveConfig::for_path(&dir.path().join("out").join("final.png"));

    manager.request_save(snapshot(), config).unwrap();
    let outcome = manager.wait_for_result(Duration::from_secs(5)).await;

    let Some(SaveOutcome::Success(result)) = outcome else {
        panic!("Expected success outcome, got {outcome:?}");
    };
    assert!(result.path.ends_with("final.png"));
    let bytes = std::fs::read(&result.path).unwrap();
    assert_eq!(bytes.len(), result.bytes_written);
    let decoded = super::file::decode_image(&bytes).unwrap();
    assert_eq!(decoded, snapshot());
}
