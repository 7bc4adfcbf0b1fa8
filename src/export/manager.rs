use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::draw::PixelBuffer;
use crate::export::{
    dependencies::SaveDependencies,
    file::FileSaveConfig,
    pipeline::{SaveRequest, perform_save},
    types::{ExportError, SaveOutcome, SaveStatus, SaveTicket},
};

/// Shared state for saving paintings off the UI thread.
///
/// Requests carry a copied [`PixelBuffer`] snapshot, so the painting session
/// can keep mutating its raster while a save is in flight. Requests are
/// processed one at a time in submission order.
#[derive(Clone)]
pub struct SaveManager {
    /// Channel for sending save requests.
    request_tx: mpsc::UnboundedSender<SaveRequest>,
    /// Shared status of the current save operation.
    status: Arc<Mutex<SaveStatus>>,
    /// Shared result of the last save (if any).
    last_result: Arc<Mutex<Option<SaveOutcome>>>,
    next_ticket: Arc<AtomicU64>,
    /// Highest ticket the worker has dequeued. Written under `cancelled`.
    last_dequeued: Arc<AtomicU64>,
    /// Queued tickets cancelled before the worker reached them.
    cancelled: Arc<StdMutex<HashSet<SaveTicket>>>,
}

impl SaveManager {
    /// Create a new save manager.
    ///
    /// This spawns a background task that processes save requests.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_dependencies(runtime_handle, SaveDependencies::default())
    }

    /// Create a save manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: SaveDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<SaveRequest>();
        let status = Arc::new(Mutex::new(SaveStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let cancelled = Arc::new(StdMutex::new(HashSet::new()));
        let last_dequeued = Arc::new(AtomicU64::new(0));
        let dependencies = Arc::new(dependencies);

        let status_clone = status.clone();
        let result_clone = last_result.clone();
        let cancelled_clone = cancelled.clone();
        let dequeued_clone = last_dequeued.clone();
        let deps_clone = dependencies.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing save request: {:?}", request);
                let ticket = request.ticket;

                let was_cancelled = {
                    let mut cancelled = cancelled_clone
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    dequeued_clone.store(ticket.0, Ordering::Relaxed);
                    cancelled.remove(&ticket)
                };

                let (status, outcome) = if was_cancelled {
                    log::info!("{}", ExportError::Cancelled(ticket));
                    (SaveStatus::Cancelled, SaveOutcome::Cancelled(ticket))
                } else {
                    *status_clone.lock().await = SaveStatus::InProgress;
                    match perform_save(request, deps_clone.clone()).await {
                        Ok(result) => {
                            log::info!("Save {} successful: {}", ticket, result.path.display());
                            (SaveStatus::Success, SaveOutcome::Success(result))
                        }
                        Err(e) => {
                            let error_message = e.to_string();
                            log::error!("Save {} failed: {}", ticket, error_message);
                            (
                                SaveStatus::Failed(error_message.clone()),
                                SaveOutcome::Failed(ticket, error_message),
                            )
                        }
                    }
                };

                *status_clone.lock().await = status;
                *result_clone.lock().await = Some(outcome.clone());
                deps_clone.notifier.notify(&outcome).await;
            }
            log::debug!("Save worker stopped");
        });

        Self {
            request_tx,
            status,
            last_result,
            next_ticket: Arc::new(AtomicU64::new(1)),
            last_dequeued,
            cancelled,
        }
    }

    /// Queue a snapshot for saving.
    ///
    /// This is non-blocking and returns immediately with the request's ticket.
    pub fn request_save(
        &self,
        pixels: PixelBuffer,
        config: FileSaveConfig,
    ) -> Result<SaveTicket, ExportError> {
        let ticket = SaveTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let request = SaveRequest {
            ticket,
            pixels,
            config,
        };

        self.request_tx
            .send(request)
            .map_err(|_| ExportError::WorkerStopped)?;

        Ok(ticket)
    }

    /// Best-effort cancellation.
    ///
    /// A request the worker has not picked up yet finishes as
    /// [`SaveOutcome::Cancelled`]; one already running completes normally.
    /// Returns `false` for tickets that were never issued or are already
    /// dequeued, which are not recorded.
    pub fn cancel(&self, ticket: SaveTicket) -> bool {
        let mut cancelled = self
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let issued = ticket.0 > 0 && ticket.0 < self.next_ticket.load(Ordering::Relaxed);
        let queued = ticket.0 > self.last_dequeued.load(Ordering::Relaxed);
        if !(issued && queued) {
            log::debug!("Ignoring cancel for {}: not queued", ticket);
            return false;
        }
        cancelled.insert(ticket)
    }

    /// Get the current save status.
    pub async fn get_status(&self) -> SaveStatus {
        self.status.lock().await.clone()
    }

    /// Get the result of the last save and clear it.
    pub async fn take_result(&self) -> Option<SaveOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<SaveOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Polls until an outcome is available or `timeout` elapses.
    pub async fn wait_for_result(&self, timeout: Duration) -> Option<SaveOutcome> {
        let poll = async {
            loop {
                if let Some(outcome) = self.take_result().await {
                    return outcome;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.ok()
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = SaveStatus::Idle;
    }
}

#[cfg(test)]
impl SaveManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<SaveRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(SaveStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
            next_ticket: Arc::new(AtomicU64::new(1)),
            last_dequeued: Arc::new(AtomicU64::new(0)),
            cancelled: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    pub(crate) fn pending_cancellations(&self) -> usize {
        self.cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
