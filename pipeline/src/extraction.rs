//! Long-lived shared text-extraction worker.
//!
//! OCR engines are expensive to start, so a single worker task owns the
//! engine for the lifetime of the process and serves all verification
//! requests over a channel. Until initialization completes, requests
//! fail fast with `ServiceUnavailable` instead of queueing behind the
//! startup.

use crate::capability::{CapabilityError, TextExtractor};
use crate::error::PipelineError;
use std::future::Future;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info};

/// Capacity of the request channel feeding the worker task.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle of the worker's engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Engine construction still running.
    Starting,
    /// Engine up, requests being served.
    Ready,
    /// Engine construction failed; the worker will never become ready.
    Failed,
}

struct ExtractionJob {
    image: Vec<u8>,
    reply: oneshot::Sender<Result<String, CapabilityError>>,
}

/// Spawns and owns the extraction worker task.
pub struct ExtractionWorker;

impl ExtractionWorker {
    /// Spawn the worker. `init` builds the engine; it runs once, inside
    /// the worker task, so callers are never blocked on startup.
    pub fn spawn<F, Fut>(init: F) -> ExtractionHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Box<dyn TextExtractor>, CapabilityError>> + Send,
    {
        let (request_tx, mut request_rx) = mpsc::channel::<ExtractionJob>(REQUEST_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(WorkerState::Starting);

        tokio::spawn(async move {
            let engine = match init().await {
                Ok(engine) => {
                    info!("text extraction worker ready");
                    let _ = state_tx.send(WorkerState::Ready);
                    engine
                }
                Err(e) => {
                    error!("text extraction engine failed to start: {e}");
                    let _ = state_tx.send(WorkerState::Failed);
                    return;
                }
            };

            // Jobs are served one at a time; the engine is not assumed
            // to be safe for concurrent use.
            while let Some(job) = request_rx.recv().await {
                let result = engine.extract_text(&job.image).await;
                let _ = job.reply.send(result);
            }
        });

        ExtractionHandle {
            request_tx,
            state_rx,
        }
    }
}

/// Cheap-to-clone handle used by every verification request.
#[derive(Clone)]
pub struct ExtractionHandle {
    request_tx: mpsc::Sender<ExtractionJob>,
    state_rx: watch::Receiver<WorkerState>,
}

impl ExtractionHandle {
    /// Whether the engine has finished starting.
    pub fn is_ready(&self) -> bool {
        *self.state_rx.borrow() == WorkerState::Ready
    }

    /// Run OCR over an image.
    ///
    /// Fails fast with `ServiceUnavailable` while the engine is starting
    /// (or if its startup failed) rather than blocking the request.
    pub async fn extract(&self, image: Vec<u8>) -> Result<String, PipelineError> {
        match *self.state_rx.borrow() {
            WorkerState::Ready => {}
            WorkerState::Starting => {
                return Err(PipelineError::ServiceUnavailable(
                    "text extraction worker is still starting".into(),
                ))
            }
            WorkerState::Failed => {
                return Err(PipelineError::ServiceUnavailable(
                    "text extraction worker failed to start".into(),
                ))
            }
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(ExtractionJob {
                image,
                reply: reply_tx,
            })
            .await
            .map_err(|_| PipelineError::Internal("extraction worker stopped".into()))?;

        let result = reply_rx
            .await
            .map_err(|_| PipelineError::Internal("extraction worker dropped request".into()))?;

        result.map_err(|e| PipelineError::Internal(format!("text extraction failed: {e}")))
    }
}
