//! Background capture worker.
//!
//! One tokio task owns the classification loop. Callers queue captures and
//! get a ticket back immediately, so the submitting side never blocks on
//! inference. At most one capture is in flight at a time.

use crate::constants::worker::QUEUE_CAPACITY;
use crate::error::{Error, Result};
use crate::imaging::{QualityMetrics, mirror};
use crate::pipeline::processor::{CaptureContext, CaptureOutcome, decode_image};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct Job {
    path: PathBuf,
    reply: oneshot::Sender<Result<CaptureOutcome>>,
}

/// Pending result of a submitted capture.
#[derive(Debug)]
pub struct CaptureTicket {
    receiver: oneshot::Receiver<Result<CaptureOutcome>>,
}

impl CaptureTicket {
    /// Wait for the capture to finish.
    ///
    /// Returns [`Error::WorkerShutdown`] if the worker stopped before
    /// processing it.
    pub async fn wait(self) -> Result<CaptureOutcome> {
        self.receiver.await.map_err(|_| Error::WorkerShutdown)?
    }
}

/// Handle to the capture worker task.
pub struct CaptureWorker {
    sender: Option<mpsc::Sender<Job>>,
    handle: Option<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
}

impl CaptureWorker {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(context: CaptureContext) -> Self {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let stopping = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(run_loop(context, receiver, Arc::clone(&stopping)));

        Self {
            sender: Some(sender),
            handle: Some(handle),
            stopping,
        }
    }

    /// Queue a capture for classification.
    ///
    /// Waits for queue space if the queue is full.
    pub async fn submit(&self, path: impl Into<PathBuf>) -> Result<CaptureTicket> {
        let sender = self.sender.as_ref().ok_or(Error::WorkerShutdown)?;
        if self.stopping.load(Ordering::Acquire) {
            return Err(Error::WorkerShutdown);
        }

        let (reply, receiver) = oneshot::channel();
        sender
            .send(Job {
                path: path.into(),
                reply,
            })
            .await
            .map_err(|_| Error::WorkerShutdown)?;

        Ok(CaptureTicket { receiver })
    }

    /// Submit a capture and wait for its outcome.
    pub async fn classify(&self, path: impl Into<PathBuf>) -> Result<CaptureOutcome> {
        self.submit(path).await?.wait().await
    }

    /// Stop the worker.
    ///
    /// The in-flight capture runs to completion; captures still queued are
    /// answered with [`Error::WorkerShutdown`]. The model is released before
    /// this returns.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stopping.store(true, Ordering::Release);
        drop(self.sender.take());

        if let Some(handle) = self.handle.take() {
            handle.await.map_err(|e| Error::Internal {
                message: format!("capture worker task failed: {e}"),
            })?;
        }
        Ok(())
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stopping.store(true, Ordering::Release);
        }
    }
}

async fn run_loop(
    context: CaptureContext,
    mut receiver: mpsc::Receiver<Job>,
    stopping: Arc<AtomicBool>,
) {
    debug!("Capture worker started");
    let mut processed = 0usize;

    while let Some(job) = receiver.recv().await {
        if stopping.load(Ordering::Acquire) {
            debug!("Discarding queued capture {}", job.path.display());
            let _ = job.reply.send(Err(Error::WorkerShutdown));
            continue;
        }

        let outcome = run_capture(&context, &job.path).await;
        if let Err(e) = &outcome {
            warn!("{e}");
        }
        processed += 1;

        if job.reply.send(outcome).is_err() {
            debug!("Caller stopped waiting for {}", job.path.display());
        }
    }

    context.classifier.close();
    info!("Capture worker stopped after {processed} capture(s)");
}

/// Decode, gate and classify one capture.
///
/// Both inference passes are issued concurrently; the classifier
/// serialises the model calls, while preprocessing overlaps. The policy
/// runs only once both passes have finished.
async fn run_capture(context: &CaptureContext, path: &Path) -> Result<CaptureOutcome> {
    let started = Instant::now();

    let decode_path = path.to_path_buf();
    let (image, quality) = blocking(move || {
        let image = decode_image(&decode_path)?;
        let quality = QualityMetrics::analyze(&image);
        Ok((Arc::new(image), quality))
    })
    .await?;

    if let Some(rejection) = context.screen(&quality) {
        return Ok(context.rejected(path, quality, rejection, started));
    }

    let original = {
        let classifier = Arc::clone(&context.classifier);
        let image = Arc::clone(&image);
        blocking(move || Ok(classifier.classify(&image)))
    };
    let flipped = {
        let classifier = Arc::clone(&context.classifier);
        let image = Arc::clone(&image);
        blocking(move || Ok(classifier.classify(&mirror(&image))))
    };

    let (original, flipped) = tokio::join!(original, flipped);
    let (original, flipped) = (original?, flipped?);

    Ok(context.conclude(path, quality, &original, &flipped, started))
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal {
            message: format!("capture task failed: {e}"),
        })?
}
