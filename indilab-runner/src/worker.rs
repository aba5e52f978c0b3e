//! ComputeWorker: a dedicated thread that owns one `IndicatorEngine`.
//!
//! Communication is via `mpsc` channels only. Each `Compute` command carries
//! its own reply sender and is answered exactly once. A caller that drops its
//! receiver simply never sees the reply; the worker carries on. A panic inside
//! an indicator is answered as a failure and does not end the thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use indilab_core::{IndicatorEngine, IndicatorRequest};

use crate::config::WorkerConfig;
use crate::envelope::WorkerReply;

/// Caller-chosen correlation id, echoed back on the response.
pub type RequestId = u64;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("worker is not running")]
    Disconnected,
    #[error("worker thread panicked")]
    Panicked,
}

/// Commands sent to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Compute {
        id: RequestId,
        request: Box<IndicatorRequest>,
        reply: Sender<WorkerResponse>,
    },
    Shutdown,
}

/// A reply tagged with the id of the request it answers.
#[derive(Debug, Clone)]
pub struct WorkerResponse {
    pub id: RequestId,
    pub reply: WorkerReply,
}

/// One-shot handle for a submitted request.
#[derive(Debug)]
pub struct PendingReply {
    id: RequestId,
    rx: Receiver<WorkerResponse>,
}

impl PendingReply {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Block until the reply arrives.
    pub fn wait(self) -> Result<WorkerResponse, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Block for at most `timeout`. `Ok(None)` means not ready yet.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>, WorkerError> {
        match self.rx.recv_timeout(timeout) {
            Ok(resp) => Ok(Some(resp)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Non-blocking poll.
    pub fn try_recv(&self) -> Result<Option<WorkerResponse>, WorkerError> {
        match self.rx.try_recv() {
            Ok(resp) => Ok(Some(resp)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

/// Handle to the background worker thread.
///
/// Dropping the handle shuts the worker down and joins it. Requests already
/// queued are answered first.
#[derive(Debug)]
pub struct ComputeWorker {
    tx: Sender<WorkerCommand>,
    handle: Option<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl ComputeWorker {
    /// Spawn the worker thread with its own engine.
    pub fn spawn(engine: IndicatorEngine, config: &WorkerConfig) -> Result<Self, WorkerError> {
        let (tx, rx) = mpsc::channel();
        let name = config.thread_name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(&name, engine, rx))
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            tx,
            handle: Some(handle),
            next_id: AtomicU64::new(1),
        })
    }

    /// Queue a request; the returned handle receives its reply.
    pub fn submit(&self, request: IndicatorRequest) -> Result<PendingReply, WorkerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, rx) = mpsc::channel();
        self.submit_to(id, request, reply)?;
        Ok(PendingReply { id, rx })
    }

    /// Queue a request whose reply goes to a caller-owned channel.
    ///
    /// Lets one receiver collect replies for many requests; `id` tells them
    /// apart.
    pub fn submit_to(
        &self,
        id: RequestId,
        request: IndicatorRequest,
        reply: Sender<WorkerResponse>,
    ) -> Result<(), WorkerError> {
        self.tx
            .send(WorkerCommand::Compute {
                id,
                request: Box::new(request),
                reply,
            })
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Submit and block for the reply.
    pub fn compute(&self, request: IndicatorRequest) -> Result<WorkerReply, WorkerError> {
        Ok(self.submit(request)?.wait()?.reply)
    }

    /// Stop after draining queued requests and wait for the thread to exit.
    pub fn shutdown(mut self) -> Result<(), WorkerError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), WorkerError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // The worker may already be gone; joining tells us how it ended.
        let _ = self.tx.send(WorkerCommand::Shutdown);
        handle.join().map_err(|_| WorkerError::Panicked)
    }
}

impl Drop for ComputeWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "compute worker did not shut down cleanly");
        }
    }
}

fn worker_loop(name: &str, engine: IndicatorEngine, rx: Receiver<WorkerCommand>) {
    info!(thread = name, "compute worker started");
    let mut handled = 0u64;

    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Compute { id, request, reply }) => {
                handle_compute(&engine, id, &request, &reply);
                handled += 1;
            }
        }
    }

    info!(thread = name, handled, "compute worker stopped");
}

fn handle_compute(
    engine: &IndicatorEngine,
    id: RequestId,
    request: &IndicatorRequest,
    reply: &Sender<WorkerResponse>,
) {
    let span = info_span!("request", id, indicator = %request.indicator);
    let _enter = span.enter();

    let started = Instant::now();
    let response = WorkerResponse {
        id,
        reply: WorkerReply::guarded(|| engine.dispatch(request)),
    };
    debug!(
        elapsed_us = started.elapsed().as_micros() as u64,
        success = response.reply.is_success(),
        "request handled"
    );

    if reply.send(response).is_err() {
        debug!("caller dropped reply channel; discarding result");
    }
}
