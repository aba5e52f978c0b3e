//! IndicatorClient: routes requests inline or through the worker.
//!
//! Short series are cheap enough to compute on the calling thread. Anything
//! longer than the configured threshold goes to the `ComputeWorker` so the
//! caller's thread stays responsive.

use tracing::trace;

use indilab_core::{IndicatorEngine, IndicatorRequest};

use crate::config::RunnerConfig;
use crate::envelope::WorkerReply;
use crate::worker::{ComputeWorker, PendingReply, WorkerError};

#[derive(Debug)]
pub struct IndicatorClient {
    engine: IndicatorEngine,
    worker: ComputeWorker,
    inline_threshold: usize,
}

impl IndicatorClient {
    pub fn new(engine: IndicatorEngine, config: &RunnerConfig) -> Result<Self, WorkerError> {
        let worker = ComputeWorker::spawn(engine.clone(), &config.worker)?;
        Ok(Self {
            engine,
            worker,
            inline_threshold: config.worker.inline_threshold,
        })
    }

    pub fn inline_threshold(&self) -> usize {
        self.inline_threshold
    }

    /// Whether `request` would be computed on the calling thread: up to and
    /// including `inline_threshold` bars.
    pub fn routes_inline(&self, request: &IndicatorRequest) -> bool {
        request.bar_count() <= self.inline_threshold
    }

    /// Compute and wait for the reply, inline or via the worker.
    pub fn compute(&self, request: IndicatorRequest) -> Result<WorkerReply, WorkerError> {
        if self.routes_inline(&request) {
            trace!(bars = request.bar_count(), "computing inline");
            Ok(WorkerReply::guarded(|| self.engine.dispatch(&request)))
        } else {
            trace!(bars = request.bar_count(), "computing on worker");
            self.worker.compute(request)
        }
    }

    /// Always hand the request to the worker and return without waiting.
    pub fn submit(&self, request: IndicatorRequest) -> Result<PendingReply, WorkerError> {
        self.worker.submit(request)
    }

    pub fn worker(&self) -> &ComputeWorker {
        &self.worker
    }
}
