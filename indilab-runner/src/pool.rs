//! WorkerPool: batch computation on a private rayon thread pool.
//!
//! The pool is never the global rayon pool, so a host application's own
//! parallel work is unaffected. Requests in a batch are independent; they
//! complete in any order but replies come back in input order.

use rayon::prelude::*;
use tracing::debug;

use indilab_core::{IndicatorEngine, IndicatorRequest};

use crate::config::PoolConfig;
use crate::envelope::WorkerReply;
use crate::worker::WorkerError;

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    engine: IndicatorEngine,
}

impl WorkerPool {
    pub fn new(engine: IndicatorEngine, config: &PoolConfig) -> Result<Self, WorkerError> {
        let prefix = config.thread_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.resolved_threads())
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        debug!(threads = pool.current_num_threads(), "worker pool ready");
        Ok(Self { pool, engine })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compute every request; `replies[i]` answers `requests[i]`.
    pub fn compute_batch(&self, requests: &[IndicatorRequest]) -> Vec<WorkerReply> {
        let engine = &self.engine;
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|req| WorkerReply::guarded(|| engine.dispatch(req)))
                .collect()
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indilab_core::OhlcSeries;

    fn pool(threads: usize) -> WorkerPool {
        let config = PoolConfig {
            threads,
            ..PoolConfig::default()
        };
        WorkerPool::new(IndicatorEngine::default(), &config).unwrap()
    }

    #[test]
    fn thread_count_follows_config() {
        assert_eq!(pool(2).threads(), 2);
    }

    #[test]
    fn replies_keep_input_order() {
        let pool = pool(4);
        let requests: Vec<IndicatorRequest> = (1..=20)
            .map(|v| {
                IndicatorRequest::new("NUMBER", OhlcSeries::from_closes(&[0.0; 3]))
                    .with_param("value", v as f64)
            })
            .collect();
        let replies = pool.compute_batch(&requests);
        assert_eq!(replies.len(), 20);
        for (i, reply) in replies.into_iter().enumerate() {
            let result = reply.into_result().unwrap();
            assert_eq!(result.values[0], (i + 1) as f64);
        }
    }

    #[test]
    fn failures_do_not_affect_siblings() {
        let pool = pool(2);
        let requests = vec![
            IndicatorRequest::new("SMA", OhlcSeries::from_closes(&[1.0, 2.0])),
            IndicatorRequest::new("NOPE", OhlcSeries::from_closes(&[1.0, 2.0])),
            IndicatorRequest::new("EMA", OhlcSeries::from_closes(&[1.0, 2.0])),
        ];
        let replies = pool.compute_batch(&requests);
        assert!(replies[0].is_success());
        assert!(!replies[1].is_success());
        assert!(replies[2].is_success());
    }

    #[test]
    fn pool_threads_are_named() {
        let config = PoolConfig {
            threads: 1,
            thread_prefix: "indilab-test-pool".into(),
        };
        let pool = WorkerPool::new(IndicatorEngine::default(), &config).unwrap();
        let name = pool.pool.install(|| std::thread::current().name().map(str::to_string));
        assert_eq!(name.as_deref(), Some("indilab-test-pool-0"));
    }
}
