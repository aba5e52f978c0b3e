//! IndiLab Runner: isolated execution around the indicator engine.
//!
//! This crate builds on `indilab-core` to provide:
//! - A dedicated compute worker reached only through channels
//! - A private rayon pool for independent batch requests
//! - A client that computes short series inline and long ones on the worker
//! - The JSON request/reply envelope used at the worker boundary
//! - TOML runner configuration

pub mod client;
pub mod config;
pub mod envelope;
pub mod pool;
pub mod worker;

pub use client::IndicatorClient;
pub use config::{ConfigError, PoolConfig, RunnerConfig, WorkerConfig, CONFIG_ENV};
pub use envelope::{
    encode_reply, parse_request, EnvelopeError, ReplyEnvelope, RequestEnvelope, WorkerReply,
};
pub use pool::WorkerPool;
pub use worker::{ComputeWorker, PendingReply, RequestId, WorkerCommand, WorkerError, WorkerResponse};
