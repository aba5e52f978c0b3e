//! Wire envelope for the worker boundary.
//!
//! Request:  `{ "id"?, "indicator", "data": {..}, "params"? }`
//! Success:  `{ "id"?, "type": "success", "result": { "values", "metadata"? } }`
//! Failure:  `{ "id"?, "type": "error", "error": "...", "kind": "..." }`
//!
//! `id` is an optional caller correlation id echoed back unchanged.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use indilab_core::{EngineError, ErrorKind, IndicatorRequest, IndicatorResult};

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnvelopeError {
    /// Failure reply for a request that could not be parsed.
    pub fn to_reply(&self) -> WorkerReply {
        WorkerReply::Error {
            error: self.to_string(),
            kind: Some(ErrorKind::MalformedInput),
        }
    }
}

/// Exactly one of these answers every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerReply {
    Success {
        result: IndicatorResult,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<ErrorKind>,
    },
}

impl WorkerReply {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkerReply::Success { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            WorkerReply::Success { .. } => None,
            WorkerReply::Error { kind, .. } => *kind,
        }
    }

    /// The result, or the error message of a failure reply.
    pub fn into_result(self) -> Result<IndicatorResult, String> {
        match self {
            WorkerReply::Success { result } => Ok(result),
            WorkerReply::Error { error, .. } => Err(error),
        }
    }
}

impl WorkerReply {
    /// Run `compute` and turn its outcome into a reply. A panic becomes a
    /// failure reply with no kind, so the thread that ran it stays alive.
    pub fn guarded(compute: impl FnOnce() -> Result<IndicatorResult, EngineError>) -> Self {
        match panic::catch_unwind(AssertUnwindSafe(compute)) {
            Ok(outcome) => outcome.into(),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "indicator computation panicked");
                WorkerReply::Error {
                    error: format!("indicator computation panicked: {message}"),
                    kind: None,
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

impl From<Result<IndicatorResult, EngineError>> for WorkerReply {
    fn from(outcome: Result<IndicatorResult, EngineError>) -> Self {
        match outcome {
            Ok(result) => WorkerReply::Success { result },
            Err(err) => WorkerReply::Error {
                error: err.to_string(),
                kind: Some(err.kind()),
            },
        }
    }
}

/// A request with an optional correlation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub request: IndicatorRequest,
}

/// A reply carrying the id of the request it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub reply: WorkerReply,
}

pub fn parse_request(json: &str) -> Result<RequestEnvelope, EnvelopeError> {
    Ok(serde_json::from_str(json)?)
}

pub fn encode_reply(reply: &ReplyEnvelope) -> Result<String, EnvelopeError> {
    Ok(serde_json::to_string(reply)?)
}
