//! # Runpad Piston
//!
//! Client for the Piston remote code execution API.
//!
//! ## What is Piston?
//!
//! Piston is an HTTP service that compiles or interprets submitted source
//! in a named runtime and reports the exit status plus captured streams:
//! ```json
//! // Request
//! {"language": "python", "version": "3.10.0", "files": [{"content": "print(42)"}]}
//!
//! // Response
//! {"run": {"code": 0, "stdout": "42\n", "stderr": "", "output": "42\n"}}
//!
//! // Rejection
//! {"message": "python-9.9.9 runtime is unknown"}
//! ```
//!
//! ## Learning: Traits as Seams
//!
//! The session controller only sees the [`Executor`] trait, so tests can
//! substitute a scripted executor for the real HTTP client without any
//! network access.

mod client;
mod outcome;
mod wire;

pub use client::{Executor, PistonClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use outcome::{classify, interpret, ExecutionOutcome, GENERIC_FAILURE};
pub use wire::{ExecuteRequest, ExecuteResponse, RunResult, Runtime, RuntimeInfo, SourceFile};

/// Result type for execution requests
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that can occur while talking to the execution service.
///
/// None of these reach the user verbatim; the controller reports them as
/// a generic failure and keeps the detail for the logs.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
