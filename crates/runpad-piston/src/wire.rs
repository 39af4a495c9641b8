//! Wire types for the execution API.
//!
//! ## Learning: `#[serde(default)]`
//!
//! The service omits fields freely (no `stderr` when nothing was written,
//! no `run` when the request was rejected). Defaulting every field keeps
//! deserialization total, and the classification rules decide what an
//! absent field means.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime descriptor: the name and version the service expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Runtime {
    pub language: String,
    pub version: String,
}

impl Runtime {
    pub fn new(language: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.version)
    }
}

/// Body of `POST /execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub language: &'a str,
    pub version: &'a str,
    pub files: Vec<SourceFile<'a>>,
}

impl<'a> ExecuteRequest<'a> {
    /// Builds a request carrying `source` as the single file.
    pub fn new(runtime: &'a Runtime, source: &'a str) -> Self {
        Self {
            language: &runtime.language,
            version: &runtime.version,
            files: vec![SourceFile { content: source }],
        }
    }
}

/// One submitted file. Piston picks a file name when none is given.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile<'a> {
    pub content: &'a str,
}

/// Response of `POST /execute`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteResponse {
    /// Top-level rejection message (bad runtime, malformed request)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Result of the run stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunResult>,
}

/// Result of a single stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunResult {
    /// Exit status; `null` when the process was killed by a signal
    pub code: Option<i64>,

    /// Terminating signal, if any
    pub signal: Option<String>,

    pub stdout: String,
    pub stderr: String,

    /// Interleaved stdout and stderr
    pub output: String,
}

impl RunResult {
    /// True only for an explicit zero exit status.
    pub fn exited_cleanly(&self) -> bool {
        self.code == Some(0)
    }

    /// Text reported for a failed run: stderr, then stdout, then output.
    pub fn failure_text(&self) -> String {
        [&self.stderr, &self.stdout, &self.output]
            .into_iter()
            .find(|s| !s.is_empty())
            .cloned()
            .or_else(|| {
                self.signal
                    .as_ref()
                    .map(|signal| format!("Process terminated by {signal}"))
            })
            .unwrap_or_default()
    }

    /// Text reported for a successful run, trimmed.
    pub fn success_text(&self) -> String {
        let text = if self.output.is_empty() {
            &self.stdout
        } else {
            &self.output
        };
        text.trim().to_string()
    }
}

/// Entry of `GET /runtimes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeInfo {
    pub language: String,
    pub version: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// Backing runtime when it differs from `language` (e.g. `node` for javascript)
    #[serde(default)]
    pub runtime: Option<String>,
}

impl RuntimeInfo {
    /// True when this entry serves the given runtime descriptor.
    pub fn serves(&self, runtime: &Runtime) -> bool {
        self.version == runtime.version
            && (self.language == runtime.language
                || self.aliases.iter().any(|a| *a == runtime.language))
    }
}
