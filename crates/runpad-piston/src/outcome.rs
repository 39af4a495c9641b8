//! Interpreting execution responses.

use serde::{Deserialize, Serialize};

use crate::wire::ExecuteResponse;
use crate::{ExecError, ExecResult};

/// Message shown for any failure that never produced a usable response.
pub const GENERIC_FAILURE: &str = "Error running code";

/// Terminal result of one run attempt.
///
/// "No outcome yet" is modelled by the caller as `Option<ExecutionOutcome>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum ExecutionOutcome {
    /// Program exited with status 0; holds the trimmed output
    Success(String),
    /// Request was rejected, the program failed, or the transport broke
    Failure(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The output or the error message.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

/// Classifies a parsed response.
///
/// A top-level `message` wins outright; the run stage is not looked at.
/// Otherwise a non-zero (or missing) exit code is a failure carrying stderr,
/// falling back to stdout, and a clean exit is a success carrying the
/// trimmed output.
pub fn classify(response: ExecuteResponse) -> ExecResult<ExecutionOutcome> {
    if let Some(message) = response.message.filter(|m| !m.is_empty()) {
        return Ok(ExecutionOutcome::Failure(message));
    }

    let run = response.run.ok_or_else(|| {
        ExecError::MalformedResponse("neither `message` nor `run` present".to_string())
    })?;

    if !run.exited_cleanly() {
        return Ok(ExecutionOutcome::Failure(run.failure_text()));
    }

    Ok(ExecutionOutcome::Success(run.success_text()))
}

/// Turns the result of a request into an outcome.
///
/// Transport and decoding errors collapse to [`GENERIC_FAILURE`]; the cause
/// is only logged.
pub fn interpret(result: ExecResult<ExecuteResponse>) -> ExecutionOutcome {
    match result.and_then(classify) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("Error running code: {}", err);
            ExecutionOutcome::Failure(GENERIC_FAILURE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ExecuteResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_success_is_trimmed() {
        let outcome = classify(parse(r#"{"run": {"code": 0, "output": "  42  "}}"#)).unwrap();
        assert_eq!(outcome, ExecutionOutcome::Success("42".to_string()));
    }

    #[test]
    fn test_success_falls_back_to_stdout() {
        let outcome = classify(parse(r#"{"run": {"code": 0, "stdout": "ok\n"}}"#)).unwrap();
        assert_eq!(outcome, ExecutionOutcome::Success("ok".to_string()));
    }

    #[test]
    fn test_stderr_wins_over_stdout() {
        let outcome = classify(parse(
            r#"{"run": {"code": 1, "stdout": "partial", "stderr": "boom"}}"#,
        ))
        .unwrap();
        assert_eq!(outcome, ExecutionOutcome::Failure("boom".to_string()));
    }

    #[test]
    fn test_empty_stderr_falls_back_to_stdout() {
        let outcome = classify(parse(
            r#"{"run": {"code": 1, "stdout": "partial", "stderr": ""}}"#,
        ))
        .unwrap();
        assert_eq!(outcome, ExecutionOutcome::Failure("partial".to_string()));
    }

    #[test]
    fn test_failure_is_not_trimmed() {
        let outcome = classify(parse(
            r#"{"run": {"code": 2, "stderr": "  Traceback\n"}}"#,
        ))
        .unwrap();
        assert_eq!(outcome.text(), "  Traceback\n");
    }

    #[test]
    fn test_message_short_circuits_run() {
        let outcome = classify(parse(
            r#"{"message": "Unsupported version", "run": {"code": 0, "output": "ignored"}}"#,
        ))
        .unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Failure("Unsupported version".to_string())
        );
    }

    #[test]
    fn test_top_level_message() {
        let outcome = classify(parse(r#"{"message": "Unsupported version"}"#)).unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Failure("Unsupported version".to_string())
        );
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let err = classify(parse("{}")).unwrap_err();
        assert!(matches!(err, ExecError::MalformedResponse(_)));
    }

    #[test]
    fn test_interpret_hides_transport_detail() {
        let err = serde_json::from_str::<ExecuteResponse>("<html>").unwrap_err();
        let outcome = interpret(Err(ExecError::Json(err)));
        assert_eq!(outcome, ExecutionOutcome::Failure(GENERIC_FAILURE.to_string()));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&ExecutionOutcome::Success("42".into())).unwrap();
        assert_eq!(json, r#"{"status":"success","text":"42"}"#);
    }
}
