use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Expectation
// ---------------------------------------------------------------------------

/// What a scenario counts as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The backend must accept the call.
    Success,
    /// The backend must answer with an error response; acceptance fails.
    Failure,
}

// ---------------------------------------------------------------------------
// ScenarioStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    /// The backend could not be reached; nothing was confirmed either way.
    Errored,
    /// Not attempted because an earlier step for the same request failed.
    Skipped,
}

impl ScenarioStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioStatus::Passed => "passed",
            ScenarioStatus::Failed => "failed",
            ScenarioStatus::Errored => "errored",
            ScenarioStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScenarioResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub expectation: Expectation,
    pub status: ScenarioStatus,
    pub message: String,
}

impl ScenarioResult {
    pub fn passed(
        label: impl Into<String>,
        expectation: Expectation,
        message: impl Into<String>,
    ) -> Self {
        Self::with_status(label, expectation, ScenarioStatus::Passed, message)
    }

    pub fn failed(
        label: impl Into<String>,
        expectation: Expectation,
        message: impl Into<String>,
    ) -> Self {
        Self::with_status(label, expectation, ScenarioStatus::Failed, message)
    }

    pub fn errored(
        label: impl Into<String>,
        expectation: Expectation,
        message: impl Into<String>,
    ) -> Self {
        Self::with_status(label, expectation, ScenarioStatus::Errored, message)
    }

    pub fn skipped(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(label, Expectation::Success, ScenarioStatus::Skipped, message)
    }

    fn with_status(
        label: impl Into<String>,
        expectation: Expectation,
        status: ScenarioStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            expectation,
            status,
            message: message.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

/// Append-only record of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Set when a precondition (login) failed and nothing else ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
    #[serde(default)]
    pub results: Vec<ScenarioResult>,
}

impl Report {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            fatal: Some(message.into()),
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: ScenarioResult) {
        tracing::debug!(label = %result.label, status = %result.status, "scenario recorded");
        self.results.push(result);
    }

    pub fn counts(&self) -> Counts {
        let mut c = Counts::default();
        for r in &self.results {
            match r.status {
                ScenarioStatus::Passed => c.passed += 1,
                ScenarioStatus::Failed => c.failed += 1,
                ScenarioStatus::Errored => c.errored += 1,
                ScenarioStatus::Skipped => c.skipped += 1,
            }
        }
        c
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.fatal.is_some() {
            return RunOutcome::FatalPrecondition;
        }
        let c = self.counts();
        if c.errored > 0 {
            RunOutcome::BackendUnreachable
        } else if c.failed > 0 || c.skipped > 0 {
            RunOutcome::ScenarioFailures
        } else {
            RunOutcome::Passed
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome() == RunOutcome::Passed
    }
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Passed,
    ScenarioFailures,
    BackendUnreachable,
    FatalPrecondition,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Passed => 0,
            RunOutcome::FatalPrecondition | RunOutcome::BackendUnreachable => 1,
            RunOutcome::ScenarioFailures => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_passes() {
        let report = Report::default();
        assert!(report.passed());
        assert_eq!(report.outcome().exit_code(), 0);
    }

    #[test]
    fn fatal_trumps_everything() {
        let mut report = Report::fatal("failed to log in: hr");
        report.record(ScenarioResult::passed("x", Expectation::Success, "ok"));
        assert_eq!(report.outcome(), RunOutcome::FatalPrecondition);
        assert_eq!(report.outcome().exit_code(), 1);
    }

    #[test]
    fn errored_outranks_failed() {
        let mut report = Report::default();
        report.record(ScenarioResult::failed("a", Expectation::Success, "no"));
        report.record(ScenarioResult::errored("b", Expectation::Failure, "refused"));
        assert_eq!(report.outcome(), RunOutcome::BackendUnreachable);
    }

    #[test]
    fn skipped_steps_fail_the_run() {
        let mut report = Report::default();
        report.record(ScenarioResult::passed("a", Expectation::Success, "ok"));
        report.record(ScenarioResult::skipped("b", "submission failed"));
        assert_eq!(report.outcome(), RunOutcome::ScenarioFailures);
        assert_eq!(report.outcome().exit_code(), 2);
        let c = report.counts();
        assert_eq!((c.passed, c.skipped), (1, 1));
    }

    #[test]
    fn report_json_shape() {
        let mut report = Report::default();
        report.record(ScenarioResult::passed(
            "past-date rejection",
            Expectation::Failure,
            "HTTP 400: Cannot apply for leave in the past",
        ));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("fatal").is_none());
        assert_eq!(json["results"][0]["expectation"], "failure");
        assert_eq!(json["results"][0]["status"], "passed");
    }
}
