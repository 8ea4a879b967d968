//! Turns backend answers into [`ScenarioResult`]s.
//!
//! Each check is tagged with an [`Expectation`]. For `Success` an accepted
//! call passes; for `Failure` an error response passes and acceptance
//! fails. Under either expectation a transport error is `Errored`, since
//! an unreachable backend confirms nothing.

use crate::client::BackendClient;
use crate::driver::submit_application;
use crate::error::{Result, VerifyError};
use crate::report::{Expectation, ScenarioResult};
use crate::session::Session;
use crate::types::{Decision, LeaveApplication, LeaveId, LeaveRecord, LeaveRequest, LeaveStatus};
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A standalone submission with a declared expectation.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub label: String,
    pub application: LeaveApplication,
    pub expectation: Expectation,
}

/// Business-rule checks the backend must enforce.
pub fn edge_case_scenarios(today: NaiveDate) -> Vec<Scenario> {
    vec![
        Scenario {
            label: "past-date rejection".to_string(),
            application: LeaveApplication::backdated(today, "Time Travel"),
            expectation: Expectation::Failure,
        },
        Scenario {
            label: "inverted date range rejection".to_string(),
            application: LeaveApplication::inverted(today, "Backwards Range"),
            expectation: Expectation::Failure,
        },
    ]
}

pub fn run_scenario(
    client: &BackendClient,
    session: &Session,
    scenario: &Scenario,
) -> ScenarioResult {
    let outcome = submit_application(client, session, &scenario.application);
    assert_submission(&scenario.label, scenario.expectation, &outcome)
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

pub fn assert_submission(
    label: &str,
    expectation: Expectation,
    outcome: &Result<LeaveRequest>,
) -> ScenarioResult {
    match (expectation, outcome) {
        (_, Err(e)) if e.is_transport() => {
            ScenarioResult::errored(label, expectation, e.to_string())
        }

        (Expectation::Success, Ok(req)) if req.status == LeaveStatus::Pending => {
            ScenarioResult::passed(label, expectation, format!("submitted as id {}", req.id))
        }
        (Expectation::Success, Ok(req)) => ScenarioResult::failed(
            label,
            expectation,
            format!("id {} came back {}, expected PENDING", req.id, req.status),
        ),
        (Expectation::Success, Err(e)) => ScenarioResult::failed(label, expectation, e.to_string()),

        (Expectation::Failure, Ok(req)) => ScenarioResult::failed(
            label,
            expectation,
            format!("backend accepted the request (id {})", req.id),
        ),
        (Expectation::Failure, Err(VerifyError::Rejected { status, message, .. })) => {
            if message.trim().is_empty() {
                ScenarioResult::failed(
                    label,
                    expectation,
                    format!("rejected with HTTP {status} but no message"),
                )
            } else {
                ScenarioResult::passed(
                    label,
                    expectation,
                    format!("rejected with HTTP {status}: {message}"),
                )
            }
        }
        (Expectation::Failure, Err(e)) => ScenarioResult::failed(label, expectation, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Ask the backend to move `id` to the decision's status.
pub fn update_status(
    client: &BackendClient,
    reviewer: &Session,
    id: LeaveId,
    decision: Decision,
) -> Result<LeaveRecord> {
    tracing::info!(reviewer = reviewer.actor(), %id, target = %decision, "updating status");
    client.update_status(reviewer.token(), id, decision.target_status())
}

/// The returned status must equal the one requested. Legality of the
/// transition is the backend's business; only silent coercion is flagged.
pub fn assert_transition(
    label: &str,
    decision: Decision,
    outcome: &Result<LeaveRecord>,
) -> ScenarioResult {
    let target = decision.target_status();
    match outcome {
        Ok(record) if record.status == target => ScenarioResult::passed(
            label,
            Expectation::Success,
            format!("new status {}", record.status),
        ),
        Ok(record) if !record.status.is_terminal() => ScenarioResult::failed(
            label,
            Expectation::Success,
            format!("status {} is not a terminal review state", record.status),
        ),
        Ok(record) => ScenarioResult::failed(
            label,
            Expectation::Success,
            format!("requested {target}, backend reports {}", record.status),
        ),
        Err(e) if e.is_transport() => {
            ScenarioResult::errored(label, Expectation::Success, e.to_string())
        }
        Err(e) => ScenarioResult::failed(label, Expectation::Success, e.to_string()),
    }
}

/// The owner's own history must show the decision too.
pub fn assert_owner_sees(
    label: &str,
    id: LeaveId,
    decision: Decision,
    history: &Result<Vec<LeaveRecord>>,
) -> ScenarioResult {
    let target = decision.target_status();
    match history {
        Ok(records) => match records.iter().find(|r| r.id == id) {
            Some(r) if r.status == target => ScenarioResult::passed(
                label,
                Expectation::Success,
                format!("owner sees {}", r.status),
            ),
            Some(r) => ScenarioResult::failed(
                label,
                Expectation::Success,
                format!("owner sees {}, expected {target}", r.status),
            ),
            None => ScenarioResult::failed(
                label,
                Expectation::Success,
                format!("id {id} missing from owner's history"),
            ),
        },
        Err(e) if e.is_transport() => {
            ScenarioResult::errored(label, Expectation::Success, e.to_string())
        }
        Err(e) => ScenarioResult::failed(label, Expectation::Success, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ScenarioStatus;
    use std::time::Duration;

    fn request(status: LeaveStatus) -> LeaveRequest {
        let day = "2030-01-02".parse().unwrap();
        LeaveRequest {
            id: LeaveId(9),
            actor: "employee1".to_string(),
            start_date: day,
            end_date: day,
            reason: "r".to_string(),
            status,
        }
    }

    fn record(id: i64, status: LeaveStatus) -> LeaveRecord {
        LeaveRecord {
            id: LeaveId(id),
            start_date: None,
            end_date: None,
            reason: None,
            status,
            user: None,
        }
    }

    fn rejected(message: &str) -> VerifyError {
        VerifyError::Rejected {
            operation: "submit leave",
            status: 400,
            message: message.to_string(),
        }
    }

    fn transport_error() -> VerifyError {
        let client =
            BackendClient::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
        client.login("a@b.c", "pw").unwrap_err()
    }

    #[test]
    fn expected_success_passes_on_pending() {
        let submitted = Ok(request(LeaveStatus::Pending));
        let r = assert_submission("submit", Expectation::Success, &submitted);
        assert_eq!(r.status, ScenarioStatus::Passed);
    }

    #[test]
    fn expected_success_fails_on_non_pending_initial_status() {
        let submitted = Ok(request(LeaveStatus::Approved));
        let r = assert_submission("submit", Expectation::Success, &submitted);
        assert_eq!(r.status, ScenarioStatus::Failed);
        assert!(r.message.contains("expected PENDING"));
    }

    #[test]
    fn expected_failure_passes_on_rejection_with_message() {
        let r = assert_submission(
            "past",
            Expectation::Failure,
            &Err(rejected("Cannot apply for leave in the past")),
        );
        assert_eq!(r.status, ScenarioStatus::Passed);
        assert!(r.message.contains("Cannot apply for leave in the past"));
    }

    #[test]
    fn expected_failure_fails_when_backend_accepts() {
        let r = assert_submission("past", Expectation::Failure, &Ok(request(LeaveStatus::Pending)));
        assert_eq!(r.status, ScenarioStatus::Failed);
        assert!(r.message.contains("accepted"));
    }

    #[test]
    fn expected_failure_needs_a_message() {
        let r = assert_submission("past", Expectation::Failure, &Err(rejected("  ")));
        assert_eq!(r.status, ScenarioStatus::Failed);
    }

    #[test]
    fn transport_error_is_errored_under_either_expectation() {
        for exp in [Expectation::Success, Expectation::Failure] {
            let r = assert_submission("x", exp, &Err(transport_error()));
            assert_eq!(r.status, ScenarioStatus::Errored);
        }
    }

    #[test]
    fn transition_must_match_requested_status() {
        let approve =
            |status| assert_transition("approve", Decision::Approved, &Ok(record(1, status)));
        assert!(approve(LeaveStatus::Approved).is_passed());
        assert_eq!(approve(LeaveStatus::Rejected).status, ScenarioStatus::Failed);

        let pending = Ok(record(1, LeaveStatus::Pending));
        let stuck = assert_transition("reject", Decision::Rejected, &pending);
        assert_eq!(stuck.status, ScenarioStatus::Failed);
        assert!(stuck.message.contains("not a terminal"));
    }

    #[test]
    fn transition_rejection_is_failure() {
        let err = VerifyError::Rejected {
            operation: "update status",
            status: 500,
            message: "Leave request is already processed".to_string(),
        };
        let r = assert_transition("approve", Decision::Approved, &Err(err));
        assert_eq!(r.status, ScenarioStatus::Failed);
        assert!(r.message.contains("already processed"));
    }

    #[test]
    fn owner_history_checks_matching_id() {
        let history = Ok(vec![record(1, LeaveStatus::Pending), record(2, LeaveStatus::Rejected)]);
        assert!(assert_owner_sees("h", LeaveId(2), Decision::Rejected, &history).is_passed());
        assert_eq!(
            assert_owner_sees("h", LeaveId(1), Decision::Approved, &history).status,
            ScenarioStatus::Failed
        );
        assert_eq!(
            assert_owner_sees("h", LeaveId(3), Decision::Approved, &history).status,
            ScenarioStatus::Failed
        );
    }

    #[test]
    fn transport_error_during_decision_or_history_is_errored() {
        let decided = assert_transition("approve", Decision::Approved, &Err(transport_error()));
        assert_eq!(decided.status, ScenarioStatus::Errored);

        let seen = assert_owner_sees("h", LeaveId(1), Decision::Approved, &Err(transport_error()));
        assert_eq!(seen.status, ScenarioStatus::Errored);
    }

    #[test]
    fn refused_history_query_is_failure() {
        let err = VerifyError::Rejected {
            operation: "list own leaves",
            status: 403,
            message: "Access Denied".to_string(),
        };
        let r = assert_owner_sees("h", LeaveId(1), Decision::Rejected, &Err(err));
        assert_eq!(r.status, ScenarioStatus::Failed);
        assert!(r.message.contains("Access Denied"));
    }

    #[test]
    fn edge_cases_expect_failure() {
        let today: NaiveDate = "2030-06-15".parse().unwrap();
        let cases = edge_case_scenarios(today);
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.expectation == Expectation::Failure));
        let past = &cases[0];
        assert_eq!(past.application.start_date, "2030-06-13".parse::<NaiveDate>().unwrap());
        assert_eq!(past.application.start_date, past.application.end_date);
    }

    #[test]
    fn run_scenario_against_backend_that_enforces_past_date_rule() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/leaves")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({"reason": "Time Travel"})))
            .with_status(400)
            .with_body(r#"{"status":400,"message":"Cannot apply for leave in the past"}"#)
            .create();
        let client = BackendClient::new(&server.url(), Some(Duration::from_secs(5))).unwrap();
        let session = Session::new("employee1", "employee1@ems.com", "tok-e1");
        let scenario = &edge_case_scenarios(crate::driver::today())[0];

        let r = run_scenario(&client, &session, scenario);
        assert!(r.is_passed(), "{r:?}");
    }

    #[test]
    fn run_scenario_flags_backend_that_accepts_past_date() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/leaves")
            .with_status(200)
            .with_body(r#"{"id": 55, "reason": "Time Travel", "status": "PENDING"}"#)
            .create();
        let client = BackendClient::new(&server.url(), Some(Duration::from_secs(5))).unwrap();
        let session = Session::new("employee1", "employee1@ems.com", "tok-e1");
        let scenario = &edge_case_scenarios(crate::driver::today())[0];

        let r = run_scenario(&client, &session, scenario);
        assert_eq!(r.status, ScenarioStatus::Failed);
    }
}
