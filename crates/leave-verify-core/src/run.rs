use crate::assertion::{
    assert_owner_sees, assert_submission, assert_transition, edge_case_scenarios, run_scenario,
    update_status,
};
use crate::client::BackendClient;
use crate::config::{HarnessConfig, PlannedRequest};
use crate::driver::{run_nonce, submit_leave, tag_reason, today};
use crate::reconcile::{fetch_pending, match_candidate};
use crate::report::{Expectation, Report, ScenarioResult};
use crate::session::{authenticate_all, Session, Sessions};
use crate::types::LeaveRequest;

/// A planned request paired with what the driver got back.
struct Tracked<'a> {
    plan: &'a PlannedRequest,
    reason: String,
    submitted: Option<LeaveRequest>,
}

/// Run the whole scenario: log in, submit, reconcile, decide, then the
/// edge cases. Steps run strictly in order; the pending list is only read
/// once every submission has returned.
pub fn run(config: &HarnessConfig) -> Report {
    let client = match BackendClient::new(&config.base_url, config.timeout()) {
        Ok(c) => c,
        Err(e) => return Report::fatal(e.to_string()),
    };

    let sessions = match authenticate_all(&client, config) {
        Ok(s) => s,
        Err(fatal) => {
            tracing::error!(%fatal, "login precondition failed");
            let details: Vec<String> = fatal
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.actor, f.reason))
                .collect();
            return Report::fatal(format!("{fatal} ({})", details.join("; ")));
        }
    };

    let mut report = Report::default();
    let names: Vec<&str> = sessions.actors().collect();
    report.record(ScenarioResult::passed(
        "login",
        Expectation::Success,
        format!("logged in: {}", names.join(", ")),
    ));

    run_with_sessions(&client, config, &sessions, &mut report);
    report
}

/// Everything after login. Split out so callers holding sessions already
/// can drive the rest.
pub fn run_with_sessions(
    client: &BackendClient,
    config: &HarnessConfig,
    sessions: &Sessions,
    report: &mut Report,
) {
    let Some(reviewer) = sessions.get(&config.reviewer) else {
        report.record(ScenarioResult::failed(
            "reviewer session",
            Expectation::Success,
            format!("no session for reviewer '{}'", config.reviewer),
        ));
        return;
    };

    let tracked = submit_all(client, config, sessions, report);
    decide_all(client, reviewer, sessions, &tracked, report);

    match sessions.get(&config.edge_case_actor) {
        Some(actor) => {
            for scenario in edge_case_scenarios(today()) {
                report.record(run_scenario(client, actor, &scenario));
            }
        }
        None => report.record(ScenarioResult::skipped(
            "edge cases",
            format!("no session for '{}'", config.edge_case_actor),
        )),
    }
}

fn submit_all<'a>(
    client: &BackendClient,
    config: &'a HarnessConfig,
    sessions: &Sessions,
    report: &mut Report,
) -> Vec<Tracked<'a>> {
    let nonce = config.tag_reasons.then(run_nonce);

    config
        .requests
        .iter()
        .map(|plan| {
            let reason = match &nonce {
                Some(n) => tag_reason(&plan.reason, n),
                None => plan.reason.clone(),
            };
            let label = format!("{} submits '{reason}'", plan.actor);

            let Some(session) = sessions.get(&plan.actor) else {
                report.record(ScenarioResult::skipped(label, "actor has no session"));
                return Tracked { plan, reason, submitted: None };
            };

            let outcome = submit_leave(client, session, &reason);
            report.record(assert_submission(&label, Expectation::Success, &outcome));
            Tracked {
                plan,
                reason,
                submitted: outcome.ok(),
            }
        })
        .collect()
}

fn decide_all(
    client: &BackendClient,
    reviewer: &Session,
    sessions: &Sessions,
    tracked: &[Tracked<'_>],
    report: &mut Report,
) {
    let list_label = "reviewer lists pending";
    // A failed query still lets matching run, against an empty list.
    let candidates = match fetch_pending(client, reviewer) {
        Ok(candidates) => {
            report.record(ScenarioResult::passed(
                list_label,
                Expectation::Success,
                format!("{} sees {} pending requests", reviewer.actor(), candidates.len()),
            ));
            candidates
        }
        Err(e) => {
            tracing::warn!(
                reviewer = reviewer.actor(),
                error = %e,
                "pending query failed; treating as empty"
            );
            report.record(if e.is_transport() {
                ScenarioResult::errored(list_label, Expectation::Success, e.to_string())
            } else {
                ScenarioResult::failed(list_label, Expectation::Success, e.to_string())
            });
            Vec::new()
        }
    };

    for t in tracked {
        let find_label = format!("{} finds '{}'", reviewer.actor(), t.reason);
        let Some(request) = &t.submitted else {
            report.record(ScenarioResult::skipped(find_label, "submission failed"));
            continue;
        };

        let verb = t.plan.decision.verb();
        let decide_label = format!("{} {verb}s '{}'", reviewer.actor(), t.reason);
        let owner_label = format!("{} sees {} on '{}'", t.plan.actor, t.plan.decision, t.reason);

        let id = match match_candidate(request, &candidates) {
            Some(id) if id == request.id => {
                report.record(ScenarioResult::passed(
                    &find_label,
                    Expectation::Success,
                    format!("matched id {id}"),
                ));
                id
            }
            Some(id) => {
                report.record(ScenarioResult::failed(
                    &find_label,
                    Expectation::Success,
                    format!("matched id {id}, but submission returned id {}", request.id),
                ));
                report.record(ScenarioResult::skipped(decide_label, "ambiguous match"));
                report.record(ScenarioResult::skipped(owner_label, "ambiguous match"));
                continue;
            }
            None => {
                report.record(ScenarioResult::failed(
                    &find_label,
                    Expectation::Success,
                    "not found in pending list",
                ));
                report.record(ScenarioResult::skipped(decide_label, "not reconciled"));
                report.record(ScenarioResult::skipped(owner_label, "not reconciled"));
                continue;
            }
        };

        let outcome = update_status(client, reviewer, id, t.plan.decision);
        let verdict = assert_transition(&decide_label, t.plan.decision, &outcome);
        let decided = verdict.is_passed();
        report.record(verdict);

        if !decided {
            report.record(ScenarioResult::skipped(owner_label, "status update did not take"));
            continue;
        }

        match sessions.get(&t.plan.actor) {
            Some(owner) => {
                let history = client.my_leaves(owner.token());
                report.record(assert_owner_sees(&owner_label, id, t.plan.decision, &history));
            }
            None => report.record(ScenarioResult::skipped(owner_label, "owner has no session")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
