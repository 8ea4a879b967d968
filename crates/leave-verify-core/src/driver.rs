use crate::client::BackendClient;
use crate::error::Result;
use crate::session::Session;
use crate::types::{LeaveApplication, LeaveRequest};
use chrono::NaiveDate;

/// Current local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Submit a leave request for tomorrow through the day after tomorrow,
/// relative to the wall clock at call time.
pub fn submit_leave(
    client: &BackendClient,
    session: &Session,
    reason: &str,
) -> Result<LeaveRequest> {
    let application = LeaveApplication::upcoming(today(), reason);
    submit_application(client, session, &application)
}

/// Submit an arbitrary application as `session`'s actor. A non-2xx answer
/// comes back as `Err` carrying the server's message; it never aborts the
/// run on its own.
pub fn submit_application(
    client: &BackendClient,
    session: &Session,
    application: &LeaveApplication,
) -> Result<LeaveRequest> {
    tracing::info!(
        actor = session.actor(),
        reason = %application.reason,
        start = %application.start_date,
        end = %application.end_date,
        "submitting leave"
    );
    match client.apply_leave(session.token(), application) {
        Ok(record) => {
            let request = LeaveRequest::from_record(session.actor(), application, record);
            tracing::info!(
                actor = session.actor(),
                id = %request.id,
                status = %request.status,
                "leave submitted"
            );
            Ok(request)
        }
        Err(e) => {
            tracing::warn!(actor = session.actor(), error = %e, "leave submission failed");
            Err(e)
        }
    }
}

/// Short per-run nonce used to make reasons unique across runs.
pub fn run_nonce() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

pub fn tag_reason(reason: &str, nonce: &str) -> String {
    format!("{reason} [{nonce}]")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
