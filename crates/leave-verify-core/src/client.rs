//! Thin blocking client for the leave-management backend's HTTP contract.
//!
//! Every call returns a typed [`Result`]: transport problems become
//! [`VerifyError::Transport`], non-2xx answers become
//! [`VerifyError::Rejected`] carrying the server's `message`, and bodies
//! that do not decode become [`VerifyError::Malformed`].

use crate::error::{Result, VerifyError};
use crate::types::{LeaveApplication, LeaveId, LeaveRecord, LeaveStatus};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OP_LOGIN: &str = "login";
const OP_APPLY: &str = "submit leave";
const OP_PENDING: &str = "list pending";
const OP_MINE: &str = "list own leaves";
const OP_UPDATE: &str = "update status";

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8081/api`).
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(|source| VerifyError::Transport {
            operation: "build http client",
            source,
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /auth/login` → bearer token.
    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        let req = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password });
        let body: LoginResponse = send(OP_LOGIN, req)?;
        if body.token.is_empty() {
            return Err(VerifyError::Malformed {
                operation: OP_LOGIN,
                reason: "empty token".to_string(),
            });
        }
        Ok(body.token)
    }

    /// `POST /leaves` under the caller's token.
    pub fn apply_leave(&self, token: &str, application: &LeaveApplication) -> Result<LeaveRecord> {
        let req = self
            .http
            .post(self.url("/leaves"))
            .bearer_auth(token)
            .json(application);
        send(OP_APPLY, req)
    }

    /// `GET /leaves?status=PENDING`.
    pub fn pending_leaves(&self, token: &str) -> Result<Vec<LeaveRecord>> {
        let req = self
            .http
            .get(self.url("/leaves"))
            .query(&[("status", LeaveStatus::Pending.as_str())])
            .bearer_auth(token);
        send(OP_PENDING, req)
    }

    /// `GET /leaves/my`: the caller's own history.
    pub fn my_leaves(&self, token: &str) -> Result<Vec<LeaveRecord>> {
        let req = self.http.get(self.url("/leaves/my")).bearer_auth(token);
        send(OP_MINE, req)
    }

    /// `PUT /leaves/{id}/status?status={target}`.
    pub fn update_status(
        &self,
        token: &str,
        id: LeaveId,
        target: LeaveStatus,
    ) -> Result<LeaveRecord> {
        let req = self
            .http
            .put(self.url(&format!("/leaves/{id}/status")))
            .query(&[("status", target.as_str())])
            .bearer_auth(token);
        send(OP_UPDATE, req)
    }
}

fn send<T: DeserializeOwned>(operation: &'static str, req: RequestBuilder) -> Result<T> {
    let resp = req
        .send()
        .map_err(|source| VerifyError::Transport { operation, source })?;
    decode(operation, resp)
}

fn decode<T: DeserializeOwned>(operation: &'static str, resp: Response) -> Result<T> {
    let status = resp.status();
    tracing::debug!(operation, status = status.as_u16(), url = %resp.url(), "backend response");
    let text = resp
        .text()
        .map_err(|source| VerifyError::Transport { operation, source })?;

    if !status.is_success() {
        return Err(VerifyError::Rejected {
            operation,
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| VerifyError::Malformed {
        operation,
        reason: e.to_string(),
    })
}

/// Pull `message` out of a `{status, message}` body; anything else is kept
/// verbatim.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(m) }) => m,
        _ => body.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
