use crate::client::BackendClient;
use crate::config::{Credentials, HarnessConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ─── Session ──────────────────────────────────────────────────────────────

/// An authenticated actor. The token is obtained once and used unchanged
/// for the rest of the run.
#[derive(Clone)]
pub struct Session {
    actor: String,
    email: String,
    token: String,
}

impl Session {
    pub fn new(
        actor: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Session {
            actor: actor.into(),
            email: email.into(),
            token: token.into(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("actor", &self.actor)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// ─── Authentication ───────────────────────────────────────────────────────

/// Outcome of a single login attempt. Failure is a value, never a panic or
/// an error bubbling past the caller.
#[derive(Debug)]
pub enum Authentication {
    Authenticated(Session),
    Unauthenticated { actor: String, reason: String },
}

/// Log `actor` in with `creds`. One attempt, no retries.
pub fn authenticate(client: &BackendClient, actor: &str, creds: &Credentials) -> Authentication {
    if creds.email.trim().is_empty() || creds.password.is_empty() {
        return Authentication::Unauthenticated {
            actor: actor.to_string(),
            reason: "empty credentials".to_string(),
        };
    }

    match client.login(&creds.email, &creds.password) {
        Ok(token) => {
            let session = Session::new(actor, creds.email.clone(), token);
            tracing::info!(actor, email = session.email(), "authenticated");
            Authentication::Authenticated(session)
        }
        Err(e) => {
            tracing::warn!(actor, error = %e, "login failed");
            Authentication::Unauthenticated {
                actor: actor.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

// ─── Sessions ─────────────────────────────────────────────────────────────

/// Every actor needed by the run, keyed by actor name.
#[derive(Debug, Default)]
pub struct Sessions {
    by_actor: BTreeMap<String, Session>,
}

impl Sessions {
    pub fn insert(&mut self, session: Session) {
        self.by_actor.insert(session.actor.clone(), session);
    }

    pub fn get(&self, actor: &str) -> Option<&Session> {
        self.by_actor.get(actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.by_actor.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_actor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_actor.is_empty()
    }
}

/// One or more required actors could not log in. The run cannot proceed.
#[derive(Debug, Clone, Serialize)]
pub struct FatalPrecondition {
    pub failures: Vec<LoginFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginFailure {
    pub actor: String,
    pub reason: String,
}

impl fmt::Display for FatalPrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.failures.iter().map(|l| l.actor.as_str()).collect();
        write!(f, "failed to log in: {}", names.join(", "))
    }
}

/// Log in every actor the config requires. Each actor is attempted so the
/// report names all of them, but any failure makes the whole set unusable.
pub fn authenticate_all(
    client: &BackendClient,
    config: &HarnessConfig,
) -> Result<Sessions, FatalPrecondition> {
    let mut sessions = Sessions::default();
    let mut failures = Vec::new();

    for actor in config.required_actors() {
        let outcome = match config.credentials(actor) {
            Ok(creds) => authenticate(client, actor, creds),
            Err(e) => Authentication::Unauthenticated {
                actor: actor.to_string(),
                reason: e.to_string(),
            },
        };
        match outcome {
            Authentication::Authenticated(s) => sessions.insert(s),
            Authentication::Unauthenticated { actor, reason } => {
                failures.push(LoginFailure { actor, reason })
            }
        }
    }

    if failures.is_empty() {
        Ok(sessions)
    } else {
        Err(FatalPrecondition { failures })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
