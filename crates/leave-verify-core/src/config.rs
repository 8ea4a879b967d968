use crate::error::{Result, VerifyError};
use crate::types::Decision;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn redacted(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: "********".to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// PlannedRequest
// ---------------------------------------------------------------------------

/// One leave request the run submits and then decides on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRequest {
    pub actor: String,
    pub reason: String,
    pub decision: Decision,
}

// ---------------------------------------------------------------------------
// HarnessConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. `0` leaves the transport default (unbounded).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Suffix every planned reason with a per-run nonce.
    #[serde(default)]
    pub tag_reasons: bool,
    #[serde(default = "default_reviewer")]
    pub reviewer: String,
    #[serde(default = "default_edge_case_actor")]
    pub edge_case_actor: String,
    #[serde(default = "default_actors")]
    pub actors: BTreeMap<String, Credentials>,
    #[serde(default = "default_requests")]
    pub requests: Vec<PlannedRequest>,
}

fn default_base_url() -> String {
    "http://localhost:8081/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_reviewer() -> String {
    "hr".to_string()
}

fn default_edge_case_actor() -> String {
    "employee1".to_string()
}

fn default_actors() -> BTreeMap<String, Credentials> {
    let mut m = BTreeMap::new();
    m.insert(
        "employee1".to_string(),
        Credentials::new("employee1@ems.com", "password"),
    );
    m.insert(
        "employee2".to_string(),
        Credentials::new("employee2@ems.com", "password"),
    );
    m.insert("hr".to_string(), Credentials::new("hr@ems.com", "password"));
    m
}

fn default_requests() -> Vec<PlannedRequest> {
    vec![
        PlannedRequest {
            actor: "employee1".to_string(),
            reason: "Magic Test 1".to_string(),
            decision: Decision::Approved,
        },
        PlannedRequest {
            actor: "employee2".to_string(),
            reason: "Magic Test 2".to_string(),
            decision: Decision::Rejected,
        },
    ]
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            tag_reasons: false,
            reviewer: default_reviewer(),
            edge_case_actor: default_edge_case_actor(),
            actors: default_actors(),
            requests: default_requests(),
        }
    }
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: HarnessConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            s => Some(Duration::from_secs(s)),
        }
    }

    pub fn credentials(&self, actor: &str) -> Result<&Credentials> {
        self.actors
            .get(actor)
            .ok_or_else(|| VerifyError::UnknownActor(actor.to_string()))
    }

    /// Every actor the run needs, reviewer first, each name once.
    pub fn required_actors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        std::iter::once(self.reviewer.as_str())
            .chain(self.requests.iter().map(|r| r.actor.as_str()))
            .chain(std::iter::once(self.edge_case_actor.as_str()))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Copy with every password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for creds in copy.actors.values_mut() {
            *creds = creds.redacted();
        }
        copy
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.base_url.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "base_url is empty".to_string(),
            });
        }

        for (name, creds) in &self.actors {
            if creds.email.trim().is_empty() || creds.password.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("actor '{name}' has empty credentials"),
                });
            }
        }

        for name in self.required_actors() {
            if !self.actors.contains_key(name) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("actor '{name}' is referenced but not defined"),
                });
            }
        }

        if self.requests.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no requests planned; only edge cases will run".to_string(),
            });
        }

        let mut reasons = HashSet::new();
        for req in &self.requests {
            if req.reason.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("request for '{}' has an empty reason", req.actor),
                });
            } else if !reasons.insert(req.reason.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "reason '{}' is used more than once; requests would be indistinguishable",
                        req.reason
                    ),
                });
            }
            if req.actor == self.reviewer {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("reviewer '{}' also submits a request", req.actor),
                });
            }
        }

        warnings
    }

    pub fn has_errors(warnings: &[ConfigWarning]) -> bool {
        warnings.iter().any(|w| w.level == WarnLevel::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_describe_reference_scenario() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8081/api");
        assert_eq!(cfg.requests.len(), 2);
        assert_eq!(cfg.requests[0].reason, "Magic Test 1");
        assert_eq!(cfg.requests[0].decision, Decision::Approved);
        assert_eq!(cfg.requests[1].decision, Decision::Rejected);
        assert_eq!(cfg.credentials("hr").unwrap().email, "hr@ems.com");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let cfg: HarnessConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.reviewer, "hr");
        assert_eq!(cfg.actors.len(), 3);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn load_reads_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("verify.yaml");
        std::fs::write(
            &path,
            [
                "base_url: http://backend:9000/api",
                "timeout_secs: 0",
                "actors:",
                "  boss:",
                "    email: boss@ems.com",
                "    password: pw",
                "  e:",
                "    email: e@ems.com",
                "    password: pw",
                "reviewer: boss",
                "edge_case_actor: e",
                "requests:",
                "  - actor: e",
                "    reason: Offsite",
                "    decision: APPROVED",
            ]
            .join("\n"),
        )
        .unwrap();

        let cfg = HarnessConfig::load(&path).unwrap();
        assert_eq!(cfg.base_url, "http://backend:9000/api");
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.required_actors(), vec!["boss", "e"]);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn unknown_decision_is_a_parse_error() {
        let yaml = "requests:\n  - actor: employee1\n    reason: x\n    decision: CANCELLED\n";
        assert!(serde_yaml::from_str::<HarnessConfig>(yaml).is_err());
    }

    #[test]
    fn required_actors_are_deduplicated_reviewer_first() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.required_actors(), vec!["hr", "employee1", "employee2"]);
    }

    #[test]
    fn validate_flags_missing_actor_and_duplicate_reason() {
        let mut cfg = HarnessConfig::default();
        cfg.requests.push(PlannedRequest {
            actor: "ghost".to_string(),
            reason: "Magic Test 1".to_string(),
            decision: Decision::Approved,
        });
        let warnings = cfg.validate();
        assert!(HarnessConfig::has_errors(&warnings));
        assert!(warnings.iter().any(|w| w.message.contains("'ghost'")));
        assert!(warnings.iter().any(|w| w.message.contains("more than once")));
    }

    #[test]
    fn validate_flags_empty_credentials() {
        let mut cfg = HarnessConfig::default();
        cfg.actors
            .insert("employee2".to_string(), Credentials::new("", "password"));
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("employee2")));
    }

    #[test]
    fn redacted_masks_passwords_and_debug_never_prints_them() {
        let cfg = HarnessConfig::default();
        let shown = cfg.redacted();
        assert!(shown.actors.values().all(|c| c.password == "********"));
        let dbg = format!("{:?}", cfg.credentials("hr").unwrap());
        assert!(!dbg.contains("\"password\""));
        assert!(dbg.contains("<redacted>"));
    }
}
