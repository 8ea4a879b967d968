use crate::output::{print_json, print_table};
use anyhow::Context;
use leave_verify_core::client::BackendClient;
use leave_verify_core::config::HarnessConfig;
use leave_verify_core::reconcile::fetch_pending;
use leave_verify_core::session::{authenticate, Authentication};

pub fn run(config: &HarnessConfig, json: bool) -> anyhow::Result<()> {
    let client = BackendClient::new(&config.base_url, config.timeout())
        .context("failed to build http client")?;
    let creds = config.credentials(&config.reviewer)?;

    let reviewer = match authenticate(&client, &config.reviewer, creds) {
        Authentication::Authenticated(s) => s,
        Authentication::Unauthenticated { actor, reason } => {
            anyhow::bail!("reviewer '{actor}' could not log in: {reason}")
        }
    };

    let candidates = fetch_pending(&client, &reviewer)
        .with_context(|| format!("pending query as '{}' failed", reviewer.actor()))?;

    if json {
        return print_json(&candidates);
    }

    if candidates.is_empty() {
        println!("No pending requests.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = candidates
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.employee.clone().unwrap_or_else(|| "-".to_string()),
                c.start_date.map(|d| d.to_string()).unwrap_or_default(),
                c.end_date.map(|d| d.to_string()).unwrap_or_default(),
                c.reason.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "EMPLOYEE", "START", "END", "REASON"], &rows);
    Ok(())
}
