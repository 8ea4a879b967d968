use crate::output::{print_json, transcript_line};
use leave_verify_core::config::HarnessConfig;
use leave_verify_core::report::RunOutcome;

/// Run the scenario and print the transcript. Returns the process exit code.
pub fn run(config: &HarnessConfig, json: bool) -> anyhow::Result<i32> {
    let warnings = config.validate();
    if HarnessConfig::has_errors(&warnings) {
        for w in &warnings {
            eprintln!("[{:?}] {}", w.level, w.message);
        }
        anyhow::bail!("config validation found errors");
    }

    if !json {
        println!("--- Verifying leave workflow against {} ---", config.base_url);
    }

    let report = leave_verify_core::run::run(config);
    let outcome = report.outcome();

    if json {
        let value = serde_json::json!({
            "outcome": outcome,
            "counts": report.counts(),
            "report": report,
        });
        print_json(&value)?;
        return Ok(outcome.exit_code());
    }

    if let Some(fatal) = &report.fatal {
        eprintln!("CRITICAL: {fatal}. Is the backend running?");
        return Ok(outcome.exit_code());
    }

    for result in &report.results {
        println!("{}", transcript_line(result));
    }

    let c = report.counts();
    println!(
        "--- Verification complete: {} passed, {} failed, {} errored, {} skipped ---",
        c.passed, c.failed, c.errored, c.skipped
    );
    if outcome == RunOutcome::BackendUnreachable {
        eprintln!("CRITICAL: backend became unreachable during the run");
    }

    Ok(outcome.exit_code())
}
