use crate::output::print_json;
use clap::Subcommand;
use leave_verify_core::config::{HarnessConfig, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the resolved config with passwords masked
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(config: &HarnessConfig, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

fn show(config: &HarnessConfig, json: bool) -> anyhow::Result<()> {
    let shown = config.redacted();
    if json {
        print_json(&shown)
    } else {
        print!("{}", serde_yaml::to_string(&shown)?);
        Ok(())
    }
}

fn validate(config: &HarnessConfig, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if HarnessConfig::has_errors(&warnings) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
