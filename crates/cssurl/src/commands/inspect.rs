//! Inspect command implementation

use anyhow::Result;

use crate::CommonArgs;

/// Arguments for the inspect command
#[derive(Debug)]
pub struct InspectArgs {
    pub common: CommonArgs,
    /// Print JSON instead of text
    pub json: bool,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let config = super::load_config(&args.common)?;
    let output = super::run(&args.common, config, None)?;

    if args.json {
        let report = serde_json::json!({
            "rewrites": output.rewrites,
            "warnings": output.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for rewrite in &output.rewrites {
        println!(
            "{} {}: url({}) -> url({}) [{}]",
            rewrite.location, rewrite.property, rewrite.before, rewrite.after, rewrite.directory
        );
    }
    for warning in &output.warnings {
        println!("warning: {}", warning);
    }
    Ok(())
}
