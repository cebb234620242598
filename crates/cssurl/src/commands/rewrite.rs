//! Rewrite command implementation

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::CommonArgs;

/// Arguments for the rewrite command
#[derive(Debug)]
pub struct RewriteArgs {
    pub common: CommonArgs,
    /// Output file; stdout when None
    pub output: Option<String>,
    /// Also write OUTPUT.map
    pub source_map: bool,
    /// Suppress warnings
    pub silent: bool,
}

/// Execute the rewrite command
pub fn execute(args: RewriteArgs) -> Result<()> {
    let mut config = super::load_config(&args.common)?;
    config.source_map |= args.source_map;
    config.silent |= args.silent;
    if config.source_map && args.output.is_none() {
        warn!("source map output needs --output; map not written");
        config.source_map = false;
    }

    let output = super::run(&args.common, config, args.output.as_deref())?;

    for warning in &output.warnings {
        warn!("{}:{}", args.common.input, warning);
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output.css)
                .with_context(|| format!("Failed to write {}", path))?;
            info!("{}: rewrote {} url(s)", path, output.rewrites.len());
        }
        None => print!("{}", output.css),
    }

    if let (Some(map), Some(path)) = (&output.map, &args.output) {
        let map_path = format!("{}.map", path);
        let json = cssurl_source_map::to_json(map)?;
        std::fs::write(&map_path, json).with_context(|| format!("Failed to write {}", map_path))?;
    }

    Ok(())
}
