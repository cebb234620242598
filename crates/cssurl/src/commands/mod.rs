//! Command implementations for the cssurl CLI
//!
//! Each command turns its arguments into an engine configuration and
//! delegates to cssurl-engine for the actual work.

pub mod inspect;
pub mod rewrite;

use std::path::Path;

use anyhow::{Context, Result};
use cssurl_core::PathStyle;
use cssurl_engine::{CssInput, CssOutput, Engine, EngineConfig};
use cssurl_source_map::AbsoluteSourceMap;

use crate::CommonArgs;

/// Configuration file values with command-line flags applied on top.
pub fn load_config(args: &CommonArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(Path::new(path))?,
        None => EngineConfig::default(),
    };

    let options = &mut config.options;
    options.absolute |= args.absolute;
    options.keep_query |= args.keep_query;
    options.debug |= args.debug;
    if let Some(root) = &args.root {
        options.root = Some(root.clone());
    }
    if let Some(join) = args.join {
        options.join = join.as_join_name();
    }
    if let Some(depth) = args.search_depth {
        options.search_depth = depth;
    }

    config.require_source_map |= args.require_source_map;
    config.remove_cr |= args.remove_cr;
    Ok(config)
}

/// Read the input and run it through an engine built from `config`.
pub fn run(
    args: &CommonArgs,
    config: EngineConfig,
    output_path: Option<&str>,
) -> Result<CssOutput> {
    let style = PathStyle::native();
    let mut engine = Engine::new(config).with_style(style);
    if let Some(context) = &args.context {
        engine = engine.with_context_dir(context.clone());
    }

    let css = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input))?;

    let mut input = CssInput::new(&css, &args.input);
    input.output_path = output_path;
    if let Some(map_path) = &args.map {
        let map = AbsoluteSourceMap::from_file(map_path, style)
            .with_context(|| format!("Failed to load source map {}", map_path))?;
        input = input.with_map(map);
    }

    engine.process(input).map_err(|err| {
        if err.is_config() {
            anyhow::anyhow!("Configuration error: {}", err)
        } else {
            anyhow::Error::new(err).context(format!("Failed to process {}", args.input))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JoinArg;
    use cssurl_core::JoinName;

    fn args(input: &str) -> CommonArgs {
        CommonArgs {
            input: input.to_string(),
            map: None,
            config: None,
            context: None,
            root: None,
            absolute: false,
            keep_query: false,
            join: None,
            search_depth: None,
            debug: false,
            require_source_map: false,
            remove_cr: false,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("cssurl.toml");
        std::fs::write(
            &config_path,
            "join = \"search\"\nsearch-depth = 5\nroot = \"/a\"\n",
        )
        .unwrap();

        let mut args = args("main.css");
        args.config = Some(config_path.to_string_lossy().to_string());
        args.root = Some("/b".to_string());
        args.absolute = true;

        let config = load_config(&args).unwrap();
        assert_eq!(config.options.join, JoinName::Search);
        assert_eq!(config.options.search_depth, 5);
        assert_eq!(config.options.root.as_deref(), Some("/b"));
        assert!(config.options.absolute);
    }

    #[test]
    fn test_join_flag_overrides_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("cssurl.toml");
        std::fs::write(&config_path, "join = \"search\"\n").unwrap();

        let mut args = args("main.css");
        args.config = Some(config_path.to_string_lossy().to_string());
        args.join = Some(JoinArg::Default);

        let config = load_config(&args).unwrap();
        assert_eq!(config.options.join, JoinName::Default);
    }
}
