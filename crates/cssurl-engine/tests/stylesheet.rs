/*
 * stylesheet.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end rewriting of a compiled stylesheet with a referenced map.
 */

//! A stylesheet compiled from two Sass sources, with its map on disk next
//! to it. Each declaration must resolve against the directory of the
//! source it came from.

use std::fs;
use std::path::Path;

use cssurl_engine::{Engine, EngineConfig};
use sourcemap::SourceMapBuilder;
use tempfile::TempDir;

const CSS: &str = r#"body {
  background: url(images/bg.png) no-repeat;
}
.button {
  background-image: url("icons/arrow.svg#right"), url('http://cdn.example.com/x.png');
}
@font-face {
  src: url(../fonts/a.woff2?v=3) format("woff2");
}
/*# sourceMappingURL=main.css.map */
"#;

const MAIN: &str = "../scss/main.scss";
const BUTTON: &str = "../scss/components/_button.scss";

fn write_fixture(temp: &TempDir) -> String {
    let css_dir = temp.path().join("css");
    fs::create_dir_all(&css_dir).unwrap();

    let mut builder = SourceMapBuilder::new(Some("main.css"));
    builder.add(0, 0, 0, 0, Some(MAIN), None, false);
    builder.add(1, 33, 1, 14, Some(MAIN), None, false);
    builder.add(3, 0, 0, 0, Some(BUTTON), None, false);
    builder.add(6, 0, 4, 0, Some(MAIN), None, false);
    let mut json = Vec::new();
    builder.into_sourcemap().to_writer(&mut json).unwrap();

    fs::write(css_dir.join("main.css.map"), json).unwrap();
    fs::write(css_dir.join("main.css"), CSS).unwrap();
    path_string(&css_dir.join("main.css"))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn config(toml: &str) -> EngineConfig {
    EngineConfig::from_toml_str(toml, "<test>").unwrap()
}

#[test]
fn test_rewrites_against_original_sources() {
    let temp = TempDir::new().unwrap();
    let css_path = write_fixture(&temp);

    let engine = Engine::new(config("keep-query = true"));
    let output = engine.process_file(&css_path, None).unwrap();

    insta::assert_snapshot!(output.css, @r#"
    body {
      background: url(../scss/images/bg.png) no-repeat;
    }
    .button {
      background-image: url("../scss/components/icons/arrow.svg#right"), url('http://cdn.example.com/x.png');
    }
    @font-face {
      src: url(../fonts/a.woff2?v=3) format("woff2");
    }
    /*# sourceMappingURL=main.css.map */
    "#);
    assert!(output.warnings.is_empty());
    assert_eq!(output.rewrites.len(), 3);
}

#[test]
fn test_query_dropped_by_default() {
    let temp = TempDir::new().unwrap();
    let css_path = write_fixture(&temp);

    let output = Engine::new(EngineConfig::default())
        .process_file(&css_path, None)
        .unwrap();

    assert!(output.css.contains(r#"url("../scss/components/icons/arrow.svg")"#));
    assert!(output.css.contains("url(../fonts/a.woff2)"));
}

#[test]
fn test_output_map_is_shifted_and_relative() {
    let temp = TempDir::new().unwrap();
    let css_path = write_fixture(&temp);
    let out_path = path_string(&temp.path().join("css").join("out.css"));

    let output = Engine::new(config("source-map = true"))
        .process_file(&css_path, Some(&out_path))
        .unwrap();
    let map = output.map.unwrap();

    // "images/bg.png" became "../scss/images/bg.png"
    let shifted = map
        .tokens()
        .find(|t| t.get_dst_line() == 1 && t.get_src_col() == 14)
        .unwrap();
    assert_eq!(shifted.get_dst_col(), 41);

    let mut sources: Vec<&str> = (0..map.get_source_count())
        .filter_map(|idx| map.get_source(idx))
        .collect();
    sources.sort_unstable();
    assert_eq!(sources, vec![BUTTON, MAIN]);
    assert_eq!(map.get_file(), Some("out.css"));
    assert!(output.css.ends_with("/*# sourceMappingURL=out.css.map */\n"));
    assert!(!output.css.contains("main.css.map"));
}

#[test]
fn test_context_dir_changes_relative_output() {
    let temp = TempDir::new().unwrap();
    let css_path = write_fixture(&temp);
    let dist = path_string(&temp.path().join("dist"));

    let output = Engine::new(EngineConfig::default())
        .with_context_dir(dist)
        .process_file(&css_path, None)
        .unwrap();

    assert!(output.css.contains("url(../scss/images/bg.png)"));
    assert!(output.css.contains("url(../fonts/a.woff2)"));
}

#[test]
fn test_absolute_output() {
    let temp = TempDir::new().unwrap();
    let css_path = write_fixture(&temp);

    let output = Engine::new(config("absolute = true"))
        .process_file(&css_path, None)
        .unwrap();

    let expected = cssurl_core::PathStyle::native()
        .to_slash(&path_string(&temp.path().join("scss").join("images").join("bg.png")));
    assert!(output.css.contains(&format!("url({})", expected)));
}
