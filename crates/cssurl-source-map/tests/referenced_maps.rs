//! Loading maps referenced from CSS, inline and on disk.

use cssurl_core::PathStyle;
use cssurl_source_map::{Location, SourceLocator, SourceMapLocator, load_for_css, to_json};

const INLINE: &str = "data:application/json;base64,eyJ2ZXJzaW9uIjozLCJzb3VyY2VzIjpbIi4uL3Njc3MvbWFpbi5zY3NzIl0sIm5hbWVzIjpbXSwibWFwcGluZ3MiOiJBQUFBIn0=";

#[test]
fn test_inline_map_resolves_against_css_directory() {
    let css = format!(".a{{background:url(a.png)}}\n/*# sourceMappingURL={} */\n", INLINE);
    let map = load_for_css(&css, "/site/css/main.css", PathStyle::Posix)
        .unwrap()
        .unwrap();

    let locator = SourceMapLocator::new(map);
    assert_eq!(
        locator.original_directory(Location::new(3, 0, 3)).as_deref(),
        Some("/site/scss")
    );
}

#[test]
fn test_css_without_reference_has_no_map() {
    let map = load_for_css(".a{color:red}", "/site/css/main.css", PathStyle::Posix).unwrap();
    assert!(map.is_none());
}

#[test]
fn test_file_reference_and_relative_output() {
    let temp = tempfile::tempdir().unwrap();
    let css_dir = temp.path().join("css");
    std::fs::create_dir_all(&css_dir).unwrap();
    std::fs::write(
        css_dir.join("main.css.map"),
        br#"{"version":3,"sources":["../scss/main.scss"],"sourcesContent":[".a{}"],"names":[],"mappings":"AAAA"}"#,
    )
    .unwrap();

    let css_path = css_dir.join("main.css").to_string_lossy().to_string();
    let style = PathStyle::native();
    let map = load_for_css("/*# sourceMappingURL=main.css.map */", &css_path, style)
        .unwrap()
        .unwrap();

    let out_dir = temp.path().join("out").to_string_lossy().to_string();
    let json = to_json(&map.to_relative(&out_dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["sources"][0], "../scss/main.scss");
    assert_eq!(value["sourcesContent"][0], ".a{}");
}
