use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const PAGE: &str = r#"<!DOCTYPE html>
<html class="no-js no-svg"><head><title>Site</title></head>
<body class="home">
<nav id="site-navigation" class="main-navigation"><button class="menu-toggle">Menu</button></nav>
</body></html>"#;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn rewrites_document_with_default_theme() {
    let page = temp_file(".html", PAGE);
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(page.path());

    let output_pred = predicate::str::contains(r#"<html class="no-js svg background-fixed">"#)
        .and(predicate::str::contains(r#"<amp-state id="navMenuToggledOn">"#))
        .and(predicate::str::contains("twentyseventeen-style-inline-css"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn theme_flag_overrides_template() {
    let page = temp_file(".html", PAGE);
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(page.path()).arg("--theme").arg("twentytwenty");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<html class="no-js no-svg">"#))
        .stdout(predicate::str::contains("amp-state").not());
}

#[test]
fn config_file_supplies_rules_and_environment() {
    let page = temp_file(".html", PAGE);
    let config = temp_file(
        ".toml",
        r#"
rules = [{ name = "force_svg_support" }]

[theme]
template = "customtheme"

[environment]
has_header_video = true
"#,
    );
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(page.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<html class="no-js svg">"#))
        .stdout(predicate::str::contains("has-header-video").not());
}

#[test]
fn renders_menu_items() {
    let items = temp_file(
        ".json",
        r#"[
  {"html": "<a href=\"/\">Home</a>", "classes": ["menu-item"]},
  {"html": "<a href=\"/about\">About</a>", "classes": ["menu-item-has-children", "current-menu-ancestor"]}
]"#,
    );
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(items.path()).arg("--menu");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("navMenuItemExpanded1"))
        .stdout(predicate::str::contains("navMenuItemExpanded2").not());
}

#[test]
fn lists_rules() {
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg("--list-rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("add_nav_menu_toggle"))
        .stdout(predicate::str::contains("post-parse (twentyfifteen, twentyseventeen)"));
}

#[test]
fn missing_config_file_fails() {
    let page = temp_file(".html", PAGE);
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(page.path()).arg("--config").arg("/nonexistent/themebind.toml");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unparsable_menu_button_query_fails() {
    let page = temp_file(".html", PAGE);
    let config = temp_file(
        ".toml",
        r#"
rules = [{ name = "add_nav_menu_toggle", params = { menu_button_query = "nav//button" } }]
"#,
    );
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(page.path()).arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("expected `/` or `//` at offset 0"));
}

#[test]
fn invalid_menu_json_fails() {
    let items = temp_file(".json", "not json");
    let mut cmd = cargo_bin_cmd!("themebind");
    cmd.arg(items.path()).arg("--menu");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid menu items"));
}
