//! Command-line interface for themebind
//! Rewrites theme markup for script-free runtimes, or renders menu items the way the menu
//! item hooks would.
//!
//! Usage:
//!   themebind `<path>` [--config `<file>`] [--theme `<template>`] [--stylesheet `<child>`]
//!   themebind `<path>` --menu                   - `<path>` is a JSON list of menu items
//!   themebind --list-rules                      - List known rules and their phase

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Deserialize;
use std::fs;
use themebind::{
    CoreThemeSanitizer, DocumentPipeline, FeatureRegistry, MenuItem, Phase, Rule, StaticEnvironment,
};
use themebind_config::{Loader, ThemebindConfig};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One entry of a `--menu` input file.
#[derive(Debug, Deserialize)]
struct MenuItemInput {
    html: String,
    #[serde(default)]
    classes: Vec<String>,
}

fn main() {
    let matches = Command::new("themebind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrite theme markup into declarative state bindings")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the HTML document (or JSON menu items with --menu)")
                .required_unless_present("list-rules")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration layered over the built-in defaults"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .short('t')
                .help("Parent theme identifier (overrides theme.template)"),
        )
        .arg(
            Arg::new("stylesheet")
                .long("stylesheet")
                .help("Active child theme identifier (overrides theme.stylesheet)"),
        )
        .arg(
            Arg::new("menu")
                .long("menu")
                .help("Treat the input as a JSON list of {html, classes} menu items")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-rules")
                .long("list-rules")
                .help("List the known rules and the themes that use them")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging();

    if matches.get_flag("list-rules") {
        handle_list_rules_command();
        return;
    }

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let pipeline = pipeline(&config);
    if let Err(e) = pipeline.sanitizer().validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }
    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("A path is required unless listing rules");
        std::process::exit(1);
    };
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    if matches.get_flag("menu") {
        handle_menu_command(&pipeline, &source);
    } else {
        handle_render_command(&pipeline, &source);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings and up by default).
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn load_config(matches: &ArgMatches) -> Result<ThemebindConfig, themebind_config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(theme) = matches.get_one::<String>("theme") {
        loader = loader.set_override("theme.template", theme.as_str())?;
    }
    if let Some(stylesheet) = matches.get_one::<String>("stylesheet") {
        loader = loader.set_override("theme.stylesheet", stylesheet.as_str())?;
    }
    loader.build()
}

fn pipeline(config: &ThemebindConfig) -> DocumentPipeline<'static, StaticEnvironment> {
    let runtime = config.runtime_config();
    debug!(template = %runtime.template, stylesheet = ?runtime.stylesheet, "loaded configuration");
    DocumentPipeline::new(CoreThemeSanitizer::new(runtime), config.environment())
}

/// Handle the document rewrite
fn handle_render_command(pipeline: &DocumentPipeline<'_, StaticEnvironment>, source: &str) {
    let rendered = pipeline.render(source).unwrap_or_else(|e| {
        eprintln!("Rewrite error: {}", e);
        std::process::exit(1);
    });
    print!("{}", rendered.html);
}

/// Handle the menu rendering pass
fn handle_menu_command(pipeline: &DocumentPipeline<'_, StaticEnvironment>, source: &str) {
    let inputs: Vec<MenuItemInput> = serde_json::from_str(source).unwrap_or_else(|e| {
        eprintln!("Invalid menu items: {}", e);
        std::process::exit(1);
    });
    let items: Vec<(String, MenuItem)> = inputs
        .into_iter()
        .map(|input| (input.html, MenuItem::new(input.classes)))
        .collect();

    let rendered = pipeline.render_menu(&items);
    let output = serde_json::to_string_pretty(&rendered).unwrap_or_else(|e| {
        eprintln!("Error formatting menu items: {}", e);
        std::process::exit(1);
    });
    println!("{}", output);
}

/// Handle the list-rules command
fn handle_list_rules_command() {
    let registry = FeatureRegistry::builtin();
    println!("Available rules:\n");

    for rule in Rule::ALL {
        let phase = match rule.phase() {
            Phase::PreParse => "pre-parse",
            Phase::PostParse => "post-parse",
        };
        let themes: Vec<&str> = registry
            .themes()
            .into_iter()
            .filter(|theme| {
                registry
                    .theme_features(theme)
                    .is_some_and(|features| features.iter().any(|feature| feature.rule == rule))
            })
            .collect();
        println!("  {}", rule);
        println!("    {} ({})", phase, themes.join(", "));
        println!();
    }
}
