//! Command-line interface for OEOS
//! This binary converts scripts between the v1 tree format and OEOScript (v4).
//!
//! Usage:
//!   oeos to_v1 `<input.oeos>` `<output.json>`   - Script to tree
//!   oeos to_v4 `<input.json>` `<output.oeos>`   - Tree to script
//!
//! Options:
//!   --config `<file>`        Layer a TOML config file over the built-in defaults and ./oeos.toml
//!   --tree-format `<fmt>`    auto | json | yaml, overrides `tree.format`
//!
//! An `oeos.toml` in the working directory is picked up when present.
//!
//! Logging goes to stderr and is filtered by RUST_LOG, or by `logging.level` when RUST_LOG is
//! unset. The output file is only written once the whole conversion has succeeded.

mod conversions;

use clap::{Arg, Command};
use conversions::{Direction, DIRECTIONS};
use oeos_babel::FormatRegistry;
use oeos_config::{Loader, OeosConfig};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("oeos")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert OEOS scripts between the v1 tree format and OEOScript")
        .arg_required_else_help(true)
        .after_help(formats_help())
        .arg(
            Arg::new("direction")
                .help("Conversion direction: to_v1 (script to tree) or to_v4 (tree to script)")
                .value_parser(DIRECTIONS.to_vec())
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("input")
                .help("File to read")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("output")
                .help("File to write")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in configuration"),
        )
        .arg(
            Arg::new("tree-format")
                .long("tree-format")
                .help("Tree format to read or write")
                .value_parser(["auto", "json", "yaml"]),
        )
        .get_matches();

    let config = load_config(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("tree-format").map(String::as_str),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: invalid configuration: {}", e);
        process::exit(1);
    });
    init_logging(&config.logging.level);

    let Some(direction) = matches
        .get_one::<String>("direction")
        .and_then(|name| Direction::from_name(name))
    else {
        eprintln!("Error: direction must be one of {}", DIRECTIONS.join(", "));
        process::exit(1);
    };
    let (Some(input), Some(output)) = (
        matches.get_one::<String>("input"),
        matches.get_one::<String>("output"),
    ) else {
        eprintln!("Error: input and output files are required");
        process::exit(1);
    };

    if let Err(message) = run(&config, direction, Path::new(input), Path::new(output)) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
    println!("Converted {} -> {} ({})", input, output, direction.name());
}

const LOCAL_CONFIG: &str = "oeos.toml";

fn formats_help() -> String {
    let registry = FormatRegistry::with_defaults();
    let mut help = String::from("Formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            help.push_str(&format!("  {:<10} {}\n", name, format.description()));
        }
    }
    help
}

fn load_config(path: Option<&str>, tree_format: Option<&str>) -> Result<OeosConfig, String> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    if let Some(format) = tree_format {
        loader = loader
            .set_override("tree.format", format)
            .map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read, convert and write. Nothing is written unless the conversion succeeds.
fn run(
    config: &OeosConfig,
    direction: Direction,
    input: &Path,
    output: &Path,
) -> Result<(), String> {
    if !input.is_file() {
        return Err(format!("input file '{}' not found", input.display()));
    }
    let source = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read '{}': {}", input.display(), e))?;

    let registry = conversions::registry_for(config);
    let converted = conversions::convert(
        &registry,
        direction,
        config.tree.format,
        &source,
        input,
        output,
    )
    .map_err(|e| format!("conversion failed: {}", e))?;

    std::fs::write(output, converted)
        .map_err(|e| format!("cannot write '{}': {}", output.display(), e))
}
