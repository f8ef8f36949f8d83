use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use prettyrepr::config;
use prettyrepr::value::json::parse_str;
use prettyrepr::{Node, ReprOptions, ReprRenderer};

fn cli() -> Command {
    Command::new("prettyrepr")
        .about("Pretty-print a JSON document as a compact, width-aware representation")
        .arg(
            Arg::new("input")
                .help("Input JSON file, or '-' for stdin")
                .index(1),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Line width")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .help("Nesting level at which containers collapse (0 = unlimited)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-elements")
                .long("max-elements")
                .help("Entries shown per container before ', ...'")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-chars")
                .long("max-chars")
                .help("Approximate budget of non-blank characters")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("unlimited")
                .long("unlimited")
                .help("Disable the element and character limits")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-compact")
                .long("no-compact")
                .help("Put every wrapped entry on its own line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON config file with render options")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Report whether the output is readable/recursive on stderr")
                .action(ArgAction::SetTrue),
        )
}

/// Command-line flags win over the config file.
fn apply_overrides(mut options: ReprOptions, matches: &ArgMatches) -> ReprOptions {
    if matches.get_flag("unlimited") {
        options.max_elements = None;
        options.max_chars = None;
    }
    if let Some(&width) = matches.get_one::<usize>("width") {
        options.width = width;
    }
    if let Some(&depth) = matches.get_one::<usize>("depth") {
        options.max_depth = Some(depth);
    }
    if let Some(&count) = matches.get_one::<usize>("max-elements") {
        options.max_elements = Some(count);
    }
    if let Some(&count) = matches.get_one::<usize>("max-chars") {
        options.max_chars = Some(count);
    }
    if matches.get_flag("no-compact") {
        options.compact = false;
    }
    options
}

fn read_input(input: Option<&String>) -> Result<String> {
    match input.map(String::as_str) {
        None | Some("-") => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            Ok(content)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let options = config::load_options(config_path.map(PathBuf::as_path))?;
    let options = apply_overrides(options, &matches);
    debug!(?options, "render options");

    let input = read_input(matches.get_one::<String>("input"))?;
    let value = parse_str(&input)?;

    let renderer = ReprRenderer::new(options);
    let rendered = renderer.render_node(Node::from(&value));

    println!("{}", rendered.text);

    if matches.get_flag("stats") {
        eprintln!(
            "readable: {}, recursive: {}",
            rendered.readable, rendered.recursive
        );
    }

    Ok(())
}
