//! Overlay Anchor CLI
//!
//! Usage:
//!   overlay-anchor [OPTIONS] [FILE]
//!
//! Options:
//!   -m, --margin <PX>   Override the clamping margin
//!   -l, --clamp-left    Also clamp overlays against the left viewport edge
//!   -d, --debug         Trace every step and positioning decision to stderr
//!   -h, --help          Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use overlay_anchor::Scenario;

#[derive(Parser)]
#[command(name = "overlay-anchor")]
#[command(about = "Replay overlay scenarios and report anchored positions")]
struct Cli {
    /// Scenario file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Override the clamping margin
    #[arg(short, long)]
    margin: Option<f64>,

    /// Also clamp overlays against the left viewport edge
    #[arg(short = 'l', long)]
    clamp_left: bool,

    /// Debug mode: trace steps and positioning to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let loaded = match &cli.input {
        Some(path) => Scenario::from_file(path).map_err(|e| format!("'{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => Scenario::from_str(&buffer).map_err(|e| e.to_string()),
                Err(e) => Err(format!("reading from stdin: {}", e)),
            }
        }
    };

    let mut scenario = match loaded {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error loading scenario {}", e);
            std::process::exit(1);
        }
    };

    if let Some(margin) = cli.margin {
        scenario.controller.resolver.margin = margin;
    }
    if cli.clamp_left {
        scenario.controller.resolver.clamp_left_edge = true;
    }

    match scenario.run() {
        Ok(outcome) => {
            print!("{}", outcome.render());
            if !outcome.config_errors.is_empty() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Overlay Anchor - anchored overlay controller

USAGE:
    overlay-anchor [OPTIONS] [FILE]
    cat scenario.toml | overlay-anchor

OPTIONS:
    -m, --margin       Clamping margin (default 20)
    -l, --clamp-left   Also clamp against the left viewport edge
    -d, --debug        Trace steps and positioning decisions
    -h, --help         Print help

SCENARIO FORMAT:
    [controller]
    overlays = ["modal-time"]

    [viewport]
    width = 900.0
    height = 600.0
    scroll_y = 120.0

    [[element]]
    tag = "button"
    attributes = {{ data-modal = "modal-time" }}
    rect = {{ x = 850.0, y = 280.0, width = 40.0, height = 20.0 }}

    [[element]]
    id = "modal-time"
    rect = {{ x = 0.0, y = 0.0, width = 400.0, height = 400.0 }}

    [[step]]
    action = "mounted"

STEPS:
    mounted, resolve, activate (element), toggle (overlay),
    close (overlay), scroll (x, y), resize (width, height),
    mount (element), unmount (element)"#
    );
}
