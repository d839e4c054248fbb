/// Kneeplan Terminal - replay a planning event script
///
/// Usage:
///   kneeplan-terminal <script> [--config <config.json>]
///
/// Set RUST_LOG=kneeplan_core=debug to see which entities were skipped.
use std::env;
use std::fs;
use std::io::{self, stdout};
use std::process::ExitCode;

use kneeplan_core::PlannerConfig;
use kneeplan_terminal::ReplayApp;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("kneeplan-terminal");

    let mut script_path = None;
    let mut config_path = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => config_path = rest.next(),
            _ => script_path = Some(arg),
        }
    }

    let Some(script_path) = script_path else {
        eprintln!("Usage: {program} <script> [--config <config.json>]");
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no script given"));
    };

    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                io::Error::new(e.kind(), format!("Failed to read config {path}: {e}"))
            })?;
            PlannerConfig::from_json(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?
        }
        None => PlannerConfig::default(),
    };

    let script = fs::read_to_string(script_path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to read script {script_path}: {e}"))
    })?;

    let mut app = ReplayApp::new(config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let count = app
        .replay(&script)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    log::info!("replayed {count} events from {script_path}");

    app.print(&mut stdout())
}
