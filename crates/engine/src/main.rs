use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use serde_json::{Value, json};

use depotiq_engine::{Engine, EngineConfig, EngineError};

/// `depotiq [REQUEST_FILE]`: run one JSON request (from the file, or stdin
/// when no path is given) and print the JSON result to stdout.
fn main() -> ExitCode {
    depotiq_observability::init();

    let outcome = respond(std::env::args().nth(1));
    match &outcome {
        Ok(output) => println!("{output}"),
        Err(body) => println!("{body}"),
    }
    ExitCode::from(exit_status(&outcome))
}

/// Pretty result on success, the JSON error body on failure.
fn respond(path: Option<String>) -> Result<String, Value> {
    run(path).map_err(|err| {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        error_body(&err)
    })
}

fn exit_status(outcome: &Result<String, Value>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn run(path: Option<String>) -> anyhow::Result<String> {
    let payload = read_payload(path)?;

    let engine = Engine::new(EngineConfig::from_env())?;
    let output = engine.dispatch_json(&payload)?;

    Ok(serde_json::to_string_pretty(&output)?)
}

fn error_body(err: &anyhow::Error) -> Value {
    match err.downcast_ref::<EngineError>() {
        Some(engine_err) => engine_err.to_json(),
        None => json!({ "error": "io_error", "message": format!("{err:#}") }),
    }
}

fn read_payload(path: Option<String>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read request file {path}")),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}
