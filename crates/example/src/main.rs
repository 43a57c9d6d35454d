//! Assembles the example lamp and runs its lifecycle.
//!
//! # Usage
//!
//! ```bash
//! lamp [directive.xml] [color]
//! ```
//!
//! Prints the lamp's `.type` document on stdout. Set `METRO_LOG=json` for
//! structured logs.

use example::{Assembly, Lamp, resources};
use metro_core::{TracingConfig, TracingFormat};
use std::path::PathBuf;
use std::process::ExitCode;

#[expect(clippy::print_stdout, reason = "the type document is the program output")]
fn main() -> ExitCode {
    let format = std::env::var("METRO_LOG")
        .ok()
        .and_then(|value| TracingFormat::parse(&value))
        .unwrap_or(TracingFormat::Compact);
    TracingConfig::new()
        .with_format(format)
        .with_env_filter("info,metro_builder=debug")
        .init();

    let mut args = std::env::args().skip(1);
    let directive = args.next().map_or_else(|| resources().join("lamp.xml"), PathBuf::from);
    let color = args.next().unwrap_or_else(|| "white".to_string());

    let assembly = match Assembly::load(&resources(), &directive, &color) {
        Ok(assembly) => assembly,
        Err(err) => {
            tracing::error!(error = %err, directive = %directive.display(), "unable to assemble lamp");
            return ExitCode::FAILURE;
        }
    };

    match assembly.type_document() {
        Ok(document) => println!("{document}"),
        Err(err) => {
            tracing::error!(error = %err, "unable to encode lamp type");
            return ExitCode::FAILURE;
        }
    }

    let mut lamp = Lamp::default();
    match assembly.run(&mut lamp) {
        Ok(visited) => {
            tracing::info!(states = ?visited, calls = ?lamp.calls(), "lamp lifecycle complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "lamp lifecycle failed");
            ExitCode::FAILURE
        }
    }
}
