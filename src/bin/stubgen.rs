// src/bin/stubgen.rs
//! CLI driver for the stub synthesizer.
//!
//! Loads a workspace from a JSON manifest, feeds one diagnostic through
//! the core, and prints the resulting code actions as JSON. This binary
//! only moves bytes; all behaviour lives in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use stubgen::protocol::{Diagnostic, Position, Range};
use stubgen::sema::{FileId, Workspace};
use stubgen::stub::method_stub_actions;

/// Synthesize interface method stubs for one compiler diagnostic.
#[derive(Parser)]
#[command(name = "stubgen", version)]
struct Cli {
    /// Workspace manifest: JSON list of packages with their files.
    manifest: PathBuf,

    /// Package path containing the diagnosed file.
    #[arg(long)]
    package: String,

    /// URI of the diagnosed file, as spelled in the manifest.
    #[arg(long)]
    uri: String,

    /// Zero-based diagnostic line.
    #[arg(long)]
    line: u32,

    /// Zero-based UTF-16 diagnostic column.
    #[arg(long, default_value_t = 0)]
    character: u32,

    /// Diagnostic message, e.g. "C does not implement I (missing method Do)".
    #[arg(long)]
    message: String,
}

#[derive(Deserialize)]
struct ManifestPackage {
    path: String,
    files: Vec<ManifestFile>,
}

#[derive(Deserialize)]
struct ManifestFile {
    uri: String,
    /// Path on disk to read the source from.
    source: PathBuf,
}

fn main() -> ExitCode {
    if let Ok(filter) = EnvFilter::try_from_env("STUBGEN_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> miette::Result<()> {
    let manifest_text = std::fs::read_to_string(&cli.manifest)
        .map_err(|e| miette::miette!("reading {}: {e}", cli.manifest.display()))?;
    let manifest: Vec<ManifestPackage> = serde_json::from_str(&manifest_text)
        .map_err(|e| miette::miette!("parsing manifest: {e}"))?;

    let mut ws = Workspace::new();
    for pkg in &manifest {
        let mut files = Vec::with_capacity(pkg.files.len());
        for file in &pkg.files {
            let source = std::fs::read_to_string(&file.source)
                .map_err(|e| miette::miette!("reading {}: {e}", file.source.display()))?;
            files.push((file.uri.clone(), source));
        }
        ws.add_package(&pkg.path, files)?;
    }

    let pkg = ws
        .package_by_path(&cli.package)
        .ok_or_else(|| miette::miette!("package {} not in manifest", cli.package))?;
    let file_index = ws
        .package(pkg)
        .files()
        .iter()
        .position(|f| f.uri == cli.uri)
        .ok_or_else(|| miette::miette!("file {} not in package {}", cli.uri, cli.package))?;
    let file = FileId { pkg, index: file_index as u32 };

    let position = Position { line: cli.line, character: cli.character };
    let diagnostic = Diagnostic {
        source: "compiler".to_string(),
        range: Range::new(position, position),
        message: cli.message.clone(),
    };

    let actions = method_stub_actions(&ws, file, &[diagnostic])?;
    println!(
        "{}",
        serde_json::to_string_pretty(&actions).map_err(|e| miette::miette!("{e}"))?
    );
    Ok(())
}
