//! crudcheck CLI: run a fixture corpus against the reference store.
//!
//! ```text
//! crudcheck [--config FILE] [--topology T] [--server-version V]
//!           [--filter TEXT] [--list] [--json] [-v...] CORPUS
//! ```
//!
//! Exit codes: 0 when every case passed or was skipped, 1 when any case
//! failed, 2 when the run could not start (bad config, missing corpus,
//! malformed fixture).

mod commands;
mod format;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::{info, Level};

use crudcheck_conformance::{ConformanceError, EngineConfig, Runner, CONFIG_FILE_NAME};
use crudcheck_executor::Executor;
use crudcheck_storage::MemoryStore;

use commands::build_cli;
use format::{format_cases, format_error, format_report, OutputMode};

const EXIT_FAILURES: i32 = 1;
const EXIT_RUN_ERROR: i32 = 2;

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    init_logging(matches.get_count("verbose"));

    match run(&matches, output_mode) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FAILURES),
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(EXIT_RUN_ERROR);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the run succeeded.
fn run(matches: &ArgMatches, mode: OutputMode) -> Result<bool, ConformanceError> {
    let config = load_config(matches)?;
    let corpus = matches
        .get_one::<String>("corpus")
        .map(PathBuf::from)
        .ok_or_else(|| ConformanceError::Config("missing corpus argument".into()))?;

    let store = Arc::new(MemoryStore::with_deployment(
        config.deployment.topology,
        config.deployment.server_version.clone(),
    ));
    let executor = Executor::new(Arc::clone(&store));
    let mut runner = Runner::new(store.as_ref(), &executor, config);
    if let Some(text) = matches.get_one::<String>("filter") {
        runner = runner.with_filter(text.as_str());
    }
    let deployment = &runner.config().deployment;
    info!(
        target: "crudcheck::cli",
        corpus = %corpus.display(),
        topology = %deployment.topology,
        server_version = %deployment.server_version,
        "Starting run"
    );

    if matches.get_flag("list") {
        let cases = runner.discover(&corpus)?;
        println!("{}", format_cases(&cases, mode));
        return Ok(true);
    }

    let report = runner.run_corpus(&corpus)?;
    println!("{}", format_report(&report, mode));
    Ok(report.is_success())
}

/// Config file (explicit, or `./crudcheck.toml` when present), then flags.
fn load_config(matches: &ArgMatches) -> Result<EngineConfig, ConformanceError> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EngineConfig::from_file(Path::new(path))?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            EngineConfig::from_file(Path::new(CONFIG_FILE_NAME))?
        }
        None => EngineConfig::default(),
    };

    if let Some(topology) = matches.get_one::<String>("topology") {
        config.deployment.topology = topology
            .parse()
            .map_err(|e: crudcheck_core::Error| ConformanceError::Config(e.to_string()))?;
    }
    if let Some(version) = matches.get_one::<String>("server-version") {
        config.deployment.server_version = version
            .parse()
            .map_err(|e: crudcheck_core::Error| ConformanceError::Config(e.to_string()))?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudcheck_core::Topology;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[deployment]\ntopology = \"replicaset\"\nserver_version = \"4.0\"\n")
            .unwrap();
        let path = path.to_string_lossy().to_string();

        let matches = build_cli()
            .try_get_matches_from(["crudcheck", "--config", &path, "corpus"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.deployment.topology, Topology::ReplicaSet);

        let matches = build_cli()
            .try_get_matches_from(["crudcheck", "--config", &path, "--topology", "sharded", "corpus"])
            .unwrap();
        assert_eq!(load_config(&matches).unwrap().deployment.topology, Topology::Sharded);
    }

    #[test]
    fn test_bad_flag_values_are_config_errors() {
        let matches = build_cli()
            .try_get_matches_from(["crudcheck", "--server-version", "four", "corpus"])
            .unwrap();
        assert!(matches!(load_config(&matches), Err(ConformanceError::Config(_))));
    }
}
