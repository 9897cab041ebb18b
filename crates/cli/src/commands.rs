//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("crudcheck")
        .about("Run the legacy CRUD fixture corpus against the reference store")
        .arg(
            Arg::new("corpus")
                .help("Directory holding the fixture files")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: ./crudcheck.toml when present)"),
        )
        .arg(
            Arg::new("topology")
                .long("topology")
                .help("Deployment topology: single, replicaset, sharded, sharded-replicaset, load-balanced"),
        )
        .arg(
            Arg::new("server-version")
                .long("server-version")
                .help("Server version reported for skip decisions, e.g. 4.4.0"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .help("Only run cases whose description contains this text"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List cases and their skip decisions without running them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
}
