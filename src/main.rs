//! KWIC index generator
//!
//! Reads lines of text, generates every circular word shift of each line and
//! prints the shifts alphabetized by their leading word.

use std::process;
use clap::{Arg, ArgAction, Command};

use kwic::{
    config::{KwicConfig, KwicConfigBuilder},
    error::KwicResult,
    run,
};

fn main() {
    let result = try_main();
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("kwic: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn try_main() -> KwicResult<i32> {
    let matches = build_cli().get_matches();

    let config = parse_config_from_matches(&matches)?;
    init_logging(config.debug);

    run(&config)
}

fn build_cli() -> Command {
    Command::new("kwic")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("kwic [OPTION]... [FILE]...")
        .about("Print a Key-Word-In-Context index of text lines")
        .long_about("Print a Key-Word-In-Context index of text lines.\n\nEvery circular shift of the words of every input line is listed, sorted case-insensitively by its leading word, with that word capitalized. Blank lines are ignored.")

        // Input files
        .arg(Arg::new("files")
            .help("Input files (use '-' or omit for stdin)")
            .num_args(0..)
            .value_name("FILE"))

        // I/O options
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Write result to FILE instead of standard output")
            .value_name("FILE"))
        .arg(Arg::new("zero-terminated")
            .short('z')
            .long("zero-terminated")
            .help("Line delimiter is NUL, not newline")
            .action(ArgAction::SetTrue))

        // Performance options
        .arg(Arg::new("parallel")
            .long("parallel")
            .help("Use N worker threads for shifting and sorting")
            .value_name("N"))

        // Diagnostics
        .arg(Arg::new("debug")
            .long("debug")
            .help("Log pipeline stages and sizes to stderr")
            .action(ArgAction::SetTrue))
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> KwicResult<KwicConfig> {
    let mut builder = KwicConfigBuilder::new();

    for file in matches.get_many::<String>("files").unwrap_or_default() {
        builder = builder.input_file(file.clone());
    }
    if let Some(output) = matches.get_one::<String>("output") {
        builder = builder.output_file(output.clone());
    }
    if matches.get_flag("zero-terminated") {
        builder = builder.zero_terminated();
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }

    let mut config = builder.build()?;

    if let Some(parallel_str) = matches.get_one::<String>("parallel") {
        config.set_parallel_threads_from_string(parallel_str)?;
    }

    // Validate the final configuration
    config.validate()?;

    Ok(config)
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--debug`
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
