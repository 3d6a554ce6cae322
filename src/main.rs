//! dtf-json CLI.
//!
//! Parses a document from a file or stdin and either pretty-prints it or
//! reports whether it parses.
//!
//! Exit codes: 0 on success, 1 when the document fails to parse, 2 when the
//! input cannot be read.

use clap::{Args, Parser, Subcommand};
use dtf_json::json::{object_to_string, parse_with_limits, Limits, MAX_NESTING_DEPTH};
use dtf_json::ErrorCode;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dtf-json")]
#[command(about = "Parse and pretty-print JSON documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print it in canonical pretty form
    Format(InputArgs),

    /// Parse a document and report `ok` or the first error
    Check(InputArgs),

    /// Show version information
    Version,
}

#[derive(Args)]
struct InputArgs {
    /// Input file; reads stdin when omitted or `-`
    path: Option<PathBuf>,

    /// Translate escape sequences in object keys
    #[arg(long)]
    escape_keys: bool,

    /// Fail on repeated keys instead of keeping every member
    #[arg(long)]
    reject_duplicate_keys: bool,

    /// Maximum nesting depth of objects and arrays (capped at 192)
    #[arg(long, value_name = "N")]
    max_depth: Option<u64>,
}

impl InputArgs {
    fn limits(&self) -> Limits {
        let mut limits = Limits::standard();
        limits.escape_keys = self.escape_keys;
        limits.reject_duplicate_keys = self.reject_duplicate_keys;
        if let Some(depth) = self.max_depth {
            if depth > MAX_NESTING_DEPTH {
                tracing::warn!(
                    requested = depth,
                    ceiling = MAX_NESTING_DEPTH,
                    "--max-depth clamped to the supported ceiling"
                );
            }
            limits.max_nesting_depth = depth.min(MAX_NESTING_DEPTH);
        }
        limits
    }

    fn read_input(&self) -> std::io::Result<String> {
        match &self.path {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
            _ => {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn describe(error: &ErrorCode) -> String {
    format!("{} ({}): {}", error.name(), error.code(), error)
}

fn run(args: &InputArgs, print_document: bool) -> ExitCode {
    let input = match args.read_input() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("error: cannot read input: {}", e);
            return ExitCode::from(2);
        }
    };

    match parse_with_limits(&input, args.limits()) {
        Ok(object) => {
            if print_document {
                println!("{}", object_to_string(&object));
            } else {
                println!("ok");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            if print_document {
                eprintln!("error: {}", describe(&error));
            } else {
                println!("error: {}", describe(&error));
            }
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Format(args)) => run(&args, true),
        Some(Commands::Check(args)) => run(&args, false),
        Some(Commands::Version) => {
            println!("dtf-json v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        None => {
            println!("dtf-json v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            ExitCode::SUCCESS
        }
    }
}
