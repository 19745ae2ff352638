use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

/// Top-level CLI arguments for the `shdcmp` command
#[derive(Parser, Debug)]
#[command(
    name = "shdcmp",
    about = "shdcmp — check two implementations' shade files agree within float tolerance",
    version
)]
struct Cli {
    /// Case name, without directory or extension (e.g. MunkB_Coh)
    case: String,
    /// YAML config with directories, labels and thresholds
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the implementation under test's files
    #[arg(long)]
    left_dir: Option<PathBuf>,
    /// Directory holding the reference implementation's files
    #[arg(long)]
    right_dir: Option<PathBuf>,
    /// File extension, without the dot
    #[arg(long)]
    extension: Option<String>,
    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the comparison described by `cli`, returning whether it alarmed
fn run_command(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let args = commands::compare::CompareArgs {
        case: cli.case,
        config: cli.config,
        left_dir: cli.left_dir,
        right_dir: cli.right_dir,
        extension: cli.extension,
    };
    commands::compare::run(&args)
}

/// Entry point: parse CLI arguments, compare, and map the result to an exit status
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
