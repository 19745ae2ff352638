use std::io::Write;
use std::path::PathBuf;

use shdcmp::config::parse_config;
use shdcmp::session::RunStatus;
use shdcmp::source::CasePaths;
use shdcmp::{compare_buffers, CompareConfig};
use tracing::info;

/// Options for one comparison run; `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct CompareArgs {
    pub case: String,
    pub config: Option<PathBuf>,
    pub left_dir: Option<PathBuf>,
    pub right_dir: Option<PathBuf>,
    pub extension: Option<String>,
}

/// Resolve the effective config: file (or defaults), then flag overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be read, is not valid YAML
/// for [`CompareConfig`], or carries inconsistent thresholds.
pub fn resolve_config(args: &CompareArgs) -> Result<CompareConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => parse_config(path)?,
        None => CompareConfig::default(),
    };
    if let Some(dir) = &args.left_dir {
        config.left_dir.clone_from(dir);
    }
    if let Some(dir) = &args.right_dir {
        config.right_dir.clone_from(dir);
    }
    if let Some(ext) = &args.extension {
        config.extension.clone_from(ext);
    }
    Ok(config)
}

/// Compare the two files of `args.case`. Returns `true` if any element alarmed.
///
/// # Errors
///
/// Returns an error if the config cannot be resolved, either case file
/// cannot be read, the files fail a structural header check, or writing
/// to stdout fails.
pub fn run(args: &CompareArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    let paths = CasePaths::for_case(&args.case, &config);
    info!(left = %paths.left.display(), right = %paths.right.display(), "comparing");
    let (left, right) = paths.load()?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let outcome = compare_buffers(&left, &right, &config, &mut out)?;
    out.flush()?;

    match outcome.status {
        RunStatus::Match => info!(
            printable = outcome.printable,
            header_diffs = outcome.header_diffs,
            "files match within tolerance"
        ),
        RunStatus::Alarm => info!(alarms = outcome.alarms, "files differ beyond tolerance"),
        // Reported on stdout, but not a failure.
        RunStatus::Incomparable(reason) => info!(?reason, "files not compared"),
    }
    Ok(outcome.status.is_failure())
}
