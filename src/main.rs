//! Resbase CLI entrypoint.
//!
//! This is the main entrypoint for the resbase command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use resource_baseline::baseline::{BaselineHasher, BaselineLoader};
use resource_baseline::cli::{Cli, Commands, OutputFormatter};
use resource_baseline::config::{ConfigParser, ConfigValidator, MonitorConfig, find_config_file};
use resource_baseline::error::Result;
use resource_baseline::monitor::{BaselineMonitor, MonitorRun};
use resource_baseline::report::ReportWriter;
use resource_baseline::source::SnapshotSource;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Template written by `resbase init`.
const CONFIG_TEMPLATE: &str = include_str!("../templates/resbase.yaml");

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Compare {
            detailed,
            no_write,
            fail_on_diff,
        } => cmd_compare(cli.config.as_ref(), detailed, no_write, fail_on_diff, &formatter).await,
        Commands::Baseline => cmd_baseline(cli.config.as_ref(), &formatter),
    }
}

/// Write a template configuration.
fn cmd_init(path: &Path, force: bool) -> Result<ExitCode> {
    info!("Initializing resbase configuration in: {}", path.display());

    let config_path = path.join("resbase.yaml");

    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(ExitCode::SUCCESS);
    }

    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    eprintln!("Created: {}", config_path.display());

    eprintln!("\nNext steps:");
    eprintln!("  1. Point baseline.path at your approved baseline JSON");
    eprintln!("  2. Point snapshot.path at an export of the deployed resources");
    eprintln!("  3. Map each namespace to its baseline alias");
    eprintln!("  4. Run 'resbase validate' to check your configuration");
    eprintln!("  5. Run 'resbase compare' to find differences");

    Ok(ExitCode::SUCCESS)
}

/// Validate configuration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config_file = resolve_config_path(config_path)?;
    info!("Validating configuration: {}", config_file.display());

    let parser = ConfigParser::new().with_base_path(base_dir(&config_file));
    parser.load_dotenv()?;
    let config = parser.load_with_env(&config_file)?;

    let result = ConfigValidator::new().check(&config);
    eprintln!("{}", formatter.format_validation(&result, show_warnings));

    if !result.is_valid() {
        return Ok(ExitCode::FAILURE);
    }

    eprintln!("Configuration summary:");
    eprintln!("  Baseline: {}", config.baseline.path);
    eprintln!("  Snapshot: {}", config.snapshot.path);
    eprintln!("  Namespaces: {}", config.namespaces.len());
    eprintln!("  Resource types: {}", config.resource_types.len());

    Ok(ExitCode::SUCCESS)
}

/// Compare deployed resources against the baseline.
async fn cmd_compare(
    config_path: Option<&PathBuf>,
    detailed: bool,
    no_write: bool,
    fail_on_diff: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (config, base) = load_config(config_path)?;

    let baseline = BaselineLoader::new().load_file(config.baseline_path(&base))?;
    let source = SnapshotSource::open(config.snapshot_path(&base)).await?;
    if source.skipped_records() > 0 {
        warn!("{} snapshot records were skipped", source.skipped_records());
    }
    for mapping in &config.namespaces {
        if !source.namespaces().any(|namespace| namespace == mapping.name) {
            warn!("Namespace '{}' has no resources in the snapshot", mapping.name);
        }
    }

    let MonitorRun { inventory, report } = BaselineMonitor::new(&config, &baseline, &source).run().await?;

    if no_write {
        debug!("Skipping report files");
    } else {
        let writer = ReportWriter::new(
            config.differences_path(&base),
            config.workbook_path(&base),
            config.resources_path(&base),
        );

        writer.write_resource_details(&inventory).await?;
        eprintln!("Resource details written to: {}", writer.resources_path().display());

        if report.has_findings() {
            writer.write_all(&report).await?;
            eprintln!("Differences written to: {}", writer.differences_path().display());
            eprintln!("Details exported to: {}", writer.workbook_path().display());
        }
    }

    eprintln!("{}", formatter.format_report(&report, detailed));

    if fail_on_diff && report.has_findings() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Summarize the baseline.
fn cmd_baseline(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<ExitCode> {
    let (config, base) = load_config(config_path)?;

    let baseline = BaselineLoader::new().load_file(config.baseline_path(&base))?;
    let fingerprint = BaselineHasher::new().hash_document(&baseline);

    eprintln!("{}", formatter.format_baseline(&baseline, &fingerprint));

    Ok(ExitCode::SUCCESS)
}

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Directory that relative paths in the configuration resolve against.
fn base_dir(config_file: &Path) -> PathBuf {
    config_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Loads and validates configuration, returning it with its base directory.
fn load_config(config_path: Option<&PathBuf>) -> Result<(MonitorConfig, PathBuf)> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    let base = base_dir(&config_file);
    let parser = ConfigParser::new().with_base_path(&base);
    parser.load_dotenv()?;

    let config = parser.load_with_env(&config_file)?;
    ConfigValidator::new().validate(&config)?;

    Ok((config, base))
}
