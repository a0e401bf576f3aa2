//! cloud-delta: change detection and impact analysis for cloud resource inventories
//!
//! Compares two snapshots of a resource inventory and reports what changed,
//! how severe each change is, and which other resources it may affect.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use cloud_delta::{
    cli,
    config::{
        discover_config_file, generate_full_example_config, generate_json_schema,
        load_or_default, AppConfig, ConfigPreset, DiffConfig, DiffPaths, StateLabels, Validatable,
    },
    diff::ChangeSeverity,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSnapshot Formats:",
        "\n  JSON or YAML; a list of records or {stateId, resources: [...]}",
        "\n\nOutput Formats:",
        "\n  json, yaml, summary",
        "\n\nFeatures:",
        "\n  Attribute diff, severity rules, security/network impact, dependency cascades"
    )
}

#[derive(Parser)]
#[command(name = "cloud-delta")]
#[command(version, long_version = build_long_version())]
#[command(about = "Cloud resource inventory change detection and impact analysis", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or no fail flag set)
    1  Changes detected (--fail-on-change)
    2  Critical change detected (--fail-on-critical)
    3  Error occurred

EXAMPLES:
    # Quick diff with auto-detected output
    cloud-delta diff monday.json tuesday.json

    # CI/CD pipeline check
    cloud-delta diff baseline.yaml current.yaml --preset ci-cd

    # Security review of high-risk changes only
    cloud-delta diff old.json new.json -o summary --min-severity high")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "CLOUD_DELTA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the old snapshot
    old: PathBuf,

    /// Path to the new snapshot
    new: PathBuf,

    /// State id of the old snapshot (defaults to its stateId, then file name)
    #[arg(long)]
    from_state: Option<String>,

    /// State id of the new snapshot (defaults to its stateId, then file name)
    #[arg(long)]
    to_state: Option<String>,

    /// Output format (auto: summary if interactive, json otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Field name to exclude from comparison (repeatable)
    #[arg(long = "ignore", value_name = "FIELD")]
    ignore: Vec<String>,

    /// Severity rule as PATTERN=SEVERITY, checked before the built-in rules (repeatable)
    #[arg(long = "severity-rule", value_name = "PATTERN=SEVERITY", value_parser = parse_severity_rule)]
    severity_rules: Vec<(String, ChangeSeverity)>,

    /// Only report changes at or above this severity
    #[arg(long)]
    min_severity: Option<ChangeSeverity>,

    /// Include unchanged resources in structured output
    #[arg(long)]
    include_unchanged: bool,

    /// Configuration preset (default, security, ci-cd)
    #[arg(long, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    /// Exit with code 1 if any change is detected
    #[arg(long)]
    fail_on_change: bool,

    /// Exit with code 2 if a Critical change is detected
    #[arg(long)]
    fail_on_critical: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two resource snapshots
    Diff(DiffArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .cloud-delta.yaml in the current directory
    Init,
}

/// Parse a `PATTERN=SEVERITY` severity rule.
fn parse_severity_rule(s: &str) -> Result<(String, ChangeSeverity), String> {
    let (pattern, severity) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATTERN=SEVERITY, got '{s}'"))?;
    if pattern.is_empty() {
        return Err("severity rule pattern must not be empty".to_string());
    }
    Ok((pattern.to_string(), severity.parse()?))
}

fn parse_preset(s: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{s}' (expected one of: {})", names.join(", "))
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Diff(args) => {
            let mut overrides = args
                .preset
                .map_or_else(AppConfig::default, AppConfig::from_preset);
            let mut builder = AppConfig::builder()
                .output_format(args.output)
                .output_file(args.output_file)
                .min_severity(args.min_severity)
                .include_unchanged(args.include_unchanged)
                .no_color(cli.no_color)
                .ignore_fields(args.ignore)
                .fail_on_change(args.fail_on_change)
                .fail_on_critical(args.fail_on_critical)
                .quiet(cli.quiet);
            for (pattern, severity) in args.severity_rules {
                builder = builder.severity_rule(pattern, severity);
            }
            overrides.merge(&builder.build());

            let (app_config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = &loaded_from {
                tracing::debug!("Loaded config from {}", path.display());
            }

            let errors = app_config.validate();
            if !errors.is_empty() {
                for error in &errors {
                    tracing::error!("{error}");
                }
                eprintln!("Error: invalid configuration ({} errors)", errors.len());
                std::process::exit(exit_codes::ERROR);
            }

            let config = DiffConfig::from_app_config(
                app_config,
                DiffPaths {
                    old: args.old,
                    new: args.new,
                },
                StateLabels {
                    from: args.from_state,
                    to: args.to_state,
                },
            );

            match cli::run_diff(config) {
                Ok(exit_code) => {
                    if exit_code != exit_codes::SUCCESS {
                        std::process::exit(exit_code);
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    std::process::exit(exit_codes::ERROR);
                }
            }
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "cloud-delta", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = generate_json_schema().context("failed to serialize schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("cloud-delta").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in &[
                    ".cloud-delta.yaml",
                    ".cloud-delta.yml",
                    "cloud-delta.yaml",
                    "cloud-delta.yml",
                ] {
                    eprintln!("  {name}");
                }
                eprintln!();
                match discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".cloud-delta.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
