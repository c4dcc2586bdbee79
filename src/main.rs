//! Style Guardian CLI - Command-line interface for style conformance checks
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like configuration lookup, process exit codes and terminal output
//! - Exit status: 0 clean, 1 violations found, 2 fatal (configuration or I/O)

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use style_guardian::{
    default_config_path, rule_info, AnalysisOptions, OutputFormat, ReportFormatter, ReportOptions,
    StyleConfig, StyleResult, StyleValidator, RULE_CATALOG,
};

/// Exit code for a clean run
const EXIT_CLEAN: i32 = 0;
/// Exit code when violations were found
const EXIT_VIOLATIONS: i32 = 1;
/// Exit code for configuration and other fatal errors
const EXIT_FATAL: i32 = 2;

/// Style Guardian - C/C++ source style conformance checking
#[derive(Parser)]
#[command(name = "style-guardian")]
#[command(version)]
#[command(about = "Checks C and C++ source trees against a configurable house style")]
#[command(long_about = "Style Guardian reads .style-guardian.yml at the root of a source tree and reports every line that breaks the configured layout, whitespace, spacing and naming rules. Designed for CI gates and pre-commit hooks.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a source tree for style violations
    Check {
        /// Root of the tree to check
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Maximum number of violations to report
        #[arg(long)]
        max_violations: Option<usize>,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Fail on first unreadable file
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// List available rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_FATAL);
        }
    }
}

fn run_command(cli: Cli) -> StyleResult<i32> {
    match cli.command {
        Commands::Check { root, format, max_violations, no_parallel, fail_fast } => run_check(
            cli.config,
            root,
            format,
            max_violations,
            no_parallel,
            fail_fast,
            !cli.no_color,
        ),
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Explain { rule_id } => run_explain(&rule_id),
        Commands::Rules { enabled_only } => run_list_rules(cli.config, enabled_only),
    }
}

fn run_check(
    config_path: Option<PathBuf>,
    root: PathBuf,
    format: OutputFormatArg,
    max_violations: Option<usize>,
    no_parallel: bool,
    fail_fast: bool,
    use_colors: bool,
) -> StyleResult<i32> {
    // The configuration is mandatory; a missing file aborts before any check
    let config_path = config_path.unwrap_or_else(|| default_config_path(&root));
    tracing::debug!("Using configuration '{}'", config_path.display());

    let validator = StyleValidator::from_config_file(&config_path)?.with_report_formatter(
        ReportFormatter::new(ReportOptions { use_colors, max_violations }),
    );

    let options = AnalysisOptions { parallel: !no_parallel, fail_fast, ..Default::default() };
    let report = validator.validate_directory(&root, &options)?;

    print!("{}", validator.format_report(&report, format.into())?);

    if report.has_violations() {
        Ok(EXIT_VIOLATIONS)
    } else {
        Ok(EXIT_CLEAN)
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> StyleResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(style_guardian::DEFAULT_CONFIG_FILE));

    println!("Validating configuration: {}", config_path.display());

    match StyleConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let enabled = RULE_CATALOG.iter().filter(|info| info.is_enabled(&config.rules)).count();

            println!("📊 Configuration summary:");
            println!("  Include directories: {}", config.include.join(", "));
            println!("  Exclusions: {}", config.exclude.len());
            println!("  Extensions: {}", config.normalized_extensions().join(", "));
            println!("  Rules: {} total, {} enabled", RULE_CATALOG.len(), enabled);
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(EXIT_CLEAN)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(EXIT_FATAL)
        }
    }
}

fn run_explain(rule_id: &str) -> StyleResult<i32> {
    let Some(info) = rule_info(rule_id) else {
        eprintln!("❌ Rule '{rule_id}' not found");
        println!();
        println!("Available rules:");
        for info in RULE_CATALOG {
            println!("    - {}", info.id);
        }
        return Ok(EXIT_VIOLATIONS);
    };

    let defaults = StyleConfig::default();

    println!("📖 Rule: {}", info.id);
    println!("⚙️  Config key: rules.{}", info.config_key);
    println!("✅ Enabled by default: {}", info.is_enabled(&defaults.rules));
    println!();
    println!("📝 Description:");
    println!("   {}", info.description);

    Ok(EXIT_CLEAN)
}

fn run_list_rules(config_path: Option<PathBuf>, enabled_only: bool) -> StyleResult<i32> {
    let config = match config_path {
        Some(path) => StyleConfig::load_from_file(path)?,
        None => StyleConfig::default(),
    };

    println!("📋 Available Rules\n");

    for info in RULE_CATALOG {
        let enabled = info.is_enabled(&config.rules);
        if enabled_only && !enabled {
            continue;
        }

        let status = if enabled { "✅" } else { "❌" };
        println!("  {}🔍 {} [{}] - {}", status, info.id, info.config_key, info.description);
    }

    Ok(EXIT_CLEAN)
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, falling back to warnings
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
