//! ClearGuard CLI - PCB design rule checks from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use clearguard::{report, Board, DrcEngine, DrcOptions, DrcReport, Severity, Violation, ViolationKind};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "clearguard")]
#[command(about = "PCB design rule check tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the design rule checks on a board snapshot
    Check {
        /// Path to a board snapshot (.json)
        #[arg(value_name = "BOARD")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// JSON file with check options
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Also write the text report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Exit with error code if any error-level violation is found
        #[arg(long)]
        fail_on_violations: bool,

        /// Log each check to stderr
        #[arg(short, long)]
        verbose: bool,

        #[arg(long)]
        no_pad_to_pad: bool,

        #[arg(long)]
        no_unconnected: bool,

        #[arg(long)]
        no_zones: bool,

        #[arg(long)]
        no_keepout: bool,

        #[arg(long)]
        no_courtyard_overlap: bool,

        #[arg(long)]
        no_missing_courtyard: bool,
    },

    /// List the violation kinds the checks report
    Rules {
        /// Show severities
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

/// Check toggles given on the command line
struct Disabled {
    pad_to_pad: bool,
    unconnected: bool,
    zones: bool,
    keepout: bool,
    courtyard_overlap: bool,
    missing_courtyard: bool,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            options,
            report,
            fail_on_violations,
            verbose,
            no_pad_to_pad,
            no_unconnected,
            no_zones,
            no_keepout,
            no_courtyard_overlap,
            no_missing_courtyard,
        } => {
            init_logging(verbose);
            let disabled = Disabled {
                pad_to_pad: no_pad_to_pad,
                unconnected: no_unconnected,
                zones: no_zones,
                keepout: no_keepout,
                courtyard_overlap: no_courtyard_overlap,
                missing_courtyard: no_missing_courtyard,
            };
            handle_check(
                &file,
                format,
                options.as_deref(),
                report.as_deref(),
                fail_on_violations,
                disabled,
            )
        }
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_options(file: Option<&Path>, disabled: Disabled) -> Result<DrcOptions, clearguard::DrcError> {
    let mut options = match file {
        Some(path) => DrcOptions::from_json_file(path)?,
        None => DrcOptions::default(),
    };
    options.pad_to_pad &= !disabled.pad_to_pad;
    options.unconnected &= !disabled.unconnected;
    options.zones &= !disabled.zones;
    options.keepout &= !disabled.keepout;
    options.footprint_overlap &= !disabled.courtyard_overlap;
    options.missing_courtyard &= !disabled.missing_courtyard;
    Ok(options)
}

fn handle_check(
    file: &Path,
    format: OutputFormat,
    options_file: Option<&Path>,
    report_file: Option<&Path>,
    fail_on_violations: bool,
    disabled: Disabled,
) -> i32 {
    let options = match build_options(options_file, disabled) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut board = match Board::load(file) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let result = DrcEngine::new(options).run(&mut board);

    if let Some(path) = report_file {
        if let Err(e) = report::save_report(path, &result, &board) {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    let printed = match format {
        OutputFormat::Human => output_human(&result, &board),
        OutputFormat::Json => output_json(&result),
        OutputFormat::Github => {
            output_github(&result, file);
            Ok(())
        }
    };
    if let Err(e) = printed {
        eprintln!("Error: {}", e);
        return 1;
    }

    if fail_on_violations && (result.has_errors() || result.netclass_failed) {
        return 1;
    }
    0
}

fn output_human(result: &DrcReport, board: &Board) -> Result<(), clearguard::DrcError> {
    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), result, board)?;

    println!("\n  Summary:");
    println!("    Errors:      {}", result.stats.errors);
    println!("    Warnings:    {}", result.stats.warnings);
    println!("    Unconnected: {}", result.stats.unconnected);
    println!("    Total:       {}", result.total_issues());
    Ok(())
}

fn output_json(result: &DrcReport) -> Result<(), clearguard::DrcError> {
    let output = serde_json::json!({
        "report": result,
        "summary": {
            "errors": result.stats.errors,
            "warnings": result.stats.warnings,
            "unconnected": result.stats.unconnected,
            "total": result.total_issues(),
            "netclass_failed": result.netclass_failed,
            "cancelled": result.cancelled,
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn severity_to_github(violation: &Violation) -> &'static str {
    match violation.kind.severity() {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn output_github(result: &DrcReport, file: &Path) {
    for violation in &result.violations {
        println!(
            "::{} file={}::{}",
            severity_to_github(violation),
            file.display(),
            violation.to_string().replace('\n', " ")
        );
    }
    for item in &result.unconnected {
        println!(
            "::error file={}::{} {} -> {}",
            file.display(),
            ViolationKind::UnconnectedItems,
            item.source_label,
            item.target_label
        );
    }
}

fn handle_rules(verbose: bool) {
    println!("Available violation kinds:\n");

    for kind in ViolationKind::all() {
        print!("  {:>3}  {}", kind.code(), kind.description());
        if verbose {
            print!(" ({:?})", kind.severity());
        }
        println!();
    }
}
