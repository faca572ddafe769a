//! Touchline CLI - run report specifications against a stats database
//!
//! Usage:
//!   touchline run <spec.json> --owner <id>
//!   touchline recompute <report-id> <spec.json> --owner <id>
//!   touchline list --owner <id>
//!   touchline show <report-id> --owner <id>
//!   touchline delete <report-id> --owner <id>
//!
//! Examples:
//!   touchline run specs/goal_leaders.json --owner 4f2c…
//!   touchline list --owner 4f2c… --config ./touchline.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use touchline::config::Config;
use touchline::exec::{QueryExecutor, ResultSet};
use touchline::model::ReportSpec;
use touchline::service::ReportingService;
use touchline::store::{Report, ReportStore};

#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "Touchline - compile and run squad analytics reports")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ./touchline.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a new report from a specification file
    Run {
        /// Path to the JSON report specification
        spec: PathBuf,

        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },

    /// Recompute an existing report with a specification file
    Recompute {
        /// Report id
        id: String,

        /// Path to the JSON report specification
        spec: PathBuf,

        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },

    /// List report summaries for an owner
    List {
        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },

    /// Show a full report including specification and snapshot
    Show {
        /// Report id
        id: String,

        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },

    /// Delete a report
    Delete {
        /// Report id
        id: String,

        /// Owner user id
        #[arg(short, long)]
        owner: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let service = match open_service(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Run { spec, owner } => cmd_run(&service, spec, &owner),
        Commands::Recompute { id, spec, owner } => cmd_recompute(&service, &id, spec, &owner),
        Commands::List { owner } => cmd_list(&service, &owner),
        Commands::Show { id, owner } => cmd_show(&service, &id, &owner),
        Commands::Delete { id, owner } => cmd_delete(&service, &id, &owner),
    }
}

fn open_service(config_path: Option<&Path>) -> Result<ReportingService, String> {
    let config = Config::load_or_default(config_path).map_err(|e| e.to_string())?;

    let stats = Connection::open(&config.database.stats_path)
        .map_err(|e| format!("failed to open stats database: {}", e))?;
    let store = ReportStore::open(&config.database.reports_path).map_err(|e| e.to_string())?;

    Ok(ReportingService::new(QueryExecutor::new(stats), store))
}

fn read_spec(path: &Path) -> Result<ReportSpec, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    ReportSpec::from_json(&json).map_err(|e| e.to_string())
}

fn cmd_run(service: &ReportingService, spec_path: PathBuf, owner: &str) -> ExitCode {
    let spec = match read_spec(&spec_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match service.create_report(&spec, owner) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_recompute(
    service: &ReportingService,
    id: &str,
    spec_path: PathBuf,
    owner: &str,
) -> ExitCode {
    let spec = match read_spec(&spec_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match service.recompute_report(id, &spec, owner) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_list(service: &ReportingService, owner: &str) -> ExitCode {
    match service.list_reports(owner) {
        Ok(summaries) => {
            if summaries.is_empty() {
                println!("No reports.");
            }
            for s in summaries {
                println!(
                    "{}  {}  [{}]  updated {}",
                    s.id,
                    s.name,
                    s.chart_type.as_str(),
                    s.updated_at.to_rfc3339()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_show(service: &ReportingService, id: &str, owner: &str) -> ExitCode {
    match service.get_report(id, owner) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_delete(service: &ReportingService, id: &str, owner: &str) -> ExitCode {
    match service.delete_report(id, owner) {
        Ok(()) => {
            println!("Deleted {}", id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &Report) {
    println!(
        "{}  {}  [{}]",
        report.id,
        report.spec.name,
        report.spec.chart_type.as_str()
    );
    print_result_set(&report.snapshot);
}

fn print_result_set(rs: &ResultSet) {
    println!("{}", rs.columns.join("\t"));
    for row in &rs.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
    println!("({} rows)", rs.rows.len());
}
