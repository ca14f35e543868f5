use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fibertrace::audit::{AuditSummary, audit_network};
use fibertrace::graph::integrity::check_network;
use fibertrace::project::Project;
use fibertrace::{OpticalPathResult, PathTracer, SignalStatus, TraceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trace FTTH optical paths and evaluate power budgets", long_about = None)]
struct Cli {
    /// JSON file overriding trace defaults (step limit, thresholds, default losses)
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<Utf8PathBuf>,

    /// Log every traversal step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace one splitter back to its OLT
    Trace {
        /// Project snapshot (network + catalogs)
        #[arg(value_name = "PROJECT_FILE")]
        project: Utf8PathBuf,
        /// Box containing the splitter
        #[arg(long = "box")]
        box_id: String,
        #[arg(long)]
        splitter: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Trace every splitter in the project
    Audit {
        #[arg(value_name = "PROJECT_FILE")]
        project: Utf8PathBuf,
        #[arg(long)]
        json: bool,
        /// Only list splitters that are not OK
        #[arg(long)]
        failing: bool,
    },
    /// Report connection-graph integrity issues
    Check {
        #[arg(value_name = "PROJECT_FILE")]
        project: Utf8PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fmt_dbm(v: f64) -> String {
    if v.is_finite() {
        format!("{:.2} dBm", v)
    } else {
        "-inf".to_string()
    }
}

fn print_result(result: &OpticalPathResult) {
    println!(
        "{:<9} {:<24} {:>9} {:>10}  {}",
        "TYPE", "NAME", "LOSS dB", "LENGTH m", "DETAILS"
    );
    for el in &result.path {
        println!(
            "{:<9} {:<24} {:>9.3} {:>10} {}",
            format!("{:?}", el.kind).to_uppercase(),
            el.name,
            el.loss,
            el.length.map(|l| format!("{:.1}", l)).unwrap_or_default(),
            el.details.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("Total loss:  {:.3} dB", result.total_loss);
    match &result.olt_details {
        Some(olt) => {
            println!(
                "Source:      {} (slot {}, port {}) at {}",
                olt.name,
                olt.slot,
                olt.port,
                fmt_dbm(result.olt_power)
            );
            println!("Final power: {}", fmt_dbm(result.final_power));
            match result.status {
                SignalStatus::Ok => println!("Status:      OK"),
                SignalStatus::Marginal => println!("Status:      MARGINAL"),
                SignalStatus::Fail => println!("Status:      FAIL (signal below sensitivity)"),
            }
        }
        None => {
            println!("Source:      {}", result.source_name);
            println!("Status:      FAIL (no signal source found: {:?})", result.termination);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(p) => TraceConfig::load(p)?,
        None => TraceConfig::default(),
    };

    match cli.command {
        Command::Trace {
            project,
            box_id,
            splitter,
            json,
        } => {
            let project = Project::load(&project)?;
            let tracer = PathTracer::new(&project.network, &project.catalogs, &config);
            let result = tracer
                .trace(&splitter, &box_id, None)
                .with_context(|| format!("Failed to trace splitter {}", splitter))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Command::Audit {
            project,
            json,
            failing,
        } => {
            let project = Project::load(&project)?;
            let tracer = PathTracer::new(&project.network, &project.catalogs, &config);
            let mut audits = audit_network(&tracer);
            let summary = AuditSummary::from_audits(&audits);
            if failing {
                audits.retain(|a| !matches!(&a.result, Ok(r) if r.status == SignalStatus::Ok));
            }
            if json {
                let out = serde_json::json!({ "summary": summary, "splitters": audits });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for a in &audits {
                    let line = match &a.result {
                        Ok(r) => format!("{:?} {}", r.status, fmt_dbm(r.final_power)),
                        Err(e) => format!("ERROR {}", e),
                    };
                    println!("{:<20} {:<20} {}", a.box_name, a.splitter_name, line);
                }
                println!(
                    "\n{} splitters: {} ok, {} marginal, {} fail ({} without source), {} errors",
                    summary.splitters,
                    summary.ok,
                    summary.marginal,
                    summary.fail,
                    summary.no_source,
                    summary.errors
                );
            }
        }
        Command::Check { project } => {
            let project = Project::load(&project)?;
            let reports = check_network(&project.network);
            if reports.is_empty() {
                println!("No integrity issues found");
            }
            for report in &reports {
                println!("{}:", report.node_id);
                for issue in &report.issues {
                    println!("  - {}", issue);
                }
            }
        }
    }
    Ok(())
}
