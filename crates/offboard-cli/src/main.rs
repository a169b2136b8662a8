//! offboard CLI: run the offboarding batch, or check its inputs.

use clap::{Args, Parser, Subcommand};
use offboard_core::config::OffboardConfig;
use offboard_core::summary::{OutcomeStatus, RunStatus, RunSummary};
use offboard_exec::Pipeline;
use offboard_gateway::PgAssetGateway;
use offboard_io::DirectiveLoader;
use offboard_notify::{build_recipient_email, MailTransport, MemoryTransport, SmtpRelay};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "offboard")]
#[command(about = "Offboarding hardware recovery: per-employee asset reports and notification emails", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Employee directive CSV (overrides config)
    #[arg(short, long)]
    input: Option<String>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    source: InputArgs,

    /// Directory for per-employee CSV and XLSX files (overrides config)
    #[arg(long)]
    output_dir: Option<String>,

    /// Combined audit CSV path (overrides config)
    #[arg(long)]
    combined: Option<String>,

    /// PostgreSQL connection URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// SMTP relay host (overrides config)
    #[arg(long)]
    smtp_host: Option<String>,

    /// SMTP relay port (overrides config)
    #[arg(long)]
    smtp_port: Option<u16>,

    /// Write reports but record notifications instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Write the JSON run summary here
    #[arg(long)]
    summary: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Query assets, write reports and send notifications
    Run(RunArgs),

    /// Load the directive file and report what it contains
    Validate(InputArgs),

    /// Show the recipients each directive would produce
    Preview(InputArgs),
}

fn main() {
    let _env = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            if let Err(e) = run(&args) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate(args) => {
            if let Err(e) = validate(&args) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Preview(args) => {
            if let Err(e) = preview(&args) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Defaults, then the YAML file, then `OFFBOARD_*` variables.
fn load_config(args: &InputArgs) -> Result<OffboardConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => OffboardConfig::from_yaml_file(path)?,
        None => OffboardConfig::default(),
    };
    config.apply_env();
    if let Some(input) = &args.input {
        config.input.path = input.clone();
    }
    Ok(config)
}

fn apply_run_overrides(config: &mut OffboardConfig, args: &RunArgs) {
    if let Some(dir) = &args.output_dir {
        config.reports.output_dir = dir.clone();
    }
    if let Some(path) = &args.combined {
        config.reports.combined_path = path.clone();
    }
    if let Some(url) = &args.database_url {
        config.database.url = url.clone();
    }
    if let Some(host) = &args.smtp_host {
        config.mail.smtp_host = host.clone();
    }
    if let Some(port) = args.smtp_port {
        config.mail.smtp_port = port;
    }
    if let Some(path) = &args.summary {
        config.summary_path = Some(path.clone());
    }
}

fn run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.source)?;
    apply_run_overrides(&mut config, args);
    config.validate()?;

    let loader = DirectiveLoader::new(config.input.clone());
    let directives = loader.load()?;
    if directives.is_empty() {
        println!(
            "No valid employees found in {}. Nothing to do.",
            config.input.path
        );
        return Ok(());
    }

    let gateway = PgAssetGateway::connect(&config.database)?;

    let transport: Box<dyn MailTransport> = if args.dry_run {
        tracing::info!("dry run: notifications are recorded, not sent");
        Box::new(MemoryTransport::new())
    } else {
        let relay = SmtpRelay::new(&config.mail);
        relay.check_connection();
        Box::new(relay)
    };

    let mut pipeline = Pipeline::new(&config, gateway, transport);
    let summary = pipeline.run(&directives)?;
    print_summary(&summary);

    Ok(())
}

fn validate(args: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    config.validate()?;
    let directives = DirectiveLoader::new(config.input.clone()).load()?;
    let with_cc = directives.iter().filter(|d| !d.cc_emails.is_empty()).count();
    println!(
        "✓ {} employee(s) in {} ({} with CC addresses)",
        directives.len(),
        config.input.path,
        with_cc
    );
    Ok(())
}

fn preview(args: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    config.validate()?;
    let directives = DirectiveLoader::new(config.input.clone()).load()?;
    if directives.is_empty() {
        println!("No valid employees found in {}.", config.input.path);
        return Ok(());
    }

    println!("Notifications");
    println!("=============");
    for (i, d) in directives.iter().enumerate() {
        let to = build_recipient_email(&d.given_name, &d.surname, &config.mail.recipient_domain);
        let cc = if d.cc_emails.is_empty() {
            "none".to_string()
        } else {
            d.cc_emails.join(", ")
        };
        println!("  {}. {} -> {} (CC: {})", i + 1, d.display_name(), to, cc);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for o in &summary.outcomes {
        match &o.status {
            OutcomeStatus::Sent => {
                println!("  sent     {} ({} row(s))", o.to_address, o.row_count)
            }
            OutcomeStatus::SendFailed { reason } => {
                println!("  unsent   {}: {}", o.to_address, reason)
            }
            OutcomeStatus::Failed { stage, reason } => println!(
                "  failed   {} {} at {}: {}",
                o.given_name, o.surname, stage, reason
            ),
        }
    }

    match summary.status() {
        RunStatus::NoEmployees => {}
        RunStatus::NoMatches => println!("No rows matched any of the provided employees."),
        RunStatus::Completed => {
            println!();
            println!(
                "Saved {} row(s) to combined file: {}",
                summary.total_rows_written,
                absolute(Path::new(&summary.combined_path)).display()
            );
        }
    }
    println!(
        "  Notifications: {} sent, {} failed",
        summary.sent_count(),
        summary.failed_count()
    );
    if let Some(digest) = &summary.combined_digest {
        println!("  Combined digest: {}", digest);
    }
    println!(
        "  Duration: {}ms",
        summary.duration_ms()
    );
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
