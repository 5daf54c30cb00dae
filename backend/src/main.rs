//! Cadastros CLI - serve and feed the CRUD administration API
//!
//! # Main Commands
//!
//! ```bash
//! cadastros serve                          # Start HTTP server (port 3000)
//! cadastros serve --in-memory              # ...without a database
//! cadastros import teams equipe.csv        # Bulk import through the API
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! cadastros check                          # Check that the database answers
//! cadastros parse clients clientes.csv     # Print normalized rows as JSON
//! cadastros entities                       # Show entity descriptors
//! ```

use cadastros::{open_store, start_server, HttpGateway, ServeConfig};
use cadastros_common::import::{normalize_sheet, parse_sheet_file};
use cadastros_common::{import_each, import_fail_fast, EntityKind};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cadastros")]
#[command(about = "CRUD administration API for teams, systems, clients and statuses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        #[command(flatten)]
        config: ServeConfig,
    },

    /// Check that the configured database answers
    Check {
        #[command(flatten)]
        config: ServeConfig,
    },

    /// Parse a spreadsheet export and print the rows an import would send
    Parse {
        /// Entity kind (teams, systems, clients, statuses)
        entity: EntityKind,

        /// Input CSV/TSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a spreadsheet export through a running API
    Import {
        /// Entity kind (teams, systems, clients, statuses)
        entity: EntityKind,

        /// Input CSV/TSV file
        input: PathBuf,

        /// API base URL
        #[arg(long, env = "CADASTROS_API_URL", default_value = "http://localhost:3000/api")]
        api: String,

        /// Stop reporting at the first rejected row
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show entity descriptors
    Entities,
}

fn load_env() {
    match std::env::var("DOTENV_CONFIG_PATH") {
        Ok(path) => {
            if let Err(e) = dotenvy::from_path(&path) {
                eprintln!("⚠️  Could not load {}: {}", path, e);
            }
        }
        Err(_) => {
            dotenvy::dotenv().ok();
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[tokio::main]
async fn main() {
    load_env();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config } => cmd_serve(config).await,

        Commands::Check { config } => cmd_check(config).await,

        Commands::Parse { entity, input, output } => cmd_parse(entity, &input, output.as_deref()),

        Commands::Import {
            entity,
            input,
            api,
            fail_fast,
        } => cmd_import(entity, &input, &api, fail_fast).await,

        Commands::Entities => cmd_entities(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    start_server(config).await?;
    Ok(())
}

async fn cmd_check(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔌 Checking record store...");
    let store = open_store(&config).await?;
    store.close().await;
    eprintln!("✅ Record store answered");
    Ok(())
}

fn cmd_parse(kind: EntityKind, input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing {} sheet: {}", kind, input.display());

    let sheet = parse_sheet_file(input)?;
    eprintln!("   Format: {} (auto-detected)", sheet.format);
    eprintln!("   Columns: {}", sheet.headers.join(", "));

    let rows = normalize_sheet(kind, &sheet);
    let dropped = sheet.rows.len() - rows.len();
    eprintln!("✅ {} rows ready ({} dropped without a name)", rows.len(), dropped);

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_import(kind: EntityKind, input: &Path, api: &str, fail_fast: bool) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📥 Importing {} from: {}", kind, input.display());

    let sheet = parse_sheet_file(input)?;
    let rows = normalize_sheet(kind, &sheet);
    eprintln!("   {} rows parsed, {} importable", sheet.rows.len(), rows.len());

    if rows.is_empty() {
        eprintln!("⚠️  Nothing to import");
        return Ok(());
    }

    let gateway = HttpGateway::new(api);
    eprintln!("   Sending {} create calls to {}", rows.len(), gateway.base_url());

    if fail_fast {
        let created = import_fail_fast(&gateway, kind, &rows).await?;
        eprintln!("✅ Imported {} records", created);
        println!("{}", json!({ "created": created }));
        return Ok(());
    }

    let report = import_each(&gateway, kind, &rows).await;
    for failure in report.failures.iter().take(5) {
        eprintln!("   ❌ Row {}: {}", failure.index + 1, failure.error);
    }
    if report.failed() > 5 {
        eprintln!("   ... and {} more", report.failed() - 5);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_complete() {
        eprintln!("✅ Imported {} records", report.created);
        Ok(())
    } else {
        Err(format!("{} of {} rows were rejected", report.failed(), report.total()).into())
    }
}

fn cmd_entities() -> Result<(), Box<dyn std::error::Error>> {
    for kind in EntityKind::ALL {
        let d = kind.descriptor();
        println!("📋 {}", kind);
        println!("   Table: {}", d.table);
        println!("   Columns: {}", d.columns.join(", "));
        println!("   Required: {}", d.required_columns.join(", "));
        println!("   Order by: {}", d.order_by);
        println!();
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
