use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rulekit::config::{StoreConfig, DEFAULT_RULES_DIR, RULES_DIR_ENV};
use rulekit::engine::size::{thresholds_legend, SizeReport, SizeStatus};
use rulekit::models::{RuleRequest, RuleScope};
use rulekit::store::RuleStore;
use rulekit::{api, mcp};

#[derive(Parser)]
#[command(name = "rulekit")]
#[command(about = "Scoped development rules for AI-assisted development")]
struct Cli {
    /// Directory containing manifest.yml and the rule files
    #[arg(long, global = true, env = RULES_DIR_ENV, default_value = DEFAULT_RULES_DIR)]
    rules_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Start MCP server via stdio
    Mcp,
    /// List the keys defined for a scope
    Scopes {
        /// project, group, tech, or language
        scope: String,
    },
    /// Report the merged size of project and tech rule sets
    CheckSize {
        /// Only check this project
        project: Option<String>,
        /// Only check this tech
        tech: Option<String>,
    },
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rulekit=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(store: RuleStore, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        "Starting rulekit server on port {} (rules: {})",
        port,
        store.config().rules_dir.display()
    );

    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("rulekit server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn check_scope(
    store: &RuleStore,
    scope: RuleScope,
    only: Option<String>,
) -> anyhow::Result<SizeReport> {
    let keys = match only {
        Some(key) => vec![key],
        None => store.available_scope_keys(scope)?,
    };

    let mut report = SizeReport::default();
    for key in keys {
        let outcome = store
            .merged_rules(&RuleRequest::new(scope, key.clone()))
            .map(|merged| merged.len())
            .map_err(|e| e.to_string());
        report.push(key, outcome);
    }
    Ok(report)
}

fn check_size(
    store: &RuleStore,
    project: Option<String>,
    tech: Option<String>,
) -> anyhow::Result<SizeStatus> {
    println!("Rules context size check\n");

    let mut worst = SizeStatus::Ok;
    for (scope, only, title) in [
        (RuleScope::Project, project, "Merged project sizes"),
        (RuleScope::Tech, tech, "Merged tech sizes"),
    ] {
        println!("{}\n", title);
        let report = check_scope(store, scope, only)?;
        if report.entries.is_empty() {
            println!("No {} keys found\n", scope);
            continue;
        }
        for entry in &report.entries {
            println!("{}", entry.render());
        }
        println!("\n{}\n", thresholds_legend());
        worst = worst.max(report.worst());
    }

    match worst {
        SizeStatus::Risk => println!("Summary: some projects/techs exceed safe limits"),
        SizeStatus::Warning => println!("Summary: some projects/techs are approaching limits"),
        SizeStatus::Ok => println!("Summary: all projects/techs are within safe limits"),
    }
    Ok(worst)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // MCP mode needs stderr for logging since stdout is the protocol channel
    let use_stderr = matches!(cli.command, Some(Commands::Mcp));
    init_tracing(use_stderr);

    let store = RuleStore::new(StoreConfig::new(cli.rules_dir));

    match cli.command {
        Some(Commands::Serve { port }) => serve(store, port).await?,
        Some(Commands::Mcp) => mcp::run_stdio_server(store).await?,
        Some(Commands::Scopes { scope }) => {
            let scope: RuleScope = scope.parse()?;
            for key in store.available_scope_keys(scope)? {
                println!("{}", key);
            }
        }
        Some(Commands::CheckSize { project, tech }) => {
            if check_size(&store, project, tech)? != SizeStatus::Ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => serve(store, 3000).await?,
    }

    Ok(ExitCode::SUCCESS)
}
