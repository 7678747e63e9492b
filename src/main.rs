use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use phone_cluster::api::ApiServer;
use phone_cluster::config::{self, ClientConfig, ServerConfig};
use phone_cluster::{db, lifecycle, Agent};

/// Phone Cluster - fleet registry server and agent
#[derive(Parser)]
#[command(name = "clusterd", version, about)]
struct Cli {
    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Database file path (defaults to the per-user data directory)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the agent: register with the cluster, then heartbeat
    Agent {
        /// Seconds between heartbeats
        #[arg(long, default_value = "30")]
        interval: u64,
    },
    /// Install a cluster role as a system service
    Install {
        #[arg(value_enum)]
        role: lifecycle::Role,
    },
    /// Uninstall a cluster role's system service
    Uninstall {
        #[arg(value_enum)]
        role: lifecycle::Role,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,phone_cluster=info",
        1 => "info,phone_cluster=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Agent { interval } => run_agent(interval).await,
            Command::Install { role } => Ok(lifecycle::install(role)?),
            Command::Uninstall { role } => Ok(lifecycle::uninstall(role)?),
        };
    }

    run_server(cli).await
}

/// Run the registry server
async fn run_server(cli: Cli) -> anyhow::Result<()> {
    let mut config = ServerConfig::load()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let db_path = cli
        .db_path
        .unwrap_or_else(|| config::data_dir().join("server.db"));
    let pool = db::init(&db_path)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        db = %db_path.display(),
        "starting cluster registry"
    );

    ApiServer::new(pool, config.host, config.port).run().await?;

    Ok(())
}

/// Run the heartbeating agent
async fn run_agent(interval: u64) -> anyhow::Result<()> {
    let config = ClientConfig::load()?;
    tracing::info!(
        server = %config.server_url,
        name = %config.client_name,
        interval,
        "starting cluster agent"
    );

    let agent = Agent::new(config)?;
    agent.run(Duration::from_secs(interval)).await?;

    Ok(())
}
