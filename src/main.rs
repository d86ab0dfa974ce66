use anyhow::Result;
use clap::{Parser, Subcommand};
use userhub_user::publisher::OutboxPublisher;

/// userhub - user registry service
#[derive(Parser)]
#[command(name = "userhub")]
#[command(about = "User registry with CREATE/DELETE domain events", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Print the most recent outbox messages as JSON lines
    Outbox {
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = userhub::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    userhub::observability::init_observability("userhub", &config.observability)?;

    match cli.command {
        Commands::Serve { host, port } => userhub::server::serve(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Outbox { limit } => outbox_command(config, limit).await,
    }
}

async fn migrate_command(config: userhub::Config) -> Result<()> {
    let pool =
        userhub::db::prepare(&config.database.url, config.database.max_connections).await?;
    pool.close().await;

    Ok(())
}

async fn reset_command(config: userhub::Config) -> Result<()> {
    userhub::db::reset_database(&config.database.url).await?;
    migrate_command(config).await
}

async fn outbox_command(config: userhub::Config, limit: u64) -> Result<()> {
    let pool = userhub::db::prepare(&config.database.url, 1).await?;
    let messages = OutboxPublisher::new(pool.clone()).recent(limit).await?;

    for message in messages {
        println!("{}", serde_json::to_string(&message)?);
    }

    pool.close().await;

    Ok(())
}
