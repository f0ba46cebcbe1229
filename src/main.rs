use clap::{Parser, Subcommand};
use slowlog_harvester::cli::run::RunOverrides;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slowlog-harvester")]
#[command(version, about = "Incremental database slow query log harvester", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Instance ids to harvest (comma separated)
    #[arg(long)]
    instance_ids: Option<String>,

    /// Positions file
    #[arg(long)]
    positions: Option<PathBuf>,

    /// Output slow log; `{instance}` is replaced with the instance id
    #[arg(long)]
    output: Option<String>,

    /// Log gateway base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the log gateway
    #[arg(long)]
    token: Option<String>,
}

impl From<RunArgs> for RunOverrides {
    fn from(args: RunArgs) -> Self {
        Self {
            instance_ids: args.instance_ids,
            positions: args.positions,
            output: args.output,
            endpoint: args.endpoint,
            token: args.token,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slowlog_harvester=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => {
                slowlog_harvester::cli::config::init(stdout)?;
            }
        },
        command => {
            let args = match command {
                Some(Commands::Run { args }) => args,
                _ => cli.run,
            };
            let config_path = slowlog_harvester::config::resolve_config_path(cli.config.as_deref());
            slowlog_harvester::cli::run::run(config_path, args.into()).await?;
        }
    }

    Ok(())
}
