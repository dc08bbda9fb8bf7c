mod cmd_log;
mod cmd_replay;
mod offline;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pix")]
#[command(about = "Replay, inspect, and visualize image edit histories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an edit script against an image and print the resulting history
    Replay {
        #[command(flatten)]
        session: cmd_replay::SessionArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = cmd_replay::Format::Json)]
        format: cmd_replay::Format,

        /// Include commit timestamps in DOT output
        #[arg(long)]
        timestamps: bool,

        /// Include commit instructions in DOT output
        #[arg(long)]
        prompts: bool,
    },
    /// Run an edit script and print the history as an indented outline
    Log {
        #[command(flatten)]
        session: cmd_replay::SessionArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the history; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelpath=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            session,
            format,
            timestamps,
            prompts,
        } => {
            let options = pixelpath_dot::RenderOptions {
                show_timestamps: timestamps,
                show_prompts: prompts,
                ..Default::default()
            };
            cmd_replay::run(session, format, &options, cli.pretty).await
        }
        Commands::Log { session } => cmd_log::run(session).await,
    }
}
