use clap::{Parser, Subcommand};

use ridebook_mcp_server::rpc::McpServer;
use ridebook_mcp_server::{config::ServerConfig, sse, stdio};

#[derive(Parser)]
#[command(name = "ridebook-mcp", version, about = "MCP bridge for the ride-booking guest trips API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve one session over stdin/stdout (default)
    Stdio,
    /// Serve concurrent sessions over HTTP Server-Sent Events
    Sse {
        /// Listening port (overrides the PORT environment variable)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Stdio);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let config = ServerConfig::default();

    match command {
        Command::Stdio => {
            // stdout carries JSON-RPC frames; keep logs on stderr.
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter)
                .init();
            stdio::run(McpServer::from_config(&config)).await
        }
        Command::Sse { port } => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            sse::serve(config).await
        }
    }
}
