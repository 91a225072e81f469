use clap::Parser;
use log::info;
use server::handler::{serve, ServerConfig};
use std::time::Duration;
use tokio::net::TcpListener;

/// Main-method of the application.
/// Parses command-line arguments, binds the listener, and runs the accept
/// loop until the process is killed.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "12345")]
        port: u16,
        /// Seconds a blocking read may wait before its session is dropped
        #[clap(short, long, default_value = "60")]
        timeout: u64,
    }

    env_logger::init();
    let args = Args::parse();

    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;
    info!("listening on {}, waiting for pairs", address);

    let config = ServerConfig {
        read_timeout: Duration::from_secs(args.timeout),
        ..ServerConfig::default()
    };
    serve(listener, config).await?;

    Ok(())
}
