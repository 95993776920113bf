//! Nest HTTP server
//!
//! ```bash
//! TRANSFORMATION_USERNAME=alice TRANSFORMATION_PASSWORD=secret nest-server --port 8000
//! curl -u alice:secret -X PUT localhost:8000/transformation \
//!     -H 'content-type: application/json' \
//!     -d '{"nesting_levels": ["currency"], "flat_dicts": [{"currency": "EUR", "amount": 1}]}'
//! ```
//!
//! Variables may also come from a `.env` file in the working directory.

use clap::Parser;
use nest::config::{DEFAULT_HOST, DEFAULT_PORT};
use nest::{logs, Credentials, ServerConfig, ServerError};

#[derive(Parser)]
#[command(name = "nest-server")]
#[command(about = "Serve the nest transformation over HTTP with Basic authentication", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Log debug information
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init_server_logger(cli.verbose, cli.log_json);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "nest server failed");
        eprintln!("nest-server: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let credentials = Credentials::from_env()?;
    let config = ServerConfig::new(&cli.host, cli.port, credentials)?;
    nest::server::start_server(config).await
}
