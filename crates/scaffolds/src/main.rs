use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scaffold_web::{App, ConfigError, ServerConfig};
use scaffolds::{echo_function, echo_headers, static_files, swagger, telemetry};

#[derive(Parser)]
#[command(name = "scaffolds")]
#[command(about = "Starter HTTP services: header echo, swagger, static files, echo function", long_about = None)]
struct Cli {
    /// Listen address or hostname, overrides HOST
    #[arg(long, global = true)]
    host: Option<String>,

    /// Listen port, overrides AWS_LWA_PORT
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Log level, overrides LOG_LEVEL (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Respond to GET / with the request headers as JSON
    EchoHeaders,
    /// Header echo plus OpenAPI docs that honour x-forwarded-prefix
    Swagger {
        /// Root path used when no x-forwarded-prefix header is present
        #[arg(long)]
        root_path: Option<String>,
    },
    /// Serve a directory, logging every request's headers
    Static {
        /// Directory to serve
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Local invocation endpoint for the echo function
    Function,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::EchoHeaders => "echo-headers",
            Commands::Swagger { .. } => "swagger",
            Commands::Static { .. } => "static",
            Commands::Function => "function",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            Commands::EchoHeaders => echo_headers::DEFAULT_PORT,
            Commands::Swagger { .. } => swagger::DEFAULT_PORT,
            Commands::Static { .. } => static_files::DEFAULT_PORT,
            Commands::Function => echo_function::DEFAULT_PORT,
        }
    }

    fn app(self) -> App {
        match self {
            Commands::EchoHeaders => echo_headers::app(),
            Commands::Swagger { root_path } => swagger::app(root_path.as_deref()),
            Commands::Static { root } => {
                tracing::info!(root = %root.display(), "serving directory");
                static_files::app(root)
            }
            Commands::Function => echo_function::app(),
        }
    }
}

/// Environment first, then command-line flags on top.
fn resolve_config<F>(cli: &Cli, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServerConfig::from_lookup(cli.command.default_port(), lookup)?;
    if let Some(host) = &cli.host {
        config.listen_address = host.clone();
    }
    if let Some(port) = cli.port {
        config.listen_port = port;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    telemetry::init(&config.log_level);

    let name = cli.command.name();
    let app = cli.command.app();
    match scaffold_web::serve(app, &config, name) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
