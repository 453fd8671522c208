//! jrpc-server CLI
//!
//! Entry point for the `jrpc-server` command-line tool.

use clap::{Parser, Subcommand};
use jrpc_server::{default_registry, logging, CliOverrides, HttpServer, RpcHandler, ServerConfig};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "jrpc-server")]
#[command(about = "Minimal JSON-RPC over HTTP server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-RPC over HTTP
    Serve {
        /// Path to config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Listen address, e.g. 127.0.0.1:8080
        #[arg(long, short = 'l')]
        listen: Option<String>,

        /// Largest accepted request body in bytes
        #[arg(long)]
        max_body_bytes: Option<u64>,
    },

    /// Answer a single request read from stdin
    Stdio {
        /// Path to config file (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List registered methods
    Methods {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            listen,
            max_body_bytes,
        } => {
            let overrides = CliOverrides {
                listen,
                max_body_bytes,
            };
            run_serve(config, &overrides);
        }
        Commands::Stdio { config } => {
            run_stdio(config);
        }
        Commands::Methods { json } => {
            run_methods(json);
        }
    }
}

fn load_config(config_path: Option<PathBuf>, overrides: &CliOverrides) -> ServerConfig {
    match ServerConfig::load(config_path.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn build_handler(config: &ServerConfig) -> RpcHandler {
    match default_registry() {
        Ok(registry) => RpcHandler::new(registry, config.dispatch.clone()),
        Err(e) => {
            eprintln!("Error registering methods: {}", e);
            process::exit(1);
        }
    }
}

fn run_serve(config_path: Option<PathBuf>, overrides: &CliOverrides) {
    let config = load_config(config_path, overrides);
    logging::init(&config.log.filter);

    let addr = match config.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    let handler = Arc::new(build_handler(&config));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(HttpServer::new(handler, addr).run()) {
        eprintln!("Error running server: {}", e);
        process::exit(1);
    }
}

fn run_stdio(config_path: Option<PathBuf>) {
    let config = load_config(config_path, &CliOverrides::default());
    logging::init(&config.log.filter);

    let handler = build_handler(&config);
    if let Err(e) = handler.run() {
        eprintln!("RPC handler error: {}", e);
        process::exit(1);
    }
}

fn run_methods(json_output: bool) {
    let handler = build_handler(&ServerConfig::default());
    let names = handler.registry().method_names();

    if json_output {
        match serde_json::to_string_pretty(&names) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        for name in names {
            println!("{}", name);
        }
    }
}
