//! SDC demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                SDC DEMO SERVER               │
//!     Browser             │  ┌────────┐    ┌──────────────────────────┐  │
//!     ────────────────────┼─▶│  http  │───▶│ /, /static/*  → assets   │  │
//!                         │  │ server │    │ /api/form     → forms    │  │
//!                         │  └────────┘    │ /api/fhir/*   → proxy ───┼──┼──▶ FHIR server
//!                         │                └──────────────────────────┘  │
//!                         │   config (read once) · observability · lifecycle
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sdc_demo_server::config::load_config;
use sdc_demo_server::lifecycle;

#[derive(Parser)]
#[command(name = "sdc-demo-server")]
#[command(version, about = "Questionnaire demo server with a FHIR forwarding API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file and SDC_BIND_ADDRESS.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sdc-demo-server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    match lifecycle::start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server exited with error");
            eprintln!("sdc-demo-server: {}", e);
            ExitCode::FAILURE
        }
    }
}
