//! ledgerq entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments** with `clap` (see [`cli::Cli`]).
//! 2. **Wire observability**: a `tracing-subscriber` registry with an
//!    `EnvFilter` (`RUST_LOG`, default `warn`), a compact or JSON output layer
//!    on stderr, and an OpenTelemetry OTLP span exporter when
//!    `OTEL_EXPORTER_OTLP_ENDPOINT` is set. Every `tracing` span emitted by the
//!    workspace crates flows through these layers.
//! 3. **Run the command** and flush exported spans before exiting.
//!
//! # Usage
//!
//! ```bash
//! ledgerq encode receipt 0.0.1001@1700000000.000000042
//! ledgerq decode CnIKAhgA...
//! ledgerq check-config ledgerq.toml
//! ```

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cli::Cli;

const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Installs the global subscriber.
///
/// Returns the tracer provider when OTLP export is enabled so the caller can
/// flush it on exit.
fn init_tracing(json: bool) -> Result<Option<TracerProvider>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let provider = match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) if !endpoint.is_empty() => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .context("failed to build OTLP span exporter")?;
            Some(
                TracerProvider::builder()
                    .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
                    .build(),
            )
        }
        _ => None,
    };
    let otel = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer("ledgerq")));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
        }))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let provider = init_tracing(cli.global.log_json)?;

    let result = cli.run();

    if let Some(provider) = provider {
        if let Err(error) = provider.shutdown() {
            eprintln!("failed to flush trace exporter: {error}");
        }
    }
    result
}
