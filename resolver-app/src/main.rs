//! # Resolver Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and the rate provider
//! - Create the resolution service
//! - Seed an empty repository in the background
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::ConfiguredProvider;
use resolver_hex::{ResolutionService, inbound::HttpServer};
use resolver_repo::build_repo;

use config::{Config, LogFormat};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing; endpoint comes from OTEL_EXPORTER_OTLP_ENDPOINT
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("currency-resolver"), provider))
}

/// Installs the global subscriber. OpenTelemetry export is only enabled when
/// an OTLP endpoint is configured.
fn init_tracing(format: LogFormat) -> anyhow::Result<Option<sdktrace::SdkTracerProvider>> {
    let (telemetry, otel_provider) = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        let (tracer, provider) = init_tracer()?;
        (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        )
    } else {
        (None, None)
    };

    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,resolver_app=debug,resolver_hex=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(telemetry)
        .init();

    Ok(otel_provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    let otel_provider = init_tracing(config.log_format)?;

    tracing::info!("Starting resolver server on port {}", config.port);

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;
    tracing::info!(backend = repo.backend(), "Repository ready");

    let provider = ConfiguredProvider::build(config.provider_kind, config.provider.clone())?;
    tracing::info!(
        provider = ?config.provider_kind,
        base_url = %config.provider.base_url,
        "Rate provider ready"
    );

    // Create the resolution service
    let mut service = ResolutionService::new(repo, provider);
    if let Some(ttl) = config.rate_ttl {
        tracing::info!(ttl_secs = ttl.as_secs(), "Stored rates expire");
        service = service.with_rate_ttl(ttl);
    }

    let server = HttpServer::new(service).with_request_timeout(config.request_timeout);

    // Best-effort seed; the server starts without waiting for it
    if config.seed_on_startup {
        let state = server.state();
        tokio::spawn(async move {
            match state.service.seed().await {
                Ok(0) => tracing::debug!("Seed skipped, repository not empty"),
                Ok(inserted) => tracing::info!(inserted, "Seed finished"),
                Err(e) => tracing::warn!(error = %e, "Seed failed"),
            }
        });
    }

    let addr = format!("0.0.0.0:{}", config.port);
    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
