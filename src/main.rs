use clap::Parser;
use precompressed_responder::config::{Config, LogFormat};
use precompressed_responder::{Error, NegotiatingService, Responder, generate, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();
    init_tracing(config.log_format);

    let priority = config.encoding_priority()?;
    let assets = config.asset_paths();
    if priority.is_empty() {
        tracing::warn!("encoding priority list is empty, every response will be uncompressed");
    }

    let report = generate(&assets)?;
    if !report.is_complete() {
        tracing::warn!(
            failed = ?report.failed,
            "some encoded variants are unavailable and will answer 404"
        );
    }

    let addr = config.listen_addr();
    let listener = server::bind(addr).await?;
    tracing::info!(%addr, source = %assets.source().display(), "listening");

    let service = NegotiatingService::new(Responder::new(priority, assets));
    server::serve_with_shutdown(listener, service, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
