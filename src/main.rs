use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;

use tumor_classifier::config::ServerConfig;
use tumor_classifier::{
    logging, server, InferenceService, ModelProvider, Normalization, Preprocessor,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    logging::setup_logging(config.environment);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment.as_str(),
        "Starting tumor classifier"
    );

    if config.normalization != Normalization::Unit {
        tracing::warn!(
            normalization = ?config.normalization,
            "Non-default pixel normalization; must match the weights' training preprocessing"
        );
    }

    let provider = ModelProvider::load(&config.model_path, &config.labels_path)
        .context("model artifacts could not be loaded")?;

    let service = web::Data::new(InferenceService::new(
        provider,
        Preprocessor::new(config.resize_filter, config.normalization),
        config.max_upload_bytes,
    ));
    let origins = config.origins();

    let mut http = HttpServer::new(move || {
        App::new()
            .wrap(server::cors(&origins))
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .configure(server::configure)
    });
    if let Some(workers) = config.workers {
        http = http.workers(workers);
    }

    tracing::info!("Server running at http://{}:{}", config.host, config.port);

    http.bind((config.host.as_str(), config.port))?.run().await?;

    Ok(())
}
