use crate::cli::ServeArgs;
use crate::infra::{AppState, ScraperRegistry};
use crate::routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use workforce_analytics::config::AppConfig;
use workforce_analytics::error::AppError;
use workforce_analytics::scrapers::HttpPageFetcher;
use workforce_analytics::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // The blocking client owns an internal runtime; build it off the async workers.
    let scraper_config = config.scraper.clone();
    let fetcher = tokio::task::spawn_blocking(move || HttpPageFetcher::new(&scraper_config))
        .await
        .map_err(|err| AppError::Server(axum::Error::new(err)))??;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        fetcher: Arc::new(fetcher),
        scrapers: ScraperRegistry::default(),
    };

    let app = routes::router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        render_proxy = config.scraper.render_proxy.is_some(),
        "workforce analytics service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
