use crate::cli::ServeArgs;
use crate::infra::{default_analyzer, load_catalogue, AppState, InMemoryChallengeRepository};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use couplefit::config::AppConfig;
use couplefit::error::AppError;
use couplefit::telemetry;
use couplefit::workflows::challenge::CoupleChallengeService;
use couplefit::workflows::dining::RestaurantFinder;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let challenge_service = Arc::new(CoupleChallengeService::new(
        Arc::new(InMemoryChallengeRepository::default()),
        Arc::new(default_analyzer()),
        config.challenges,
    ));
    let catalogue = load_catalogue(&config.dining)?;
    let finder = Arc::new(RestaurantFinder::new(Arc::new(catalogue), &config.dining));

    let app = with_routes(challenge_service, finder)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        input_policy = ?config.challenges.input_policy,
        %addr,
        "couplefit api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
