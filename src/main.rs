// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::calendar_service::CalendarService;
use crate::application::map_controller::MapController;
use crate::application::track_renderer::TrackRenderer;
use crate::application::viewer_service::ViewerService;
use crate::domain::overlay::MarkerStyle;
use crate::domain::selection::DateSelection;
use crate::infrastructure::config::load_viewer_config;
use crate::infrastructure::location_api::LocationApiRepository;
use crate::infrastructure::view_state::{ChartStore, LayerStore};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_calendar, get_tracks, get_view, health_check, list_available, next_day, previous_day,
    refresh_available, select_view,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_viewer_config()?;

    // Initialize tracing, RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .init();

    // Create repository (infrastructure layer)
    let repository = Arc::new(LocationApiRepository::new(
        config.upstream.base_url.clone(),
        config.upstream.token.clone(),
        config.upstream.timeout_secs,
    )?);

    // Create services (application layer)
    let renderer = TrackRenderer::new(config.render.viewport_policy());
    let today = DateSelection::day(Utc::now().date_naive());
    let controller = MapController::new(LayerStore::new(), ChartStore::new(), renderer, today);
    let viewer_service = ViewerService::new(repository.clone(), renderer, controller);
    let calendar_service = CalendarService::new(repository.clone());

    // Available dates are loaded once at startup; a failure leaves the list empty until refreshed
    if let Err(e) = calendar_service.refresh().await {
        tracing::error!("Could not load available dates: {:#}", e);
    }
    let initial = viewer_service.select(today).await;
    tracing::info!("Initial view for {:?}: {:?}", today, initial);

    // Create application state
    let state = Arc::new(AppState {
        viewer_service,
        calendar_service,
        marker_style: MarkerStyle::default(),
        highlight_color: config.calendar.highlight_color.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/tracks", get(get_tracks))
        .route("/api/view", get(get_view))
        .route("/api/view/select", post(select_view))
        .route("/api/view/previous", post(previous_day))
        .route("/api/view/next", post(next_day))
        .route("/api/available", get(list_available))
        .route("/api/available/refresh", post(refresh_available))
        .route("/api/calendar", get(get_calendar))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!("Starting track-viewer on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
