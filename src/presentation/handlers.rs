// HTTP request handlers
use crate::application::map_controller::UpdateOutcome;
use crate::application::viewer_service::Step;
use crate::domain::error::ViewerError;
use crate::domain::selection::DateSelection;
use crate::infrastructure::calendar_grid::CalendarGrid;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::view_mapper::{
    calendar_to_dto, chart_to_dto, view_to_dto, viewport_to_dto, ViewDto,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Months shown side by side by the date-range picker
const PICKER_MONTHS: u32 = 2;

#[derive(Deserialize)]
pub struct SelectionQuery {
    pub date: Option<String>,
    pub duration: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SelectionQuery {
    fn selection(&self) -> Result<DateSelection, ViewerError> {
        DateSelection::from_params(
            self.date.as_deref(),
            self.duration.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )
    }
}

#[derive(Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`, first of the displayed months
    pub month: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ViewUpdateBody {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    view: ViewDto,
}

#[derive(Serialize)]
struct RefreshBody {
    count: usize,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn respond_error(status: StatusCode, err: impl ToString, headers: &HeaderMap) -> Response {
    let body = ErrorBody {
        error: err.to_string(),
    };
    respond(status, &body, headers).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Fetch and render one selection without touching the shared view
pub async fn get_tracks(
    Query(query): Query<SelectionQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = match query.selection() {
        Ok(selection) => selection,
        Err(e) => return respond_error(StatusCode::BAD_REQUEST, e, &headers).await,
    };

    match state.viewer_service.render(&selection).await {
        Ok(view) => {
            let dto = view_to_dto(Some(&view), Some(&selection), &state.marker_style);
            respond(StatusCode::OK, &dto, &headers).await
        }
        Err(ViewerError::EmptyInput) => {
            let dto = view_to_dto(None, Some(&selection), &state.marker_style);
            respond(StatusCode::OK, &dto, &headers).await
        }
        Err(e) => {
            tracing::error!("Error rendering tracks for {:?}: {}", selection, e);
            respond_error(StatusCode::BAD_GATEWAY, e, &headers).await
        }
    }
}

/// Snapshot of the shared view
pub async fn get_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dto = current_view(&state).await;
    respond(StatusCode::OK, &dto, &headers).await
}

/// Switch the shared view to a new selection
pub async fn select_view(
    Query(query): Query<SelectionQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = match query.selection() {
        Ok(selection) => selection,
        Err(e) => return respond_error(StatusCode::BAD_REQUEST, e, &headers).await,
    };

    let outcome = state.viewer_service.select(selection).await;
    view_update(&state, outcome, &headers).await
}

pub async fn previous_day(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    step_view(&state, Step::Previous, &headers).await
}

pub async fn next_day(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    step_view(&state, Step::Next, &headers).await
}

async fn step_view(state: &AppState, step: Step, headers: &HeaderMap) -> Response {
    match state.viewer_service.step(step).await {
        Ok(outcome) => view_update(state, outcome, headers).await,
        Err(e) => respond_error(StatusCode::BAD_REQUEST, e, headers).await,
    }
}

async fn current_view(state: &AppState) -> ViewDto {
    let style = state.marker_style;
    state
        .viewer_service
        .inspect(|controller| {
            let mut dto = view_to_dto(
                controller.current_view(),
                Some(&controller.selection()),
                &style,
            );
            // what the map and chart actually hold, not just the last render
            dto.attached_overlays = Some(controller.map().overlays().len());
            dto.viewport = controller.map().viewport().as_ref().map(viewport_to_dto);
            dto.chart = controller.chart().dataset().map(chart_to_dto);
            dto
        })
        .await
}

async fn view_update(state: &AppState, outcome: UpdateOutcome, headers: &HeaderMap) -> Response {
    let (status, label, detail) = match outcome {
        UpdateOutcome::Installed { devices, points } => (
            StatusCode::OK,
            "installed",
            Some(format!("{} point(s) from {} device(s)", points, devices)),
        ),
        UpdateOutcome::Empty => (StatusCode::OK, "empty", None),
        UpdateOutcome::Stale { sequence, latest } => (
            StatusCode::OK,
            "stale",
            Some(format!("request #{} superseded by #{}", sequence, latest)),
        ),
        UpdateOutcome::FetchFailed(reason) => (StatusCode::BAD_GATEWAY, "fetch_failed", Some(reason)),
    };

    let body = ViewUpdateBody {
        outcome: label,
        detail,
        view: current_view(state).await,
    };
    respond(status, &body, headers).await
}

/// List the days for which positions exist
pub async fn list_available(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dates: Vec<String> = state
        .calendar_service
        .available_dates()
        .await
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    respond(StatusCode::OK, &dates, &headers).await
}

/// Refetch the available days from the backend
pub async fn refresh_available(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.calendar_service.refresh().await {
        Ok(count) => respond(StatusCode::OK, &RefreshBody { count }, &headers).await,
        Err(e) => {
            tracing::error!("Error refreshing available dates: {:#}", e);
            respond_error(StatusCode::BAD_GATEWAY, format!("{:#}", e), &headers).await
        }
    }
}

/// Redraw the date-range picker and mark the days that have data
pub async fn get_calendar(
    Query(query): Query<MonthQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let first_month = match query.month.as_deref() {
        Some(month) => match NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d") {
            Ok(day) => day,
            Err(_) => {
                return respond_error(
                    StatusCode::BAD_REQUEST,
                    format!("cannot parse month {}", month),
                    &headers,
                )
                .await;
            }
        },
        None => Utc::now().date_naive(),
    };

    let mut grid = CalendarGrid::new(first_month, PICKER_MONTHS, state.highlight_color.clone());
    grid.render();
    let marked = state.calendar_service.redraw(&mut grid).await;
    tracing::debug!("Marked {} available day(s) from {}", marked, grid.first_month());

    respond(StatusCode::OK, &calendar_to_dto(&grid), &headers).await
}
