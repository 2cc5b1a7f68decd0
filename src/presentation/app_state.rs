// Application state for HTTP handlers
use crate::application::calendar_service::CalendarService;
use crate::application::viewer_service::ViewerService;
use crate::domain::overlay::MarkerStyle;
use crate::infrastructure::view_state::{ChartStore, LayerStore};

pub type LiveViewer = ViewerService<LayerStore, ChartStore>;

#[derive(Clone)]
pub struct AppState {
    pub viewer_service: LiveViewer,
    pub calendar_service: CalendarService,
    pub marker_style: MarkerStyle,
    pub highlight_color: String,
}
