// Error kinds surfaced by the rendering pipeline and the calendar matcher
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    /// Network or HTTP failure while talking to the location backend.
    #[error("fetch failed: {0:#}")]
    Fetch(#[source] anyhow::Error),

    /// Zero records for the requested range.
    #[error("no position records for the requested range")]
    EmptyInput,

    /// The calendar widget has not rendered its day cells yet.
    #[error("calendar widget not ready: {0}")]
    WidgetNotReady(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_error_display() {
        let err = ViewerError::EmptyInput;
        assert_eq!(err.to_string(), "no position records for the requested range");

        let err = ViewerError::WidgetNotReady("no month tables".to_string());
        assert_eq!(err.to_string(), "calendar widget not ready: no month tables");

        let err = ViewerError::Fetch(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "fetch failed: connection refused");
    }
}
