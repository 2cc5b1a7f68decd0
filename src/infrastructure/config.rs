use crate::domain::track::ViewportPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderSettings {
    pub viewport_policy: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            viewport_policy: "first_device".to_string(),
        }
    }
}

impl RenderSettings {
    pub fn viewport_policy(&self) -> ViewportPolicy {
        match self.viewport_policy.as_str() {
            "first_device" => ViewportPolicy::FirstDevice,
            "all_devices" => ViewportPolicy::AllDevices,
            other => {
                tracing::warn!("Unknown viewport policy {}, using first_device", other);
                ViewportPolicy::FirstDevice
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarSettings {
    pub highlight_color: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            highlight_color: "#2e7d32".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info,tower_http=debug".to_string(),
        }
    }
}

/// Load `config/viewer` (any format the config crate knows) with `VIEWER__*` overrides
pub fn load_viewer_config() -> anyhow::Result<ViewerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/viewer"))
        .add_source(config::Environment::with_prefix("VIEWER").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
