use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub services: ServiceSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            services: ServiceSettings::default(),
            geocoder: GeocoderSettings::default(),
            map: MapSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// External service endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_routing_url")]
    pub routing_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            routing_url: default_routing_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}
fn default_routing_url() -> String {
    "https://router.project-osrm.org".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    /// Quiet window before a typed query is dispatched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    800
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_property_zoom")]
    pub property_zoom: u8,
    #[serde(default)]
    pub recenter_on_pin_update: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            property_zoom: default_property_zoom(),
            recenter_on_pin_update: false,
        }
    }
}

fn default_property_zoom() -> u8 {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with BASERA_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with BASERA_)
            // e.g., BASERA_GEOCODER__DEBOUNCE_MS -> geocoder.debounce_ms
            .add_source(
                Environment::with_prefix("BASERA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("BASERA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
