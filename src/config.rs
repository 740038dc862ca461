use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::data::model::{PayloadRange, ALL_SITES};

pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";
pub const DEFAULT_PORT: u16 = 8051;

pub const ENV_DATA_PATH: &str = "SPACEX_DASH_DATA";
pub const ENV_HOST: &str = "SPACEX_DASH_HOST";
pub const ENV_PORT: &str = "SPACEX_DASH_PORT";

// ---------------------------------------------------------------------------
// Selector configuration
// ---------------------------------------------------------------------------

/// One entry of the launch-site dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

impl SiteOption {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Limits of the payload range selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10000.0,
            step: 100.0,
        }
    }
}

impl SliderConfig {
    /// The slider's full extent, used when the dataset has no payload bounds.
    pub fn full_range(&self) -> PayloadRange {
        PayloadRange::new(self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// Process configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub data_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub site_options: Vec<SiteOption>,
    pub slider: SliderConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            site_options: vec![
                SiteOption::new("All Sites", ALL_SITES),
                SiteOption::new("CCAFS LC-40", "CCAFS LC-40"),
                SiteOption::new("VAFB SLC-4E", "VAFB SLC-4E"),
                SiteOption::new("KSC LC-39A", "KSC LC-39A"),
                SiteOption::new("CCAFS SLC-40", "CCAFS SLC-40"),
            ],
            slider: SliderConfig::default(),
        }
    }
}

impl DashConfig {
    /// Defaults, with optional overrides from the environment.
    ///
    /// Unparseable overrides are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        match lookup(ENV_HOST).map(|v| parse_var(ENV_HOST, v, "IP address")) {
            Some(Ok(host)) => config.host = host,
            Some(Err(e)) => log::warn!("{e}; using {}", config.host),
            None => {}
        }
        match lookup(ENV_PORT).map(|v| parse_var(ENV_PORT, v, "port")) {
            Some(Ok(port)) => config.port = port,
            Some(Err(e)) => log::warn!("{e}; using {}", config.port),
            None => {}
        }

        config
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Label shown for a site value, falling back to the value itself.
    pub fn site_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.site_options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .unwrap_or(value)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value,
            expected,
        })
}
