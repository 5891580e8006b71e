// System-wide configuration structures
// Following the same layout as the TOML file: [system], [chart], [client]

use serde::{Deserialize, Serialize};

use super::chart_config::ChartConfig;

/// Main global configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub system: SystemConfig,
    pub chart: ChartConfig,
    pub client: ClientConfig,
}

/// System configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub name: String,
    pub log_level: String,
    /// Empty string keeps logging on stderr
    pub log_file: String,
}

/// Opportunity / series endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub series_path: String,
    pub opportunities_path: String,
    pub timeout_secs: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "Spread Sight".to_string(),
            log_level: "info".to_string(),
            log_file: String::new(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            series_path: "/orderbooks".to_string(),
            opportunities_path: "/opportunities".to_string(),
            timeout_secs: 10,
        }
    }
}

impl GlobalConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.chart.validate()?;
        if self.client.timeout_secs == 0 {
            return Err("client.timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}
