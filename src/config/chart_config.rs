// Chart layout and rendering configuration
// Passed explicitly into the composer, never held as process-wide state

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::chart::GapPolicy;

/// Upper bound for `x_tick_minutes`; ticks are aligned to midnight
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Margins around the plotting area (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Outer chart size plus margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 140.0,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    /// Width of the plotting area
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the plotting area
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(format!(
                "margins leave no plotting area ({}x{})",
                self.inner_width(),
                self.inner_height()
            ));
        }
        Ok(())
    }
}

/// Line colors per order book side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub bid_color: String,
    pub ask_color: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            bid_color: "steelblue".to_string(),
            ask_color: "#FC9E27".to_string(),
        }
    }
}

/// Everything the chart composer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub layout: ChartLayout,
    pub gap_policy: GapPolicy,
    pub colors: ColorScheme,
    pub x_tick_minutes: u32,
    pub x_tick_format: String,
    pub y_tick_count: usize,
    pub y_label: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            gap_policy: GapPolicy::ZeroDip,
            colors: ColorScheme::default(),
            x_tick_minutes: 5,
            x_tick_format: "%H:%M".to_string(),
            y_tick_count: 4,
            y_label: None,
        }
    }
}

impl ChartConfig {
    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        if self.x_tick_minutes == 0 || self.x_tick_minutes > MINUTES_PER_DAY {
            return Err(format!("x_tick_minutes must be in 1..={}", MINUTES_PER_DAY));
        }
        if StrftimeItems::new(&self.x_tick_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("x_tick_format '{}' is not a valid strftime format", self.x_tick_format));
        }
        if self.y_tick_count == 0 {
            return Err("y_tick_count must be positive".to_string());
        }
        Ok(())
    }
}
