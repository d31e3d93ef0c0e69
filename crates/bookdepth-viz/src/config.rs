//! Application configuration.

use crate::error::{AppError, AppResult};
use bookdepth_core::{catalog, Venue};
use bookdepth_pipeline::{time_range_ms, FilterParams, Mode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loaded from TOML.
///
/// Every field has a default, so an empty file yields a working Binance
/// BTC realtime setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Venue id (e.g., "binance", "okx", "bybit", "deribit").
    #[serde(default = "default_venue")]
    pub venue: String,
    /// Coin selector resolved against the venue catalog (e.g., "BTC").
    #[serde(default = "default_coin")]
    pub coin: String,
    /// Explicit instrument symbol. Overrides the catalog lookup when set.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Aggregation mode. Historical opens no live connection.
    #[serde(default)]
    pub mode: Mode,
    /// Inclusive price bounds. Unset = unbounded.
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Inclusive quantity lower bound.
    #[serde(default)]
    pub qty_min: f64,
    /// Time range key ("live", "1m", "5m", "15m", "1h").
    #[serde(default = "default_time_range")]
    pub time_range: String,
    /// Search term: numeric = price highlight, text = venue filter.
    #[serde(default)]
    pub search: String,
    /// Quantization granularities.
    #[serde(default = "default_price_tick")]
    pub price_tick: f64,
    #[serde(default = "default_qty_tick")]
    pub qty_tick: f64,
    /// Rolling window capacity in frames.
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    /// Minimum interval between recomputations (ms).
    #[serde(default = "default_recompute_interval_ms")]
    pub recompute_interval_ms: u64,
}

fn default_venue() -> String {
    "binance".to_string()
}

fn default_coin() -> String {
    "BTC".to_string()
}

fn default_time_range() -> String {
    "live".to_string()
}

fn default_price_tick() -> f64 {
    1.0
}

fn default_qty_tick() -> f64 {
    0.1
}

fn default_max_frames() -> usize {
    600
}

fn default_recompute_interval_ms() -> u64 {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            venue: default_venue(),
            coin: default_coin(),
            symbol: None,
            mode: Mode::default(),
            price_min: None,
            price_max: None,
            qty_min: 0.0,
            time_range: default_time_range(),
            search: String::new(),
            price_tick: default_price_tick(),
            qty_tick: default_qty_tick(),
            max_frames: default_max_frames(),
            recompute_interval_ms: default_recompute_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Parsed venue.
    pub fn parsed_venue(&self) -> AppResult<Venue> {
        Ok(self.venue.parse()?)
    }

    /// Instrument symbol: explicit override, else the catalog default for
    /// the configured (venue, coin) pair.
    pub fn resolved_symbol(&self) -> AppResult<String> {
        if let Some(symbol) = &self.symbol {
            return Ok(symbol.clone());
        }
        let venue = self.parsed_venue()?;
        catalog::default_symbol(venue, &self.coin)
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Config(format!("No symbol for venue {venue} coin {}", self.coin))
            })
    }

    /// Filter parameters for the aggregation pipeline.
    ///
    /// The time cutoff applies in historical mode and whenever a non-live
    /// range key is selected; otherwise the whole buffer counts.
    pub fn filter_params(&self) -> FilterParams {
        let time_window_ms = if self.mode == Mode::Historical || self.time_range != "live" {
            time_range_ms(&self.time_range)
        } else {
            None
        };
        FilterParams {
            price_min: self.price_min.unwrap_or(f64::NEG_INFINITY),
            price_max: self.price_max.unwrap_or(f64::INFINITY),
            qty_min: self.qty_min,
            time_window_ms,
            price_tick: self.price_tick,
            qty_tick: self.qty_tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.venue, "binance");
        assert_eq!(config.coin, "BTC");
        assert_eq!(config.mode, Mode::Realtime);
        assert_eq!(config.max_frames, 600);
        assert_eq!(config.recompute_interval_ms, 250);
        assert_eq!(config.time_range, "live");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            venue = "deribit"
            coin = "ETH"
            mode = "pressure"
            price_min = 1000.0
            price_max = 5000.0
            qty_min = 0.5
            time_range = "5m"
            search = "101.5"
            price_tick = 0.5
            qty_tick = 0.01
            max_frames = 1200
            recompute_interval_ms = 100
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.venue, "deribit");
        assert_eq!(config.mode, Mode::Pressure);
        assert_eq!(config.resolved_symbol().unwrap(), "ETH-PERPETUAL");

        let params = config.filter_params();
        assert_eq!(params.price_min, 1000.0);
        assert_eq!(params.price_max, 5000.0);
        assert_eq!(params.time_window_ms, Some(300_000));
        assert_eq!(params.price_tick, 0.5);
    }

    #[test]
    fn test_explicit_symbol_overrides_catalog() {
        let config = AppConfig {
            symbol: Some("ETHBTC".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_symbol().unwrap(), "ETHBTC");
    }

    #[test]
    fn test_unknown_venue_rejected() {
        let config = AppConfig {
            venue: "kraken".to_string(),
            ..Default::default()
        };
        assert!(config.resolved_symbol().is_err());
    }

    #[test]
    fn test_live_range_has_no_cutoff() {
        let config = AppConfig::default();
        assert_eq!(config.filter_params().time_window_ms, None);
        assert!(config.filter_params().price_min.is_infinite());
    }

    #[test]
    fn test_historical_mode_uses_range_cutoff() {
        let config = AppConfig {
            mode: Mode::Historical,
            time_range: "1h".to_string(),
            ..Default::default()
        };
        assert_eq!(config.filter_params().time_window_ms, Some(3_600_000));
    }
}
