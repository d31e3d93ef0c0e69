//! Filter parameters and display modes.

use serde::{Deserialize, Serialize};

/// Named time windows selectable upstream; "live" means no cutoff.
pub const TIME_RANGES: [(&str, i64); 4] = [
    ("1m", 60 * 1000),
    ("5m", 5 * 60 * 1000),
    ("15m", 15 * 60 * 1000),
    ("1h", 60 * 60 * 1000),
];

/// Window length in milliseconds for a time-range key.
///
/// `None` for "live" or an unrecognized key, both meaning no cutoff.
pub fn time_range_ms(key: &str) -> Option<i64> {
    TIME_RANGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, ms)| *ms)
}

/// Aggregation mode, mutually exclusive per recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Surface over the live window.
    #[default]
    Realtime,
    /// Surface over a closed time window, no live connection.
    Historical,
    /// Scatter point cloud of every bid occurrence.
    Pressure,
}

/// Filter and quantization parameters, as selected upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Inclusive price bounds; unbounded by default.
    pub price_min: f64,
    pub price_max: f64,
    /// Inclusive quantity lower bound.
    pub qty_min: f64,
    /// Retain frames with `ts >= now - window`; `None` = no cutoff.
    pub time_window_ms: Option<i64>,
    /// Quantization granularities; <= 0 disables bucketing on that axis.
    pub price_tick: f64,
    pub qty_tick: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            price_min: f64::NEG_INFINITY,
            price_max: f64::INFINITY,
            qty_min: 0.0,
            time_window_ms: None,
            price_tick: 1.0,
            qty_tick: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_keys() {
        assert_eq!(time_range_ms("1m"), Some(60_000));
        assert_eq!(time_range_ms("1h"), Some(3_600_000));
        assert_eq!(time_range_ms("live"), None);
        assert_eq!(time_range_ms("2d"), None);
    }

    #[test]
    fn test_default_params_unbounded() {
        let params = FilterParams::default();
        assert!(params.price_min.is_infinite());
        assert!(params.price_max.is_infinite());
        assert_eq!(params.qty_min, 0.0);
        assert!(params.time_window_ms.is_none());
    }
}
