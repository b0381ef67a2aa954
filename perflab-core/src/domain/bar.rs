//! Bar — one close observation of the evaluated price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single bar of the price series: the bar's end timestamp and its close.
///
/// The series is produced by the external signal engine and is read-only
/// here. Bars are expected in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub end_time: DateTime<Utc>,
    pub close: f64,
}

impl Bar {
    pub fn new(end_time: DateTime<Utc>, close: f64) -> Self {
        Self { end_time, close }
    }

    /// A usable bar has a finite, positive close.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
