use serde::Serialize;

/// Reference interval parsed from a `"low-high"` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
}

/// Where a value falls relative to a [`NormalRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePosition {
    Below,
    Within,
    Above,
}

impl NormalRange {
    /// Parse `"4.0-11.0"` (whitespace tolerated). Anything else, including an
    /// inverted interval, yields `None` rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        let (low, high) = s.trim().split_once('-')?;
        let low: f64 = low.trim().parse().ok()?;
        let high: f64 = high.trim().parse().ok()?;
        if !low.is_finite() || !high.is_finite() || low > high {
            return None;
        }
        Some(Self { low, high })
    }

    pub fn classify(&self, value: f64) -> RangePosition {
        if value < self.low {
            RangePosition::Below
        } else if value > self.high {
            RangePosition::Above
        } else {
            RangePosition::Within
        }
    }
}
