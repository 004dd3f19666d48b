//! Axis scales for the metric (y) axis.

use serde::{Deserialize, Serialize};

/// Linear region half-width of the symlog scale (d3 / Vega default).
const SYMLOG_CONSTANT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    Symlog,
}

impl AxisScale {
    pub fn from_symlog_flag(symlog: bool) -> Self {
        if symlog { Self::Symlog } else { Self::Linear }
    }

    pub fn is_symlog(&self) -> bool {
        matches!(self, Self::Symlog)
    }

    /// Data value -> plot coordinate.
    pub fn forward(&self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Symlog => value.signum() * (value.abs() / SYMLOG_CONSTANT).ln_1p(),
        }
    }

    /// Plot coordinate -> data value (used by axis labels and tooltips).
    pub fn inverse(&self, coord: f64) -> f64 {
        match self {
            Self::Linear => coord,
            Self::Symlog => coord.signum() * coord.abs().exp_m1() * SYMLOG_CONSTANT,
        }
    }
}

/// Compact number formatting for axis labels: 1.2K, 3.4M, 5.6B.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };

    if suffix.is_empty() {
        if abs >= 1.0 || abs == 0.0 {
            format!("{:.2}", scaled)
        } else {
            format!("{:.6}", scaled)
        }
    } else {
        format!("{:.2}{}", scaled, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symlog_is_odd_and_zero_at_origin() {
        let s = AxisScale::Symlog;
        assert_eq!(s.forward(0.0), 0.0);
        assert!((s.forward(-42.0) + s.forward(42.0)).abs() < 1e-12);
        assert!(s.forward(1000.0) > s.forward(10.0));
    }

    #[test]
    fn symlog_inverse_round_trips() {
        let s = AxisScale::Symlog;
        for v in [-1e6, -3.5, -0.01, 0.0, 0.2, 7.0, 65_000.0] {
            let back = s.inverse(s.forward(v));
            assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0), "{} -> {}", v, back);
        }
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(AxisScale::Linear.forward(12.5), 12.5);
        assert_eq!(AxisScale::Linear.inverse(-3.0), -3.0);
    }

    #[test]
    fn compact_format_uses_suffixes() {
        assert_eq!(format_compact(1_500.0), "1.50K");
        assert_eq!(format_compact(2_000_000.0), "2.00M");
        assert_eq!(format_compact(12.0), "12.00");
        assert_eq!(format_compact(0.000123), "0.000123");
    }
}
