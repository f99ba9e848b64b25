//!
//! Conversion between logical and physical pixels.
//!
//! Layout constants of a menu are given in logical pixels as they
//! would look on a 96 dpi display. The scale factor of a display
//! is its dpi relative to that.
//!

use crate::geometry::{DisplayContext, Rect};

/// Dpi the logical pixel sizes are designed for.
pub const DEFAULT_DPI: u32 = 96;

/// Scale factor for a display with the given dpi.
pub fn scale_from_dpi(dpi: u32) -> f64 {
    normalize_scale(f64::from(dpi) / f64::from(DEFAULT_DPI))
}

/// Logical to physical pixels.
pub fn scale_up(logical: i32, scale: f64) -> i32 {
    (f64::from(logical) * scale).round() as i32
}

/// Physical to logical pixels.
pub fn scale_down(physical: i32, scale: f64) -> i32 {
    (f64::from(physical) / scale).round() as i32
}

/// Replaces a zero, negative or non-finite scale with 1.0.
pub fn normalize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        log::warn!("invalid display scale {}, using 1.0", scale);
        1.0
    }
}

impl DisplayContext {
    /// Display snapshot from the dpi of the monitor.
    pub fn from_dpi(dpi: u32, work_area: Rect) -> Self {
        Self::new(scale_from_dpi(dpi), work_area)
    }

    /// Dpi equivalent of the scale.
    pub fn dpi(&self) -> u32 {
        (self.scale * f64::from(DEFAULT_DPI)).round() as u32
    }
}
