//! # Renovation calculators
//!
//! Pure functions turning room and material dimensions into quantities to
//! buy. Every input and result is JSON-serializable so the same types back
//! the `/api/calc/*` endpoints and the on-page widgets.
//!
//! Inputs outside the physical domain (non-positive dimensions, NaN) never
//! produce an error: paint yields `0.0`, tile and wallpaper yield `None`.
//! Linear dimensions are metres unless a field name says otherwise.
//!
//! - [`paint`] - liters of paint for a room
//! - [`tile`] - tiles and packs for a floor or wall
//! - [`wallpaper`] - rolls for a room or a single wall
//! - [`budget`] - renovation budget with a contingency reserve

pub mod budget;
pub mod paint;
pub mod tile;
pub mod wallpaper;

pub use budget::{compute_budget, BudgetInput, BudgetResult};
pub use paint::{compute_paint_liters, PaintInput};
pub use tile::{compute_tile, SurfaceType, TileInput, TileResult};
pub use wallpaper::{compute_wallpaper, CalculationType, Opening, WallpaperInput, WallpaperResult};

/// `true` for finite values above zero. NaN and infinities are rejected.
pub(crate) fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Non-negative finite value, anything else counts as zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Rounds a quantity of physical units up to a whole count. `None` for NaN,
/// infinity, or counts that do not fit a `u64`.
pub(crate) fn whole_units(quantity: f64) -> Option<u64> {
    if !quantity.is_finite() {
        return None;
    }
    if quantity <= 0.0 {
        return Some(0);
    }
    // subtract a hair so 7.000000000001 from float noise is still 7
    let rounded = (quantity - 1e-9).ceil();
    if rounded >= u64::MAX as f64 {
        None
    } else {
        Some(rounded as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units() {
        assert_eq!(whole_units(0.0), Some(0));
        assert_eq!(whole_units(-3.0), Some(0));
        assert_eq!(whole_units(f64::NAN), None);
        assert_eq!(whole_units(f64::INFINITY), None);
        assert_eq!(whole_units(1e30), None);
        assert_eq!(whole_units(0.2), Some(1));
        assert_eq!(whole_units(7.0), Some(7));
        assert_eq!(whole_units(7.000_000_000_01), Some(7));
        assert_eq!(whole_units(7.01), Some(8));
    }

    #[test]
    fn test_positive() {
        assert!(positive(0.1));
        assert!(!positive(0.0));
        assert!(!positive(-1.0));
        assert!(!positive(f64::NAN));
        assert!(!positive(f64::INFINITY));
        assert_eq!(non_negative(-2.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(2.5), 2.5);
    }
}
