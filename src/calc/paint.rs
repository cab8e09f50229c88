//! # Paint Calculation
//!
//! Wall area of a rectangular room minus doors and windows, times the number
//! of coats, divided by the paint's coverage.
//!
//! ## Example
//!
//! ```rust
//! use remont_blog::calc::paint::{compute_paint_liters, PaintInput};
//!
//! let input = PaintInput {
//!     length: 4.0,
//!     width: 4.0,
//!     height: 2.7,
//!     doors: 2,
//!     windows: 1,
//!     layers: 2,
//!     coverage: 10.0,
//! };
//! let liters = compute_paint_liters(&input);
//! assert!((liters - 7.54).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::positive;

/// Area taken by one door, m²
pub const DOOR_AREA_M2: f64 = 2.0;
/// Area taken by one window, m²
pub const WINDOW_AREA_M2: f64 = 1.5;

/// ## JSON Example
///
/// ```json
/// { "length": 4.0, "width": 4.0, "height": 2.7, "doors": 2, "windows": 1, "layers": 2, "coverage": 10.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaintInput {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub doors: u32,
    #[serde(default)]
    pub windows: u32,
    #[serde(default = "PaintInput::default_layers")]
    pub layers: u32,
    /// m² covered by one liter in one coat
    pub coverage: f64,
}

impl PaintInput {
    fn default_layers() -> u32 {
        2
    }

    /// Perimeter times height.
    pub fn wall_area(&self) -> f64 {
        2.0 * (self.length + self.width) * self.height
    }

    pub fn openings_area(&self) -> f64 {
        f64::from(self.doors) * DOOR_AREA_M2 + f64::from(self.windows) * WINDOW_AREA_M2
    }

    /// Wall area left to paint, never negative.
    pub fn paintable_area(&self) -> f64 {
        (self.wall_area() - self.openings_area()).max(0.0)
    }
}

/// Liters of paint, unrounded. `0.0` when a room dimension or the coverage
/// is not positive.
pub fn compute_paint_liters(input: &PaintInput) -> f64 {
    if !(positive(input.length) && positive(input.width) && positive(input.height) && positive(input.coverage)) {
        return 0.0;
    }

    input.paintable_area() * f64::from(input.layers) / input.coverage
}
