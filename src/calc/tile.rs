//! # Tile Calculation
//!
//! Number of tiles and packs for a floor, a wall run, or bathroom walls.
//!
//! For walls `length` is the total run of tiled wall and `width` is the tiled
//! height. Window and door areas are subtracted; bathroom walls additionally
//! include the bath screen (`bath_area`).
//!
//! Each tile occupies its own size plus one grout joint in both directions.
//! The raw tile count is increased by the combined waste percentage, then
//! rounded up to whole tiles and whole packs.
//!
//! ## Example
//!
//! ```rust
//! use remont_blog::calc::tile::{compute_tile, SurfaceType, TileInput};
//!
//! let input = TileInput {
//!     surface_type: SurfaceType::Floor,
//!     length: 3.0,
//!     width: 2.5,
//!     tile_length_cm: 30.0,
//!     tile_width_cm: 30.0,
//!     tiles_per_pack: 11,
//!     base_waste_percent: 10.0,
//!     ..TileInput::default()
//! };
//! let result = compute_tile(&input).unwrap();
//! assert_eq!(result.tiles_needed, 92);
//! assert_eq!(result.packs_needed, 9);
//! ```

use serde::{Deserialize, Serialize};

use super::{non_negative, positive, whole_units};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    #[default]
    Floor,
    Wall,
    BathroomWall,
}

/// ## JSON Example
///
/// ```json
/// {
///   "surface_type": "bathroom_wall",
///   "length": 7.0,
///   "width": 2.4,
///   "bath_area": 0.9,
///   "tile_length_cm": 20.0,
///   "tile_width_cm": 30.0,
///   "grout_width_mm": 2.0,
///   "tiles_per_pack": 16,
///   "doors": 1,
///   "door_area": 1.6,
///   "base_waste_percent": 10.0,
///   "additional_waste_percent": 5.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TileInput {
    pub surface_type: SurfaceType,
    pub length: f64,
    pub width: f64,
    /// Bath screen area in m², bathroom walls only
    pub bath_area: f64,
    pub tile_length_cm: f64,
    pub tile_width_cm: f64,
    pub grout_width_mm: f64,
    pub tiles_per_pack: u32,
    pub windows: u32,
    pub doors: u32,
    /// Area of one window, m²
    pub window_area: f64,
    /// Area of one door, m²
    pub door_area: f64,
    pub base_waste_percent: f64,
    /// Extra allowance for diagonal laying, complex cuts, etc.
    pub additional_waste_percent: f64,
}

impl Default for TileInput {
    fn default() -> Self {
        TileInput {
            surface_type: SurfaceType::Floor,
            length: 0.0,
            width: 0.0,
            bath_area: 0.0,
            tile_length_cm: 0.0,
            tile_width_cm: 0.0,
            grout_width_mm: 0.0,
            tiles_per_pack: 1,
            windows: 0,
            doors: 0,
            window_area: 0.0,
            door_area: 0.0,
            base_waste_percent: 10.0,
            additional_waste_percent: 0.0,
        }
    }
}

impl TileInput {
    pub fn openings_area(&self) -> f64 {
        match self.surface_type {
            SurfaceType::Floor => 0.0,
            SurfaceType::Wall | SurfaceType::BathroomWall => {
                f64::from(self.windows) * non_negative(self.window_area)
                    + f64::from(self.doors) * non_negative(self.door_area)
            }
        }
    }

    /// Area to tile in m², never negative.
    pub fn surface_area(&self) -> f64 {
        let base = self.length * self.width;
        let area = match self.surface_type {
            SurfaceType::Floor => base,
            SurfaceType::Wall => base - self.openings_area(),
            SurfaceType::BathroomWall => base - self.openings_area() + non_negative(self.bath_area),
        };
        area.max(0.0)
    }

    /// Footprint of one tile including its grout joint, m².
    pub fn tile_area(&self) -> f64 {
        let grout_cm = non_negative(self.grout_width_mm) / 10.0;
        let length_m = (self.tile_length_cm + grout_cm) / 100.0;
        let width_m = (self.tile_width_cm + grout_cm) / 100.0;
        length_m * width_m
    }

    pub fn waste_percent(&self) -> f64 {
        non_negative(self.base_waste_percent) + non_negative(self.additional_waste_percent)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileResult {
    /// m²
    pub surface_area: f64,
    /// m² per tile including grout
    pub tile_area: f64,
    pub waste_percent: f64,
    /// Tiles covering the area exactly, before waste and rounding
    pub tiles_exact: f64,
    pub tiles_needed: u64,
    pub packs_needed: u64,
    /// Tiles left over from the last pack
    pub spare_tiles: u64,
}

/// `None` when a surface dimension, a tile dimension or the pack size is not
/// positive, or when the tile count is too large to represent.
pub fn compute_tile(input: &TileInput) -> Option<TileResult> {
    let dimensions_valid = positive(input.length)
        && positive(input.width)
        && positive(input.tile_length_cm)
        && positive(input.tile_width_cm);
    if !dimensions_valid || input.tiles_per_pack == 0 {
        return None;
    }

    let surface_area = input.surface_area();
    let tile_area = input.tile_area();
    let waste_percent = input.waste_percent();

    let tiles_exact = surface_area / tile_area;
    let tiles_needed = whole_units(tiles_exact * (1.0 + waste_percent / 100.0))?;
    let per_pack = u64::from(input.tiles_per_pack);
    let packs_needed = tiles_needed.div_ceil(per_pack);
    let spare_tiles = packs_needed.checked_mul(per_pack)?.checked_sub(tiles_needed)?;

    Some(TileResult {
        surface_area,
        tile_area,
        waste_percent,
        tiles_exact,
        tiles_needed,
        packs_needed,
        spare_tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> TileInput {
        TileInput {
            surface_type: SurfaceType::Floor,
            length: 3.0,
            width: 2.5,
            tile_length_cm: 30.0,
            tile_width_cm: 30.0,
            tiles_per_pack: 11,
            base_waste_percent: 10.0,
            ..TileInput::default()
        }
    }

    #[test]
    fn test_floor() {
        let result = compute_tile(&floor()).unwrap();
        assert!((result.surface_area - 7.5).abs() < 1e-9);
        assert!(result.tiles_needed > 20);
        assert!(result.packs_needed > 1);
        // 7.5 / 0.09 = 83.33, +10% = 91.67
        assert_eq!(result.tiles_needed, 92);
        assert_eq!(result.packs_needed, 9);
        assert_eq!(result.spare_tiles, 7);
    }

    #[test]
    fn test_grout_increases_tile_footprint() {
        let with_grout = compute_tile(&TileInput {
            grout_width_mm: 3.0,
            ..floor()
        })
        .unwrap();
        assert!((with_grout.tile_area - 0.303 * 0.303).abs() < 1e-12);
        assert!(with_grout.tiles_needed <= 92);
    }

    #[test]
    fn test_additional_waste() {
        let result = compute_tile(&TileInput {
            additional_waste_percent: 5.0,
            ..floor()
        })
        .unwrap();
        assert_eq!(result.waste_percent, 15.0);
        // 83.33 * 1.15 = 95.83
        assert_eq!(result.tiles_needed, 96);
    }

    #[test]
    fn test_wall_openings_and_bath() {
        let wall = TileInput {
            surface_type: SurfaceType::Wall,
            length: 7.0,
            width: 2.0,
            doors: 1,
            door_area: 1.6,
            windows: 1,
            window_area: 0.4,
            bath_area: 1.0,
            ..floor()
        };
        let result = compute_tile(&wall).unwrap();
        assert!((result.surface_area - 12.0).abs() < 1e-9);

        let bathroom = TileInput {
            surface_type: SurfaceType::BathroomWall,
            ..wall.clone()
        };
        let result = compute_tile(&bathroom).unwrap();
        assert!((result.surface_area - 13.0).abs() < 1e-9);

        // openings are ignored for floors
        let floor_with_doors = TileInput {
            surface_type: SurfaceType::Floor,
            ..wall
        };
        assert!((floor_with_doors.surface_area() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_openings_exceeding_wall() {
        let input = TileInput {
            surface_type: SurfaceType::Wall,
            length: 1.0,
            width: 1.0,
            doors: 2,
            door_area: 2.0,
            ..floor()
        };
        let result = compute_tile(&input).unwrap();
        assert_eq!(result.surface_area, 0.0);
        assert_eq!(result.tiles_needed, 0);
        assert_eq!(result.packs_needed, 0);
    }

    #[test]
    fn test_invalid_input_returns_none() {
        for input in [
            TileInput { length: 0.0, ..floor() },
            TileInput { width: -2.0, ..floor() },
            TileInput { tile_length_cm: 0.0, ..floor() },
            TileInput { tile_width_cm: f64::NAN, ..floor() },
            TileInput { tiles_per_pack: 0, ..floor() },
        ] {
            assert_eq!(compute_tile(&input), None);
        }
    }

    #[test]
    fn test_oversized_surface_returns_none() {
        assert_eq!(compute_tile(&TileInput { length: 1e150, width: 1e150, ..floor() }), None);
        assert_eq!(compute_tile(&TileInput { length: 1e200, width: 1e200, ..floor() }), None);
    }

    #[test]
    fn test_json_input() {
        let input: TileInput = serde_json::from_str(
            r#"{"surface_type": "floor", "length": 3, "width": 2.5, "tile_length_cm": 30, "tile_width_cm": 30, "tiles_per_pack": 11}"#,
        )
        .unwrap();
        assert_eq!(input, floor());
    }
}
