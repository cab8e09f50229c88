//! # Wallpaper Calculation
//!
//! Rolls of wallpaper for a whole room (perimeter × height) or one wall.
//!
//! Each strip is cut with an allowance for matching the pattern: half a
//! repeat on average for a straight match, a full repeat for an offset
//! (drop) match. That allowance shrinks the usable area of a roll. A fixed
//! 10% margin is added on top before rounding up to whole rolls.

use serde::{Deserialize, Serialize};

use super::{non_negative, positive, whole_units};

pub const SAFETY_MARGIN: f64 = 1.1;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    #[default]
    Room,
    Wall,
}

/// A window or door, metres.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Opening {
    pub width: f64,
    pub height: f64,
}

impl Opening {
    pub fn area(&self) -> f64 {
        non_negative(self.width) * non_negative(self.height)
    }
}

/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "room",
///   "room_width": 3.0,
///   "room_length": 4.0,
///   "room_height": 2.7,
///   "windows": [{ "width": 1.2, "height": 1.5 }],
///   "doors": [{ "width": 0.9, "height": 2.0 }],
///   "roll_width_cm": 53.0,
///   "roll_length_m": 10.05,
///   "pattern_repeat_cm": 64.0,
///   "pattern_offset": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WallpaperInput {
    pub calculation_type: CalculationType,
    pub room_width: f64,
    pub room_length: f64,
    pub room_height: f64,
    pub wall_length: f64,
    pub wall_height: f64,
    pub windows: Vec<Opening>,
    pub doors: Vec<Opening>,
    pub roll_width_cm: f64,
    pub roll_length_m: f64,
    pub pattern_repeat_cm: f64,
    pub pattern_offset: bool,
}

impl Default for WallpaperInput {
    fn default() -> Self {
        WallpaperInput {
            calculation_type: CalculationType::Room,
            room_width: 0.0,
            room_length: 0.0,
            room_height: 0.0,
            wall_length: 0.0,
            wall_height: 0.0,
            windows: Vec::new(),
            doors: Vec::new(),
            roll_width_cm: 53.0,
            roll_length_m: 10.05,
            pattern_repeat_cm: 0.0,
            pattern_offset: false,
        }
    }
}

impl WallpaperInput {
    fn height(&self) -> f64 {
        match self.calculation_type {
            CalculationType::Room => self.room_height,
            CalculationType::Wall => self.wall_height,
        }
    }

    fn dimensions_valid(&self) -> bool {
        let walls = match self.calculation_type {
            CalculationType::Room => {
                positive(self.room_width) && positive(self.room_length) && positive(self.room_height)
            }
            CalculationType::Wall => positive(self.wall_length) && positive(self.wall_height),
        };
        walls && positive(self.roll_width_cm) && positive(self.roll_length_m)
    }

    pub fn wall_area(&self) -> f64 {
        match self.calculation_type {
            CalculationType::Room => 2.0 * (self.room_width + self.room_length) * self.room_height,
            CalculationType::Wall => self.wall_length * self.wall_height,
        }
    }

    pub fn openings_area(&self) -> f64 {
        self.windows.iter().chain(&self.doors).map(Opening::area).sum()
    }

    /// Extra length cut per strip to line up the pattern, metres.
    pub fn pattern_allowance(&self) -> f64 {
        let repeat = non_negative(self.pattern_repeat_cm) / 100.0;
        if self.pattern_offset {
            repeat
        } else {
            repeat / 2.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallpaperResult {
    pub wall_area: f64,
    pub openings_area: f64,
    pub usable_area: f64,
    /// Nominal roll area, m²
    pub roll_area: f64,
    /// Roll area left after pattern matching, m²
    pub effective_roll_area: f64,
    pub rolls_needed: u64,
}

/// `None` when a wall or roll dimension is not positive, or when the roll
/// count is too large to represent.
pub fn compute_wallpaper(input: &WallpaperInput) -> Option<WallpaperResult> {
    if !input.dimensions_valid() {
        return None;
    }

    let wall_area = input.wall_area();
    let openings_area = input.openings_area();
    let usable_area = (wall_area - openings_area).max(0.0);

    let roll_area = input.roll_width_cm / 100.0 * input.roll_length_m;
    let height = input.height();
    let effective_roll_area = roll_area * height / (height + input.pattern_allowance());

    let rolls_needed = whole_units(usable_area * SAFETY_MARGIN / effective_roll_area)?;

    Some(WallpaperResult {
        wall_area,
        openings_area,
        usable_area,
        roll_area,
        effective_roll_area,
        rolls_needed,
    })
}
