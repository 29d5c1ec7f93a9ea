//! Resize handles

use crate::{CanvasError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Compass direction of a resize handle.
///
/// Any combination of one vertical and one horizontal component, e.g. `"se"`
/// or `"n"`. `n` and `w` move the top/left edge and keep the opposite edge
/// fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResizeDirection {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ResizeDirection {
    pub const N: ResizeDirection = ResizeDirection { north: true, south: false, east: false, west: false };
    pub const S: ResizeDirection = ResizeDirection { north: false, south: true, east: false, west: false };
    pub const E: ResizeDirection = ResizeDirection { north: false, south: false, east: true, west: false };
    pub const W: ResizeDirection = ResizeDirection { north: false, south: false, east: false, west: true };
    pub const NE: ResizeDirection = ResizeDirection { north: true, south: false, east: true, west: false };
    pub const NW: ResizeDirection = ResizeDirection { north: true, south: false, east: false, west: true };
    pub const SE: ResizeDirection = ResizeDirection { north: false, south: true, east: true, west: false };
    pub const SW: ResizeDirection = ResizeDirection { north: false, south: true, east: false, west: true };

    /// All eight handles
    pub const ALL: [ResizeDirection; 8] = [
        Self::N, Self::S, Self::E, Self::W, Self::NE, Self::NW, Self::SE, Self::SW,
    ];
}

impl FromStr for ResizeDirection {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CanvasError::InvalidDirection(s.to_string());
        let mut direction = ResizeDirection::default();

        for c in s.trim().chars() {
            let component = match c.to_ascii_lowercase() {
                'n' => &mut direction.north,
                's' => &mut direction.south,
                'e' => &mut direction.east,
                'w' => &mut direction.west,
                _ => return Err(invalid()),
            };
            if *component {
                return Err(invalid());
            }
            *component = true;
        }

        let empty = direction == ResizeDirection::default();
        let contradictory = (direction.north && direction.south) || (direction.east && direction.west);
        if empty || contradictory {
            return Err(invalid());
        }
        Ok(direction)
    }
}

impl std::fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.north {
            write!(f, "n")?;
        }
        if self.south {
            write!(f, "s")?;
        }
        if self.east {
            write!(f, "e")?;
        }
        if self.west {
            write!(f, "w")?;
        }
        Ok(())
    }
}
