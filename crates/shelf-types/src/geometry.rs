use serde::{Deserialize, Serialize};

/// Conversion from authoritative centimetres to scene units (metres).
pub const CM_TO_SCENE: f64 = 0.01;

/// Derived placement of a box-shaped element in scene units.
///
/// `position` is the box centre, `dimensions` its extent along x, y, z.
/// Placements are caches recomputed from authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: [f64; 3],
    pub dimensions: [f64; 3],
}

impl Placement {
    /// Build a placement from a centre and extents given in centimetres.
    pub fn from_cm(center: [f64; 3], extent: [f64; 3]) -> Self {
        Self {
            position: center.map(|v| v * CM_TO_SCENE),
            dimensions: extent.map(|v| v.max(0.0) * CM_TO_SCENE),
        }
    }

    /// Area of the x/y face (front or back view).
    pub fn front_area(&self) -> f64 {
        self.dimensions[0] * self.dimensions[1]
    }

    /// Area of the y/z face (side view).
    pub fn side_area(&self) -> f64 {
        self.dimensions[1] * self.dimensions[2]
    }

    /// Area of the x/z face (top view).
    pub fn top_area(&self) -> f64 {
        self.dimensions[0] * self.dimensions[2]
    }

    /// Lower and upper y bounds.
    pub fn y_range(&self) -> (f64, f64) {
        let half = self.dimensions[1] / 2.0;
        (self.position[1] - half, self.position[1] + half)
    }
}
