use serde::Deserialize;

use crate::error::GeomError;

/// Margin added around a point set when padding its bounding volume.
pub const PAD_MARGIN: f64 = 0.05;

/// Padding policy applied to an axis-aligned bounding volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    /// Pad every axis by the margin on both sides.
    Uniform,
    /// Pad only the vertical (third) axis by the margin on both sides.
    VerticalOnly,
}

/// An axis-aligned bounding volume given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The minimum corner.
    pub min: [f64; 3],
    /// The maximum corner.
    pub max: [f64; 3],
}

impl Aabb {
    /// Compute the bounds of a point set.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::EmptyPointSet`] for an empty input.
    pub fn from_points(points: &[[f64; 3]]) -> Result<Self, GeomError> {
        let first = points.first().ok_or(GeomError::EmptyPointSet)?;
        let mut min = *first;
        let mut max = *first;
        for p in points.iter().skip(1) {
            for k in 0..3 {
                min[k] = min[k].min(p[k]);
                max[k] = max[k].max(p[k]);
            }
        }
        Ok(Self { min, max })
    }

    /// Expand the volume by [`PAD_MARGIN`] according to the padding policy.
    pub fn padded(&self, mode: PaddingMode) -> Self {
        let mut out = *self;
        match mode {
            PaddingMode::Uniform => {
                for k in 0..3 {
                    out.min[k] -= PAD_MARGIN;
                    out.max[k] += PAD_MARGIN;
                }
            }
            PaddingMode::VerticalOnly => {
                out.min[2] -= PAD_MARGIN;
                out.max[2] += PAD_MARGIN;
            }
        }
        out
    }

    /// The midpoint of the volume.
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// The largest side length of the volume.
    pub fn max_extent(&self) -> f64 {
        (self.max[0] - self.min[0])
            .max(self.max[1] - self.min[1])
            .max(self.max[2] - self.min[2])
    }
}
