use glam::DVec3;

use crate::error::GeomError;

/// A point cloud with positions and optional per-point normals.
#[derive(Debug, Clone)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The normals of the points.
    normals: Option<Vec<[f64; 3]>>,
}

impl PointCloud {
    /// Create a new point cloud from points and normals (optional).
    pub fn new(points: Vec<[f64; 3]>, normals: Option<Vec<[f64; 3]>>) -> Self {
        Self { points, normals }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get as mutable reference the points in the point cloud.
    pub fn points_mut(&mut self) -> &mut [[f64; 3]] {
        &mut self.points
    }

    /// Get as reference the normals of the points in the point cloud.
    pub fn normals(&self) -> Option<&[[f64; 3]]> {
        self.normals.as_deref()
    }

    /// Get the minimum bound of the point cloud.
    pub fn min_bound(&self) -> DVec3 {
        if self.points.is_empty() {
            return DVec3::ZERO;
        }
        self.points
            .iter()
            .map(|p| DVec3::from_array(*p))
            .fold(DVec3::from_array(self.points[0]), |a, b| a.min(b))
    }

    /// Get the maximum bound of the point cloud.
    pub fn max_bound(&self) -> DVec3 {
        if self.points.is_empty() {
            return DVec3::ZERO;
        }
        self.points
            .iter()
            .map(|p| DVec3::from_array(*p))
            .fold(DVec3::from_array(self.points[0]), |a, b| a.max(b))
    }

    /// Compute the centroid of the point cloud.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::EmptyPointSet`] for an empty cloud.
    pub fn centroid(&self) -> Result<[f64; 3], GeomError> {
        if self.points.is_empty() {
            return Err(GeomError::EmptyPointSet);
        }
        let sum = self
            .points
            .iter()
            .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
        Ok((sum / self.points.len() as f64).to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud() {
        let cloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Some(vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]),
        );

        assert_eq!(cloud.len(), 2);
        assert!(!cloud.is_empty());
        if let Some(normals) = cloud.normals() {
            assert_eq!(normals.len(), 2);
        }
        assert_eq!(cloud.centroid().unwrap(), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn bounds() {
        let cloud = PointCloud::new(vec![[0.0, -1.0, 2.0], [1.0, 1.0, -2.0]], None);
        assert_eq!(cloud.min_bound().to_array(), [0.0, -1.0, -2.0]);
        assert_eq!(cloud.max_bound().to_array(), [1.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_centroid_is_an_error() {
        let cloud = PointCloud::new(vec![], None);
        assert!(cloud.centroid().is_err());
    }
}
