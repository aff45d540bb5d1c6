//! Integer axis-aligned bounding boxes.

use lumen_math::Point3;

/// Axis-aligned box with integer corners.
///
/// Built from a real-valued extent by flooring the minimum and ceiling
/// the maximum, so it always contains the shape it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridBounds {
    /// Minimum corner (inclusive).
    pub min: [i64; 3],
    /// Maximum corner (inclusive).
    pub max: [i64; 3],
}

impl GridBounds {
    /// Create bounds from integer corners.
    pub fn new(min: [i64; 3], max: [i64; 3]) -> Self {
        Self { min, max }
    }

    /// Round a real extent outward to integer bounds.
    pub fn from_extent(min: &Point3, max: &Point3) -> Self {
        Self {
            min: [
                min.x.floor() as i64,
                min.y.floor() as i64,
                min.z.floor() as i64,
            ],
            max: [max.x.ceil() as i64, max.y.ceil() as i64, max.z.ceil() as i64],
        }
    }

    /// Smallest bounds containing every point.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (lo, hi) = iter.fold((*first, *first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        });
        Some(Self::from_extent(&lo, &hi))
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = out.min[axis].min(other.min[axis]);
            out.max[axis] = out.max[axis].max(other.max[axis]);
        }
        out
    }

    /// Closed containment test.
    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|axis| {
            p[axis] >= self.min[axis] as f64 && p[axis] <= self.max[axis] as f64
        })
    }

    /// Length along `axis`.
    pub fn extent(&self, axis: usize) -> i64 {
        self.max[axis] - self.min[axis]
    }

    /// Minimum corner as a point.
    pub fn min_point(&self) -> Point3 {
        Point3::new(self.min[0] as f64, self.min[1] as f64, self.min[2] as f64)
    }

    /// Maximum corner as a point.
    pub fn max_point(&self) -> Point3 {
        Point3::new(self.max[0] as f64, self.max[1] as f64, self.max[2] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extent_rounds_outward() {
        let b = GridBounds::from_extent(
            &Point3::new(-1.5, 0.2, -3.0),
            &Point3::new(1.5, 0.8, -2.0),
        );
        assert_eq!(b.min, [-2, 0, -3]);
        assert_eq!(b.max, [2, 1, -2]);
    }

    #[test]
    fn test_union_and_contains() {
        let a = GridBounds::new([0, 0, 0], [1, 1, 1]);
        let b = GridBounds::new([-2, 3, 0], [0, 4, 5]);
        let u = a.union(&b);
        assert_eq!(u, GridBounds::new([-2, 0, 0], [1, 4, 5]));
        assert!(u.contains(&Point3::new(1.0, 4.0, 5.0)));
        assert!(!u.contains(&Point3::new(1.1, 0.0, 0.0)));
        assert_eq!(u.extent(2), 5);
    }

    #[test]
    fn test_from_points() {
        let pts = [Point3::new(0.5, -1.0, 2.0), Point3::new(-0.5, 1.0, 2.0)];
        let b = GridBounds::from_points(&pts).unwrap();
        assert_eq!(b.min, [-1, -1, 2]);
        assert_eq!(b.max, [1, 1, 2]);
        assert!(GridBounds::from_points(std::iter::empty()).is_none());
    }
}
