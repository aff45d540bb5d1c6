//! Closest-hit and occluder queries over a scene's leaf geometries.

use lumen_geom::{GeoHit, Geometry, Ray};

/// Strategy for answering ray queries against the flattened list of a
/// scene's leaf geometries.
///
/// Implementations must agree on results; they differ only in how many
/// geometries they test.
pub trait Accelerator: Send + Sync {
    /// Nearest hit along `ray`, if any.
    fn closest_hit<'g>(&self, leaves: &[&'g Geometry], ray: &Ray) -> Option<GeoHit<'g>>;

    /// Every hit along `ray` up to `max_distance`, in no particular order.
    fn occluders<'g>(&self, leaves: &[&'g Geometry], ray: &Ray, max_distance: f64)
        -> Vec<GeoHit<'g>>;
}

/// Tests every geometry for every ray.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl Accelerator for LinearScan {
    fn closest_hit<'g>(&self, leaves: &[&'g Geometry], ray: &Ray) -> Option<GeoHit<'g>> {
        ray.closest_hit(
            leaves
                .iter()
                .copied()
                .filter_map(|g| g.find_closest(ray)),
        )
    }

    fn occluders<'g>(
        &self,
        leaves: &[&'g Geometry],
        ray: &Ray,
        max_distance: f64,
    ) -> Vec<GeoHit<'g>> {
        leaves
            .iter()
            .copied()
            .flat_map(|g| g.find_hits(ray, max_distance))
            .collect()
    }
}
