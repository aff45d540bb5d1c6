//! Capped finite cylinders.

use super::{accept_roots, Plane, Tube};
use crate::error::{GeometryError, Result};
use crate::{GridBounds, Ray};
use lumen_math::{align_zero, is_zero, Dir3, Point3, Vec3};

/// A tube cut to `height` along its axis and closed by two disk caps.
///
/// The bottom cap sits at the axis origin, the top cap `height` along
/// the axis direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    bottom: Plane,
    top: Plane,
}

impl Cylinder {
    /// Create a cylinder. Radius and height must be positive.
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Self> {
        let tube = Tube::new(axis, radius)?;
        if !(height > 0.0) {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        let normal = axis.direction;
        Ok(Self {
            tube,
            height,
            bottom: Plane {
                point: axis.origin,
                normal,
            },
            top: Plane {
                point: axis.at(height),
                normal,
            },
        })
    }

    /// Axis ray.
    pub fn axis(&self) -> &Ray {
        &self.tube.axis
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.tube.radius
    }

    /// Height along the axis.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Intersect a ray with the casing and both caps.
    ///
    /// Casing hits are kept strictly between the caps; cap hits are kept
    /// within the cap radius. At most two hits are returned, sorted by t.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        let mut ts: Vec<f64> = self
            .tube
            .intersect(ray, max_distance)
            .into_iter()
            .filter(|&t| {
                let s = align_zero(self.tube.axial(&ray.at(t)));
                s > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        for cap in [&self.bottom, &self.top] {
            if let Some(t) = cap.intersect(ray, max_distance) {
                let dist_sq = (ray.at(t) - cap.point).norm_squared();
                if align_zero(dist_sq - self.tube.radius * self.tube.radius) <= 0.0 {
                    ts.push(t);
                }
            }
        }

        let mut ts = accept_roots(ts, max_distance);
        ts.truncate(2);
        ts
    }

    /// Outward normal at `p`.
    ///
    /// Points whose axial coordinate is at either end (including the cap
    /// seams) take the cap normal `∓axis.direction`.
    pub fn normal_at(&self, p: &Point3) -> Dir3 {
        let s = self.tube.axial(p);
        if is_zero(s) {
            -self.tube.axis.direction
        } else if is_zero(s - self.height) {
            self.tube.axis.direction
        } else {
            self.tube.normal_at(p)
        }
    }

    /// Integer bounds of both end disks.
    pub fn bounds(&self) -> GridBounds {
        let a = self.tube.axis.direction.as_ref();
        let r = self.tube.radius;
        // Half-extent of a disk perpendicular to `a` along each world axis.
        let ext = Vec3::new(
            r * (1.0 - a.x * a.x).max(0.0).sqrt(),
            r * (1.0 - a.y * a.y).max(0.0).sqrt(),
            r * (1.0 - a.z * a.z).max(0.0).sqrt(),
        );
        let (b, t) = (self.bottom.point, self.top.point);
        GridBounds::from_extent(&(b.inf(&t) - ext), &(b.sup(&t) + ext))
    }
}
