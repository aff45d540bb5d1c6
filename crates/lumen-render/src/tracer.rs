//! Recursive Phong shading with shadows, reflection and transmission.
//!
//! A primary ray's color is the scene ambient plus the shaded color of
//! its closest hit. Shading sums, per light, a diffuse and a specular
//! term attenuated by the transparency of whatever lies between the hit
//! and the light, then adds the geometry's emission and (while the
//! recursion depth allows) the averaged colors of the reflected and
//! transmitted beams.
//!
//! Contributions whose accumulated attenuation falls below
//! [`TracerOptions::min_k`] in every channel are skipped, which together
//! with the level cap bounds the recursion.

use crate::accel::{Accelerator, LinearScan};
use crate::config::TracerOptions;
use crate::light::LightSource;
use crate::scene::Scene;
use lumen_geom::{GeoHit, Geometry, GlossyBeam, Ray};
use lumen_math::{align_zero, reflect, Color, Dir3, Double3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

static LINEAR: LinearScan = LinearScan;

/// Identifies one sample of one pixel at one recursion depth.
///
/// Every random draw is seeded from this key, so a render is
/// reproducible regardless of how pixels are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleKey {
    /// Pixel column.
    pub column: u32,
    /// Pixel row.
    pub row: u32,
    /// Bounce depth, 0 for the primary ray.
    pub depth: u32,
    /// Sample discriminator within the depth.
    pub sample: u64,
}

impl SampleKey {
    /// Key of a primary ray.
    pub fn pixel(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            depth: 0,
            sample: 0,
        }
    }

    /// Key for a secondary beam of kind `branch` spawned from this sample.
    pub fn bounce(self, branch: u64) -> Self {
        Self {
            depth: self.depth + 1,
            sample: splitmix64(self.sample ^ splitmix64(branch)),
            ..self
        }
    }

    /// Same pixel and depth, different sample.
    pub fn with_sample(self, sample: u64) -> Self {
        Self {
            sample: splitmix64(self.sample.wrapping_add(sample)),
            ..self
        }
    }

    /// 64-bit seed mixing all fields.
    pub fn seed(&self) -> u64 {
        let pixel = (u64::from(self.column) << 32) | u64::from(self.row);
        splitmix64(splitmix64(splitmix64(pixel) ^ u64::from(self.depth)) ^ self.sample)
    }

    /// Generator seeded from this key.
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed())
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

const REFLECTION: u64 = 1;
const TRANSMISSION: u64 = 2;

/// Anything that can turn a ray into a color.
pub trait TraceRay: Sync {
    /// Color seen along `ray`.
    fn trace_ray(&self, ray: &Ray, key: SampleKey) -> Color;
}

/// Whitted-style recursive tracer over a borrowed scene.
pub struct RayTracer<'s> {
    scene: &'s Scene,
    leaves: Vec<&'s Geometry>,
    accel: &'s dyn Accelerator,
    options: TracerOptions,
}

impl<'s> RayTracer<'s> {
    /// Tracer using the scene's voxel grid when one has been built,
    /// otherwise a linear scan.
    pub fn new(scene: &'s Scene) -> Self {
        let accel: &'s dyn Accelerator = match scene.grid() {
            Some(grid) => grid,
            None => &LINEAR,
        };
        Self {
            scene,
            leaves: scene.leaves(),
            accel,
            options: TracerOptions::default(),
        }
    }

    /// Tracer that always scans every geometry.
    pub fn linear(scene: &'s Scene) -> Self {
        Self {
            accel: &LINEAR,
            ..Self::new(scene)
        }
    }

    /// Replace the tracer options.
    pub fn with_options(mut self, options: TracerOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &TracerOptions {
        &self.options
    }

    /// Nearest hit along `ray`.
    pub fn closest_hit(&self, ray: &Ray) -> Option<GeoHit<'s>> {
        self.accel.closest_hit(&self.leaves, ray)
    }

    fn calc_color(&self, hit: &GeoHit<'s>, ray: &Ray, level: u32, k: Double3, key: SampleKey) -> Color {
        let n = hit.normal();
        let vn = align_zero(ray.direction.dot(n.as_ref()));
        if vn == 0.0 {
            return Color::BLACK;
        }
        let color = hit.geometry.emission + self.local_effects(hit, ray, &n, vn, k);
        if level <= 1 {
            color
        } else {
            color + self.global_effects(hit, ray, &n, level, k, key)
        }
    }

    fn local_effects(&self, hit: &GeoHit<'s>, ray: &Ray, n: &Dir3, vn: f64, k: Double3) -> Color {
        let material = &hit.geometry.material;
        let mut color = Color::BLACK;
        for light in &self.scene.lights {
            let Some(l) = light.direction_at(&hit.point) else {
                continue;
            };
            let nl = align_zero(n.dot(l.as_ref()));
            if nl * vn <= 0.0 {
                continue;
            }
            let ktr = self.transparency(hit, light, &l, n);
            if (ktr * k).lower_than(self.options.min_k) {
                continue;
            }
            let il = light.intensity_at(&hit.point) * ktr;
            color += il * material.kd.scale(nl.abs());

            let r = l.as_ref() - n.as_ref() * (2.0 * nl);
            let vr = align_zero(-ray.direction.dot(&r));
            if vr > 0.0 {
                color += il * material.ks.scale(specular_falloff(vr, material.shininess));
            }
        }
        color
    }

    /// Attenuation of `light` on its way to `hit`.
    ///
    /// A shadow ray leaves the hit on the light's side of the surface and
    /// every distinct geometry it crosses before the light multiplies the
    /// result by its `kt`. Returns zero as soon as every channel drops
    /// below the cutoff.
    pub fn transparency(&self, hit: &GeoHit<'s>, light: &LightSource, l: &Dir3, n: &Dir3) -> Double3 {
        let shadow = Ray::offset_by(hit.point, -*l, n, self.options.epsilon);
        let max_distance = light.distance_to(&hit.point);
        let mut seen: HashSet<*const Geometry> = HashSet::new();
        let mut ktr = Double3::ONE;
        for occluder in self.accel.occluders(&self.leaves, &shadow, max_distance) {
            if !seen.insert(occluder.geometry as *const Geometry) {
                continue;
            }
            ktr = ktr * occluder.geometry.material.kt;
            if ktr.lower_than(self.options.min_k) {
                return Double3::ZERO;
            }
        }
        ktr
    }

    fn global_effects(
        &self,
        hit: &GeoHit<'s>,
        ray: &Ray,
        n: &Dir3,
        level: u32,
        k: Double3,
        key: SampleKey,
    ) -> Color {
        let material = &hit.geometry.material;
        let v = ray.direction;
        let eps = self.options.epsilon;
        let mut color = Color::BLACK;

        let kkr = k * material.kr;
        if !kkr.lower_than(self.options.min_k) {
            let dir = Dir3::new_normalize(reflect(v.as_ref(), n));
            let reflected = Ray::offset_by(hit.point, dir, n, eps);
            color += self.global_effect(
                &reflected,
                n,
                level,
                material.kr,
                kkr,
                material.glossy.as_ref(),
                key.bounce(REFLECTION),
            );
        }

        let kkt = k * material.kt;
        if !kkt.lower_than(self.options.min_k) {
            let transmitted = Ray::offset_by(hit.point, v, n, eps);
            color += self.global_effect(
                &transmitted,
                n,
                level,
                material.kt,
                kkt,
                material.glossy.as_ref(),
                key.bounce(TRANSMISSION),
            );
        }
        color
    }

    #[allow(clippy::too_many_arguments)]
    fn global_effect(
        &self,
        ray: &Ray,
        n: &Dir3,
        level: u32,
        kx: Double3,
        kkx: Double3,
        glossy: Option<&GlossyBeam>,
        key: SampleKey,
    ) -> Color {
        let rays = ray.beam(n, glossy, &mut key.rng());
        let total: Color = rays
            .iter()
            .enumerate()
            .map(|(i, r)| match self.closest_hit(r) {
                Some(hit) => self.calc_color(&hit, r, level - 1, kkx, key.with_sample(i as u64)),
                None => self.scene.background,
            })
            .sum();
        total.reduce(rays.len() as f64) * kx
    }
}

impl TraceRay for RayTracer<'_> {
    fn trace_ray(&self, ray: &Ray, key: SampleKey) -> Color {
        match self.closest_hit(ray) {
            Some(hit) => {
                self.scene.ambient.intensity
                    + self.calc_color(&hit, ray, self.options.max_level, Double3::ONE, key)
            }
            None => self.scene.background,
        }
    }
}

/// `vr^shininess` for `vr` in `(0, 1]`, exact for every `u32` exponent.
fn specular_falloff(vr: f64, shininess: u32) -> f64 {
    vr.powf(f64::from(shininess))
}
