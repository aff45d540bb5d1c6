//! Uniform voxel grid acceleration.
//!
//! The scene's bounded geometries are binned into an `R × R × R` grid
//! spanning their combined integer bounds. A ray walks the voxels it
//! pierces in order (3D-DDA, Amanatides & Woo) and only tests the
//! geometries binned there. Unbounded geometries (planes, tubes) live in
//! a side list that every query scans.
//!
//! Geometries are referred to by their index in the scene's leaf list,
//! so the grid holds no references into the scene.

use crate::accel::Accelerator;
use crate::error::{RenderError, Result};
use lumen_geom::{GeoHit, Geometry, GridBounds, Ray};
use lumen_math::{is_zero, Point3, Vec3};
use std::collections::{HashMap, HashSet};

/// Distance a boundary entry point is pushed into the grid.
const ENTRY_NUDGE: f64 = 1e-9;

/// Voxel coordinates `(i, j, k)`, each in `0..resolution`.
pub type VoxelIndex = [usize; 3];

/// Uniform grid over a scene's bounded geometries.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    resolution: usize,
    region: Option<Region>,
    cells: HashMap<VoxelIndex, Vec<usize>>,
    unbounded: Vec<usize>,
}

/// Spatial extent of the grid.
#[derive(Debug, Clone)]
struct Region {
    bounds: GridBounds,
    origin: Point3,
    edge: Vec3,
}

/// One voxel visited by a walk, with the ray span inside it.
#[derive(Debug, Clone, Copy)]
struct Cell {
    index: VoxelIndex,
    t_enter: f64,
    t_exit: f64,
}

impl VoxelGrid {
    /// Bin `leaves` into a grid with `resolution` voxels per axis.
    pub fn build(leaves: &[&Geometry], resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(RenderError::InvalidConfig(
                "grid resolution must be at least 1".into(),
            ));
        }
        let bounds = leaves
            .iter()
            .filter_map(|g| g.bounds())
            .reduce(|a, b| a.union(&b))
            .map(widen_flat_axes);

        let mut grid = Self {
            resolution,
            region: None,
            cells: HashMap::new(),
            unbounded: Vec::new(),
        };

        let region = match bounds {
            Some(b) => Region::new(b, resolution),
            None => {
                grid.unbounded = (0..leaves.len()).collect();
                log::info!("voxel grid: no bounded geometry, {} unbounded", leaves.len());
                return Ok(grid);
            }
        };

        for (i, g) in leaves.iter().enumerate() {
            let Some(b) = g.bounds() else {
                grid.unbounded.push(i);
                continue;
            };
            let (lo, hi) = region.voxel_span(&b, resolution);
            log::trace!("geometry {i}: voxels {lo:?}..={hi:?}");
            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        grid.cells.entry([x, y, z]).or_default().push(i);
                    }
                }
            }
        }

        log::info!(
            "voxel grid: {r}x{r}x{r} over {:?}..{:?}, {} occupied voxels, {} unbounded",
            region.bounds.min,
            region.bounds.max,
            grid.cells.len(),
            grid.unbounded.len(),
            r = resolution,
        );
        grid.region = Some(region);
        Ok(grid)
    }

    /// Voxels per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Integer bounds covered by the grid, `None` when nothing is bounded.
    pub fn bounds(&self) -> Option<GridBounds> {
        self.region.as_ref().map(|r| r.bounds)
    }

    /// Leaf indices binned in a voxel.
    pub fn voxel(&self, index: VoxelIndex) -> &[usize] {
        self.cells.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Leaf indices of unbounded geometries.
    pub fn unbounded(&self) -> &[usize] {
        &self.unbounded
    }

    /// Leaf indices of every geometry that may intersect `ray` within
    /// `max_distance`, unbounded ones included. Each index appears once.
    pub fn path_geometries(&self, ray: &Ray, max_distance: f64) -> Vec<usize> {
        let mut out = self.unbounded.clone();
        let mut seen: HashSet<usize> = HashSet::new();
        for cell in self.walk(ray) {
            if cell.t_enter > max_distance {
                break;
            }
            for &i in self.voxel(cell.index) {
                if seen.insert(i) {
                    out.push(i);
                }
            }
        }
        out
    }

    /// Voxels pierced by `ray`, in traversal order.
    fn walk(&self, ray: &Ray) -> Walk {
        match &self.region {
            Some(region) => Walk::start(region, self.resolution, ray),
            None => Walk::finished(),
        }
    }

    /// Nearest hit among the bounded geometries, walking voxel by voxel.
    ///
    /// A hit found in a voxel is accepted once the walk has reached the
    /// voxel containing it; until then it is carried forward as the best
    /// candidate, since a closer hit may still appear in a voxel between.
    fn first_hit<'g>(&self, leaves: &[&'g Geometry], ray: &Ray, stop_at: f64) -> Option<GeoHit<'g>> {
        let mut candidate: Option<GeoHit<'g>> = None;
        for cell in self.walk(ray) {
            if cell.t_enter > stop_at {
                break;
            }
            for &i in self.voxel(cell.index) {
                if let Some(hit) = leaves[i].find_closest(ray) {
                    candidate = closer(candidate, hit);
                }
            }
            if let Some(hit) = candidate {
                if hit.t <= cell.t_exit {
                    return Some(hit);
                }
            }
        }
        candidate
    }
}

impl Accelerator for VoxelGrid {
    fn closest_hit<'g>(&self, leaves: &[&'g Geometry], ray: &Ray) -> Option<GeoHit<'g>> {
        let unbounded = ray.closest_hit(
            self.unbounded
                .iter()
                .filter_map(|&i| leaves[i].find_closest(ray)),
        );
        let stop_at = unbounded.map_or(f64::INFINITY, |h| h.t);
        match self.first_hit(leaves, ray, stop_at) {
            Some(hit) => Some(match unbounded {
                Some(u) if u.t < hit.t => u,
                _ => hit,
            }),
            None => unbounded,
        }
    }

    fn occluders<'g>(
        &self,
        leaves: &[&'g Geometry],
        ray: &Ray,
        max_distance: f64,
    ) -> Vec<GeoHit<'g>> {
        self.path_geometries(ray, max_distance)
            .into_iter()
            .flat_map(|i| leaves[i].find_hits(ray, max_distance))
            .collect()
    }
}

fn closer<'g>(current: Option<GeoHit<'g>>, hit: GeoHit<'g>) -> Option<GeoHit<'g>> {
    match current {
        Some(c) if c.t <= hit.t => Some(c),
        _ => Some(hit),
    }
}

/// Give every axis a non-zero extent so voxel edges are never zero.
fn widen_flat_axes(mut b: GridBounds) -> GridBounds {
    for axis in 0..3 {
        if b.max[axis] <= b.min[axis] {
            b.max[axis] = b.min[axis] + 1;
        }
    }
    b
}

impl Region {
    fn new(bounds: GridBounds, resolution: usize) -> Self {
        let origin = bounds.min_point();
        let size = bounds.max_point() - origin;
        Self {
            bounds,
            origin,
            edge: size / resolution as f64,
        }
    }

    /// Inclusive voxel range covered by `b`. A bound lying exactly on a
    /// voxel face is binned into both neighbours.
    fn voxel_span(&self, b: &GridBounds, resolution: usize) -> (VoxelIndex, VoxelIndex) {
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for axis in 0..3 {
            let rel_lo = (b.min[axis] as f64 - self.origin[axis]) / self.edge[axis];
            let rel_hi = (b.max[axis] as f64 - self.origin[axis]) / self.edge[axis];
            lo[axis] = clamp_index(rel_lo.floor(), resolution);
            hi[axis] = clamp_index(rel_hi.floor(), resolution);
        }
        (lo, hi)
    }

    /// Point where `ray` enters the grid and its ray parameter.
    ///
    /// Entry through an edge or corner of the box counts.
    fn entry(&self, ray: &Ray) -> Option<(f64, Point3)> {
        if self.bounds.contains(&ray.origin) {
            return Some((0.0, ray.origin));
        }
        let (t, _) = ray.intersect_bounds(&self.bounds)?;
        Some((t, ray.at(t)))
    }

    /// Push coordinates sitting on the grid boundary slightly inside.
    fn nudge_inside(&self, mut p: Point3) -> Point3 {
        let max = self.bounds.max_point();
        for axis in 0..3 {
            if is_zero(p[axis] - self.origin[axis]) {
                p[axis] += ENTRY_NUDGE;
            } else if is_zero(p[axis] - max[axis]) {
                p[axis] -= ENTRY_NUDGE;
            }
        }
        p
    }
}

fn clamp_index(v: f64, resolution: usize) -> usize {
    if v <= 0.0 {
        0
    } else {
        (v as usize).min(resolution - 1)
    }
}

/// Incremental voxel traversal state.
struct Walk {
    index: [i64; 3],
    step: [i64; 3],
    t_max: [f64; 3],
    t_delta: [f64; 3],
    t_enter: f64,
    resolution: i64,
    done: bool,
}

impl Walk {
    fn finished() -> Self {
        Self {
            index: [0; 3],
            step: [0; 3],
            t_max: [f64::INFINITY; 3],
            t_delta: [f64::INFINITY; 3],
            t_enter: 0.0,
            resolution: 0,
            done: true,
        }
    }

    fn start(region: &Region, resolution: usize, ray: &Ray) -> Self {
        let Some((t_entry, entry)) = region.entry(ray) else {
            return Self::finished();
        };
        let inside = region.nudge_inside(entry);

        let mut walk = Self::finished();
        walk.done = false;
        walk.resolution = resolution as i64;
        walk.t_enter = t_entry;

        for axis in 0..3 {
            let rel = (inside[axis] - region.origin[axis]) / region.edge[axis];
            let idx = clamp_index(rel.floor(), resolution) as i64;
            walk.index[axis] = idx;

            let d = ray.direction[axis];
            let edge = region.edge[axis];
            if is_zero(d) {
                continue;
            }
            let boundary = if d > 0.0 {
                walk.step[axis] = 1;
                region.origin[axis] + (idx + 1) as f64 * edge
            } else {
                walk.step[axis] = -1;
                region.origin[axis] + idx as f64 * edge
            };
            walk.t_max[axis] = t_entry + ((boundary - entry[axis]) / d).max(0.0);
            walk.t_delta[axis] = (edge / d).abs();
        }
        walk
    }
}

impl Iterator for Walk {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.done {
            return None;
        }

        let axis = (0..3)
            .min_by(|&a, &b| self.t_max[a].total_cmp(&self.t_max[b]))
            .unwrap_or(0);
        let cell = Cell {
            index: self.index.map(|i| i as usize),
            t_enter: self.t_enter,
            t_exit: self.t_max[axis],
        };

        self.index[axis] += self.step[axis];
        self.t_enter = self.t_max[axis];
        self.t_max[axis] += self.t_delta[axis];
        if self.step[axis] == 0 || self.index[axis] < 0 || self.index[axis] >= self.resolution {
            self.done = true;
        }
        Some(cell)
    }
}
