//! Serde model of a scene file.
//!
//! Geometries and lights are stored as `{"type": tag, "attributes": {..}}`
//! envelopes. They are kept as raw JSON values until decoding so that an
//! envelope with an unknown tag can be skipped without failing the file.

use crate::error::{Result, SceneError};
use lumen_geom::{
    Cylinder, Geometries, Geometry, GeometryError, Material, Plane, Polygon, Ray, Shape, Sphere,
    Surface, Tube,
};
use lumen_math::{try_normalize, Color, Double3, Point3, Vec3};
use lumen_render::{
    AmbientLight, DirectionalLight, LightSource, PointLight, Scene, SpotLight,
    DEFAULT_GRID_RESOLUTION,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SHAPE_TAGS: &[&str] = &[
    "Sphere",
    "Triangle",
    "Polygon",
    "Plane",
    "Tube",
    "Cylinder",
    "Geometries",
];

const LIGHT_TAGS: &[&str] = &["AmbientLight", "DirectionalLight", "PointLight", "SpotLight"];

/// Top-level scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Scene name.
    #[serde(default)]
    pub name: String,
    /// Color of rays that hit nothing.
    #[serde(default)]
    pub background: Color,
    /// Ambient light.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient: Option<AmbientDto>,
    /// Geometry envelopes.
    #[serde(default)]
    pub geometries: Vec<Value>,
    /// Light envelopes.
    #[serde(default)]
    pub lights: Vec<Value>,
    /// Voxels per grid axis.
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: usize,
}

fn default_grid_resolution() -> usize {
    DEFAULT_GRID_RESOLUTION
}

/// Ambient light as written in a file: base color and factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientDto {
    /// Base color.
    pub intensity: Color,
    /// Scalar or per-channel factor.
    #[serde(default = "Factor::one")]
    pub factor: Factor,
}

/// Either one factor for all channels or one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Factor {
    /// Same factor for every channel.
    Scalar(f64),
    /// Per-channel factor.
    Triple(Double3),
}

impl Factor {
    fn one() -> Self {
        Factor::Scalar(1.0)
    }

    fn triple(self) -> Double3 {
        match self {
            Factor::Scalar(k) => Double3::splat(k),
            Factor::Triple(k) => k,
        }
    }
}

impl From<AmbientDto> for AmbientLight {
    fn from(dto: AmbientDto) -> Self {
        AmbientLight::new(dto.intensity, dto.factor.triple())
    }
}

/// Emission and material shared by every leaf shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Self-emitted radiance.
    #[serde(default)]
    pub emission: Color,
    /// Reflectance parameters.
    #[serde(default)]
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct RayDto {
    origin: Point3,
    direction: Vec3,
}

impl RayDto {
    fn decode(self) -> Result<Ray> {
        let direction = try_normalize(self.direction).map_err(GeometryError::from)?;
        Ok(Ray::new(self.origin, direction))
    }

    fn encode(ray: &Ray) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction.into_inner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SphereDto {
    center: Point3,
    radius: f64,
    #[serde(flatten)]
    look: Appearance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolygonDto {
    vertices: Vec<Point3>,
    #[serde(flatten)]
    look: Appearance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlaneDto {
    point: Point3,
    normal: Vec3,
    #[serde(flatten)]
    look: Appearance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TubeDto {
    axis: RayDto,
    radius: f64,
    #[serde(flatten)]
    look: Appearance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CylinderDto {
    axis: RayDto,
    radius: f64,
    height: f64,
    #[serde(flatten)]
    look: Appearance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompositeDto {
    #[serde(default)]
    children: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes")]
enum ShapeDto {
    Sphere(SphereDto),
    Triangle(PolygonDto),
    Polygon(PolygonDto),
    Plane(PlaneDto),
    Tube(TubeDto),
    Cylinder(CylinderDto),
    Geometries(CompositeDto),
}

impl ShapeDto {
    fn decode(self) -> Result<Shape> {
        let (surface, look): (Surface, Appearance) = match self {
            ShapeDto::Sphere(s) => (Sphere::new(s.center, s.radius)?.into(), s.look),
            ShapeDto::Triangle(t) => {
                if t.vertices.len() != 3 {
                    return Err(SceneError::Invalid(format!(
                        "triangle needs 3 vertices, got {}",
                        t.vertices.len()
                    )));
                }
                (Polygon::new(t.vertices)?.into(), t.look)
            }
            ShapeDto::Polygon(p) => (Polygon::new(p.vertices)?.into(), p.look),
            ShapeDto::Plane(p) => (Plane::new(p.point, p.normal)?.into(), p.look),
            ShapeDto::Tube(t) => (Tube::new(t.axis.decode()?, t.radius)?.into(), t.look),
            ShapeDto::Cylinder(c) => (
                Cylinder::new(c.axis.decode()?, c.radius, c.height)?.into(),
                c.look,
            ),
            ShapeDto::Geometries(c) => {
                return decode_geometries(c.children).map(Shape::Composite);
            }
        };
        if let Some(glossy) = &look.material.glossy {
            glossy.validate()?;
        }
        Ok(Geometry::new(surface)
            .with_emission(look.emission)
            .with_material(look.material)
            .into())
    }

    fn encode(shape: &Shape) -> Result<Self> {
        let g = match shape {
            Shape::Geometry(g) => g,
            Shape::Composite(c) => {
                return Ok(ShapeDto::Geometries(CompositeDto {
                    children: encode_geometries(c)?,
                }));
            }
        };
        let look = Appearance {
            emission: g.emission,
            material: g.material,
        };
        Ok(match &g.surface {
            Surface::Sphere(s) => ShapeDto::Sphere(SphereDto {
                center: s.center,
                radius: s.radius,
                look,
            }),
            Surface::Polygon(p) => {
                let dto = PolygonDto {
                    vertices: p.vertices().to_vec(),
                    look,
                };
                if p.is_triangle() {
                    ShapeDto::Triangle(dto)
                } else {
                    ShapeDto::Polygon(dto)
                }
            }
            Surface::Plane(p) => ShapeDto::Plane(PlaneDto {
                point: p.point,
                normal: p.normal.into_inner(),
                look,
            }),
            Surface::Tube(t) => ShapeDto::Tube(TubeDto {
                axis: RayDto::encode(&t.axis),
                radius: t.radius,
                look,
            }),
            Surface::Cylinder(c) => ShapeDto::Cylinder(CylinderDto {
                axis: RayDto::encode(c.axis()),
                radius: c.radius(),
                height: c.height(),
                look,
            }),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DirectionalDto {
    intensity: Color,
    direction: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PointDto {
    intensity: Color,
    position: Point3,
    #[serde(default = "one")]
    kc: f64,
    #[serde(default)]
    kl: f64,
    #[serde(default)]
    kq: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpotDto {
    #[serde(flatten)]
    point: PointDto,
    direction: Vec3,
    #[serde(default = "one")]
    narrow_beam: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes")]
enum LightDto {
    AmbientLight(AmbientDto),
    DirectionalLight(DirectionalDto),
    PointLight(PointDto),
    SpotLight(SpotDto),
}

/// A decoded light entry: inline ambient lights replace the scene's.
enum LightEntry {
    Ambient(AmbientLight),
    Source(LightSource),
}

impl PointDto {
    fn decode(&self) -> Result<PointLight> {
        let light = PointLight::new(self.intensity, self.position)
            .with_kc(self.kc)
            .with_kl(self.kl)
            .with_kq(self.kq);
        if light.kc == 0.0 && light.kl == 0.0 && light.kq == 0.0 {
            return Err(SceneError::Invalid(format!(
                "light at {:?} has no attenuation (kc, kl and kq are all zero)",
                self.position
            )));
        }
        Ok(light)
    }

    fn encode(p: &PointLight) -> Self {
        Self {
            intensity: p.intensity,
            position: p.position,
            kc: p.kc,
            kl: p.kl,
            kq: p.kq,
        }
    }
}

impl LightDto {
    fn decode(self) -> Result<LightEntry> {
        Ok(match self {
            LightDto::AmbientLight(a) => LightEntry::Ambient(a.into()),
            LightDto::DirectionalLight(d) => {
                LightEntry::Source(DirectionalLight::new(d.intensity, d.direction)?.into())
            }
            LightDto::PointLight(p) => LightEntry::Source(p.decode()?.into()),
            LightDto::SpotLight(s) => {
                let mut spot = SpotLight::new(s.point.intensity, s.point.position, s.direction)?
                    .with_narrow_beam(s.narrow_beam);
                spot.point = s.point.decode()?;
                LightEntry::Source(spot.into())
            }
        })
    }

    fn encode(light: &LightSource) -> Self {
        match light {
            LightSource::Directional(d) => LightDto::DirectionalLight(DirectionalDto {
                intensity: d.intensity,
                direction: d.direction.into_inner(),
            }),
            LightSource::Point(p) => LightDto::PointLight(PointDto::encode(p)),
            LightSource::Spot(s) => LightDto::SpotLight(SpotDto {
                point: PointDto::encode(&s.point),
                direction: s.direction.into_inner(),
                narrow_beam: s.narrow_beam,
            }),
        }
    }
}

/// Tag of an envelope if it is one of `known`; logs and returns `None`
/// otherwise.
fn known_tag<'v>(value: &'v Value, known: &[&str], what: &str) -> Option<&'v str> {
    match value.get("type").and_then(Value::as_str) {
        Some(tag) if known.contains(&tag) => Some(tag),
        Some(tag) => {
            log::warn!("skipping {what} with unknown type {tag:?}");
            None
        }
        None => {
            log::warn!("skipping {what} without a type tag");
            None
        }
    }
}

fn decode_geometries(values: Vec<Value>) -> Result<Geometries> {
    let mut geometries = Geometries::new();
    for value in values {
        if known_tag(&value, SHAPE_TAGS, "geometry").is_none() {
            continue;
        }
        let dto: ShapeDto = serde_json::from_value(value)?;
        geometries.add(dto.decode()?);
    }
    Ok(geometries)
}

fn encode_geometries(geometries: &Geometries) -> Result<Vec<Value>> {
    geometries
        .iter()
        .map(|shape| -> Result<Value> { Ok(serde_json::to_value(ShapeDto::encode(shape)?)?) })
        .collect()
}

impl SceneDocument {
    /// Capture a scene.
    pub fn from_scene(scene: &Scene) -> Result<Self> {
        let lights = scene
            .lights
            .iter()
            .map(|l| serde_json::to_value(LightDto::encode(l)))
            .collect::<serde_json::Result<Vec<_>>>()?;
        let ambient = (!scene.ambient.intensity.is_black()).then(|| AmbientDto {
            intensity: scene.ambient.intensity,
            factor: Factor::one(),
        });
        Ok(Self {
            name: scene.name.clone(),
            background: scene.background,
            ambient,
            geometries: encode_geometries(scene.geometries())?,
            lights,
            grid_resolution: scene.grid_resolution(),
        })
    }

    /// Build the scene. Envelopes with unknown tags are skipped.
    pub fn into_scene(self) -> Result<Scene> {
        let mut scene = Scene::new(self.name)
            .with_background(self.background)
            .with_geometries(decode_geometries(self.geometries)?)
            .with_grid_resolution(self.grid_resolution)
            .map_err(|e| SceneError::Invalid(e.to_string()))?;
        if let Some(ambient) = self.ambient {
            scene.ambient = ambient.into();
        }
        for value in self.lights {
            if known_tag(&value, LIGHT_TAGS, "light").is_none() {
                continue;
            }
            let dto: LightDto = serde_json::from_value(value)?;
            match dto.decode()? {
                LightEntry::Ambient(a) => scene.ambient = a,
                LightEntry::Source(l) => scene.lights.push(l),
            }
        }
        Ok(scene)
    }
}
