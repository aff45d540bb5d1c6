#![warn(missing_docs)]

//! JSON scene files for the lumen ray tracer.
//!
//! A scene file holds the background, ambient light, grid resolution and
//! lists of geometry and light envelopes:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "background": { "r": 0.0, "g": 0.0, "b": 0.0 },
//!   "ambient": { "intensity": { "r": 255.0, "g": 255.0, "b": 255.0 }, "factor": 0.1 },
//!   "geometries": [
//!     { "type": "Sphere", "attributes": { "center": [0.0, 0.0, -3.0], "radius": 1.0 } }
//!   ],
//!   "lights": [],
//!   "gridResolution": 10
//! }
//! ```
//!
//! Envelopes whose `type` is not recognized are skipped with a warning.

mod document;
mod error;

pub use document::{AmbientDto, Appearance, Factor, SceneDocument};
pub use error::{Result, SceneError};

use lumen_render::Scene;
use std::path::Path;

/// Parse a scene from JSON text.
pub fn from_str(json: &str) -> Result<Scene> {
    let document: SceneDocument = serde_json::from_str(json)?;
    document.into_scene()
}

/// Serialize a scene to pretty-printed JSON.
pub fn to_string(scene: &Scene) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SceneDocument::from_scene(scene)?)?)
}

/// Read a scene file.
pub fn read(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let scene = from_str(&std::fs::read_to_string(path)?)?;
    log::info!(
        "read scene {:?} from {}: {} geometries, {} lights",
        scene.name,
        path.display(),
        scene.leaves().len(),
        scene.lights.len()
    );
    Ok(scene)
}

/// Write a scene file, creating parent directories as needed.
pub fn write(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_string(scene)?)?;
    log::info!("wrote scene {:?} to {}", scene.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_geom::{
        Cylinder, Geometries, Geometry, GlossyBeam, Material, Plane, Polygon, Ray, Shape, Sphere,
        Surface, Tube,
    };
    use lumen_math::{Color, Dir3, Point3, Vec3};
    use lumen_render::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};

    fn full_scene() -> Scene {
        let axis = Ray::new(Point3::new(5.0, 0.0, 0.0), Dir3::new_normalize(Vec3::y()));
        Scene::new("everything")
            .with_background(Color::new(1.0, 2.0, 3.0))
            .with_ambient(AmbientLight::new(Color::new(100.0, 100.0, 100.0), 0.2))
            .with_geometry(
                Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0).unwrap())
                    .with_emission(Color::BLUE)
                    .with_material(
                        Material::new()
                            .with_kd(0.4)
                            .with_ks([0.1, 0.2, 0.3])
                            .with_shininess(50)
                            .with_glossy(GlossyBeam::new(9, 2.0, 0.5).unwrap()),
                    ),
            )
            .with_geometry(Geometry::new(
                Polygon::triangle(
                    Point3::new(-1.0, -1.0, -2.0),
                    Point3::new(1.0, -1.0, -2.0),
                    Point3::new(0.0, 1.0, -2.0),
                )
                .unwrap(),
            ))
            .with_geometry(
                Geometries::new()
                    .with(Geometry::new(
                        Plane::new(Point3::new(0.0, -5.0, 0.0), Vec3::y()).unwrap(),
                    ))
                    .with(Geometry::new(
                        Polygon::new(vec![
                            Point3::new(0.0, 0.0, 0.0),
                            Point3::new(1.0, 0.0, 0.0),
                            Point3::new(1.0, 1.0, 0.0),
                            Point3::new(0.0, 1.0, 0.0),
                        ])
                        .unwrap(),
                    )),
            )
            .with_geometry(Geometry::new(Tube::new(axis, 0.5).unwrap()))
            .with_geometry(
                Geometry::new(Cylinder::new(axis, 0.5, 2.0).unwrap())
                    .with_material(Material::new().with_kt(0.5)),
            )
            .with_light(DirectionalLight::new(Color::WHITE, Vec3::new(0.0, -1.0, 0.0)).unwrap())
            .with_light(
                PointLight::new(Color::RED, Point3::new(1.0, 2.0, 3.0))
                    .with_kl(0.01)
                    .with_kq(0.001),
            )
            .with_light(
                SpotLight::new(Color::GREEN, Point3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0))
                    .unwrap()
                    .with_kl(0.1)
                    .with_narrow_beam(4.0),
            )
            .with_grid_resolution(7)
            .unwrap()
    }

    #[test]
    fn test_round_trip_keeps_everything() {
        let scene = full_scene();
        let json = to_string(&scene).unwrap();
        let back = from_str(&json).unwrap();

        assert_eq!(back.name, "everything");
        assert_eq!(back.background, scene.background);
        assert_eq!(back.ambient, scene.ambient);
        assert_eq!(back.grid_resolution(), 7);
        assert_eq!(back.geometries(), scene.geometries());
        assert_eq!(back.lights, scene.lights);
    }

    #[test]
    fn test_envelope_format() {
        let json = to_string(&full_scene()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let tags: Vec<&str> = value["geometries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["type"].as_str().unwrap())
            .collect();
        assert_eq!(tags, ["Sphere", "Triangle", "Geometries", "Tube", "Cylinder"]);
        assert_eq!(value["geometries"][0]["attributes"]["radius"], 1.0);
        assert_eq!(value["geometries"][0]["attributes"]["emission"]["b"], 255.0);
        assert_eq!(value["gridResolution"], 7);
        assert_eq!(value["lights"][2]["type"], "SpotLight");
        assert_eq!(value["lights"][2]["attributes"]["narrowBeam"], 4.0);
    }

    #[test]
    fn test_unknown_tags_are_skipped() {
        let json = r#"{
            "geometries": [
                { "type": "Torus", "attributes": { "radius": 1.0 } },
                { "type": "Sphere", "attributes": { "center": [0, 0, -3], "radius": 1 } },
                { "attributes": {} }
            ],
            "lights": [
                { "type": "AreaLight", "attributes": {} },
                { "type": "AmbientLight", "attributes": { "intensity": { "r": 10, "g": 20, "b": 30 }, "factor": 0.5 } },
                { "type": "PointLight", "attributes": { "intensity": { "r": 1, "g": 1, "b": 1 }, "position": [0, 1, 0] } }
            ]
        }"#;
        let scene = from_str(json).unwrap();
        assert_eq!(scene.leaves().len(), 1);
        assert!(matches!(
            scene.geometries().iter().next(),
            Some(Shape::Geometry(g)) if matches!(g.surface, Surface::Sphere(_))
        ));
        assert_eq!(scene.ambient.intensity, Color::new(5.0, 10.0, 15.0));
        assert_eq!(scene.lights.len(), 1);
        match scene.lights[0] {
            LightSource::Point(p) => assert_eq!(p.kc, 1.0),
            other => panic!("expected a point light, got {other:?}"),
        }
        assert_eq!(scene.grid_resolution(), 10);
        assert_eq!(scene.background, Color::BLACK);
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        let bad_radius = r#"{ "geometries": [ { "type": "Sphere", "attributes": { "center": [0, 0, 0], "radius": -1 } } ] }"#;
        assert!(matches!(from_str(bad_radius), Err(SceneError::Geometry(_))));

        let quad_triangle = r#"{ "geometries": [ { "type": "Triangle", "attributes": {
            "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]] } } ] }"#;
        assert!(matches!(from_str(quad_triangle), Err(SceneError::Invalid(_))));

        let missing = r#"{ "geometries": [ { "type": "Plane", "attributes": { "point": [0, 0, 0] } } ] }"#;
        assert!(matches!(from_str(missing), Err(SceneError::Json(_))));

        let zero_grid = r#"{ "gridResolution": 0 }"#;
        assert!(matches!(from_str(zero_grid), Err(SceneError::Invalid(_))));

        assert!(matches!(from_str("{"), Err(SceneError::Json(_))));
    }

    #[test]
    fn test_negative_colors_clamp_on_load() {
        let json = r#"{
            "background": { "r": -5, "g": 10, "b": -1 },
            "geometries": [
                { "type": "Sphere", "attributes": { "center": [0, 0, -3], "radius": 1,
                  "emission": { "r": 20, "g": -30, "b": 0 } } }
            ]
        }"#;
        let scene = from_str(json).unwrap();
        assert_eq!(scene.background, Color::new(0.0, 10.0, 0.0));
        assert_eq!(scene.leaves()[0].emission, Color::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn test_unattenuated_lights_rejected() {
        let point = r#"{ "lights": [ { "type": "PointLight", "attributes": {
            "intensity": { "r": 1, "g": 1, "b": 1 }, "position": [0, 1, 0], "kc": 0 } } ] }"#;
        assert!(matches!(from_str(point), Err(SceneError::Invalid(_))));

        let spot = r#"{ "lights": [ { "type": "SpotLight", "attributes": {
            "intensity": { "r": 1, "g": 1, "b": 1 }, "position": [0, 1, 0], "direction": [0, -1, 0],
            "kc": 0, "kl": -2, "kq": 0 } } ] }"#;
        assert!(matches!(from_str(spot), Err(SceneError::Invalid(_))));

        let linear_only = r#"{ "lights": [ { "type": "PointLight", "attributes": {
            "intensity": { "r": 1, "g": 1, "b": 1 }, "position": [0, 1, 0], "kc": 0, "kl": 0.5 } } ] }"#;
        assert_eq!(from_str(linear_only).unwrap().lights.len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("full.json");
        let scene = full_scene();
        write(&scene, &path).unwrap();
        let back = read(&path).unwrap();
        assert_eq!(back.geometries(), scene.geometries());

        assert!(matches!(read(dir.path().join("missing.json")), Err(SceneError::Io(_))));
    }
}
