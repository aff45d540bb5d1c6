//! Built-in demo scenes.

use anyhow::{bail, Result};
use lumen_geom::{Cylinder, Geometry, GlossyBeam, Material, Plane, Polygon, Ray, Sphere, Tube};
use lumen_math::{Color, Dir3, Point3, Vec3};
use lumen_render::{AmbientLight, CameraConfig, DirectionalLight, PointLight, Scene, SpotLight};

/// Names accepted by [`build`].
pub const NAMES: &[&str] = &["spheres", "mirrors", "shadows", "glossy", "primitives"];

/// A demo scene and a camera that frames it.
pub fn build(name: &str) -> Result<(Scene, CameraConfig)> {
    Ok(match name {
        "spheres" => spheres()?,
        "mirrors" => mirrors()?,
        "shadows" => shadows()?,
        "glossy" => glossy()?,
        "primitives" => primitives()?,
        other => bail!("unknown demo {other:?}, expected one of {}", NAMES.join(", ")),
    })
}

fn triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Result<Polygon> {
    Ok(Polygon::triangle(a.into(), b.into(), c.into())?)
}

/// A transparent blue sphere around a red one, lit by a spot light.
fn spheres() -> Result<(Scene, CameraConfig)> {
    let scene = Scene::new("spheres")
        .with_geometry(
            Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -50.0), 50.0)?)
                .with_emission(Color::BLUE)
                .with_material(Material::new().with_kd(0.4).with_ks(0.3).with_kt(0.3).with_shininess(100)),
        )
        .with_geometry(
            Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -50.0), 25.0)?)
                .with_emission(Color::RED)
                .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(100)),
        )
        .with_light(
            SpotLight::new(
                Color::new(1000.0, 600.0, 0.0),
                Point3::new(-100.0, -100.0, 500.0),
                Vec3::new(-1.0, -1.0, -2.0),
            )?
            .with_kl(4e-4)
            .with_kq(2e-7),
        );
    let camera = CameraConfig {
        width: 150.0,
        height: 150.0,
        ..Default::default()
    };
    Ok((scene, camera))
}

/// Two large mirrors meeting at an angle behind a small glowing sphere.
fn mirrors() -> Result<(Scene, CameraConfig)> {
    let mirror = Material::new().with_kr(1.0).with_kd(0.05);
    let scene = Scene::new("mirrors")
        .with_background(Color::new(10.0, 10.0, 20.0))
        .with_geometry(
            Geometry::new(triangle([1500.0, -1500.0, -1500.0], [-1500.0, 1500.0, -1500.0], [670.0, 670.0, 3000.0])?)
                .with_material(mirror),
        )
        .with_geometry(
            Geometry::new(triangle([1500.0, -1500.0, -1500.0], [-1500.0, 1500.0, -1500.0], [-1500.0, -1500.0, -2000.0])?)
                .with_material(mirror),
        )
        .with_geometry(
            Geometry::new(Sphere::new(Point3::new(-950.0, -900.0, -1000.0), 400.0)?)
                .with_emission(Color::new(0.0, 50.0, 100.0))
                .with_material(Material::new().with_kd(0.25).with_ks(0.25).with_shininess(20).with_kt(0.5)),
        )
        .with_geometry(
            Geometry::new(Sphere::new(Point3::new(-950.0, -900.0, -1000.0), 200.0)?)
                .with_emission(Color::new(100.0, 50.0, 20.0))
                .with_material(Material::new().with_kd(0.25).with_ks(0.25).with_shininess(20)),
        )
        .with_light(
            SpotLight::new(Color::new(1020.0, 400.0, 400.0), Point3::new(-750.0, -750.0, -150.0), Vec3::new(-1.0, -1.0, -4.0))?
                .with_kl(1e-5)
                .with_kq(5e-6),
        );
    let camera = CameraConfig {
        width: 2500.0,
        height: 2500.0,
        distance: 10000.0,
        location: Point3::new(0.0, 0.0, 10000.0),
        ..Default::default()
    };
    Ok((scene, camera))
}

/// A transparent sphere casting a partial shadow on an opaque floor.
fn shadows() -> Result<(Scene, CameraConfig)> {
    let scene = Scene::new("shadows")
        .with_ambient(AmbientLight::new(Color::WHITE, 0.15))
        .with_geometry(
            Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -200.0), 60.0)?)
                .with_emission(Color::BLUE)
                .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(30).with_kt(0.6)),
        )
        .with_geometry(
            Geometry::new(triangle([-70.0, -40.0, 0.0], [-40.0, -70.0, 0.0], [-68.0, -68.0, -4.0])?)
                .with_emission(Color::BLUE)
                .with_material(Material::new().with_kd(0.5).with_ks(0.5).with_shininess(30)),
        )
        .with_geometry(
            Geometry::new(Plane::new(Point3::new(0.0, 0.0, -300.0), Vec3::z())?)
                .with_material(Material::new().with_kd(0.8)),
        )
        .with_light(
            SpotLight::new(Color::new(400.0, 240.0, 0.0), Point3::new(-100.0, -100.0, 200.0), Vec3::new(1.0, 1.0, -3.0))?
                .with_kl(1e-5)
                .with_kq(1.5e-7),
        );
    Ok((scene, CameraConfig::default()))
}

/// A blurred mirror floor under a few colored spheres.
fn glossy() -> Result<(Scene, CameraConfig)> {
    let floor = Material::new()
        .with_kd(0.2)
        .with_kr(0.6)
        .with_glossy(GlossyBeam::new(16, 50.0, 3.0)?);
    let mut scene = Scene::new("glossy")
        .with_background(Color::new(20.0, 20.0, 40.0))
        .with_ambient(AmbientLight::new(Color::WHITE, 0.05))
        .with_geometry(Geometry::new(Plane::new(Point3::new(0.0, -50.0, 0.0), Vec3::y())?).with_material(floor))
        .with_light(DirectionalLight::new(Color::new(200.0, 200.0, 180.0), Vec3::new(1.0, -1.0, -1.0))?)
        .with_light(PointLight::new(Color::new(400.0, 400.0, 400.0), Point3::new(0.0, 200.0, 100.0)).with_kl(0.005));
    let colors = [Color::RED, Color::GREEN, Color::BLUE];
    for (i, color) in colors.into_iter().enumerate() {
        scene.add_geometry(
            Geometry::new(Sphere::new(Point3::new(-120.0 + 120.0 * i as f64, -10.0, -150.0), 40.0)?)
                .with_emission(color * 0.3)
                .with_material(Material::new().with_kd(0.5).with_ks(0.4).with_shininess(60)),
        );
    }
    let camera = CameraConfig {
        location: Point3::new(0.0, 60.0, 600.0),
        look_at: Some(Point3::new(0.0, -20.0, -150.0)),
        width: 400.0,
        height: 400.0,
        distance: 800.0,
        ..Default::default()
    };
    Ok((scene, camera))
}

/// One of every surface kind.
fn primitives() -> Result<(Scene, CameraConfig)> {
    let axis = Ray::new(Point3::new(80.0, -60.0, -100.0), Dir3::new_normalize(Vec3::new(0.2, 1.0, 0.1)));
    let shiny = Material::new().with_kd(0.6).with_ks(0.3).with_shininess(40);
    let scene = Scene::new("primitives")
        .with_ambient(AmbientLight::new(Color::WHITE, 0.1))
        .with_geometry(Geometry::new(Sphere::new(Point3::new(-80.0, 0.0, -100.0), 40.0)?).with_emission(Color::new(80.0, 0.0, 0.0)).with_material(shiny))
        .with_geometry(Geometry::new(Cylinder::new(axis, 25.0, 90.0)?).with_emission(Color::new(0.0, 60.0, 0.0)).with_material(shiny))
        .with_geometry(
            Geometry::new(Tube::new(
                Ray::new(Point3::new(0.0, 0.0, -400.0), Dir3::new_normalize(Vec3::x())),
                15.0,
            )?)
            .with_emission(Color::new(40.0, 40.0, 0.0))
            .with_material(shiny),
        )
        .with_geometry(
            Geometry::new(Polygon::new(vec![
                Point3::new(-200.0, -80.0, 0.0),
                Point3::new(200.0, -80.0, 0.0),
                Point3::new(200.0, -80.0, -300.0),
                Point3::new(-200.0, -80.0, -300.0),
            ])?)
            .with_material(Material::new().with_kd(0.5).with_kr(0.3)),
        )
        .with_light(PointLight::new(Color::new(600.0, 600.0, 600.0), Point3::new(0.0, 150.0, 100.0)).with_kl(0.002));
    let camera = CameraConfig {
        location: Point3::new(0.0, 100.0, 500.0),
        look_at: Some(Point3::new(0.0, 0.0, -100.0)),
        width: 300.0,
        height: 300.0,
        distance: 500.0,
        ..Default::default()
    };
    Ok((scene, camera))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_render::{CameraBuilder, FrameBuffer, RayTracer};

    #[test]
    fn test_every_demo_renders() {
        for name in NAMES {
            let (mut scene, camera) = build(name).unwrap();
            scene.build_grid().unwrap();
            let tracer = RayTracer::new(&scene);
            let mut fb = FrameBuffer::new(12, 12);
            CameraBuilder::from_config(&camera)
                .unwrap()
                .threads_code(0)
                .unwrap()
                .image_writer(&mut fb)
                .ray_tracer(&tracer)
                .build()
                .unwrap()
                .render_image()
                .unwrap();
            assert!(fb.pixels().iter().all(Color::is_finite), "{name}");
            assert!(fb.pixels().iter().any(|c| !c.is_black()), "{name}");
        }
    }

    #[test]
    fn test_unknown_demo() {
        assert!(build("teapot").is_err());
    }
}
