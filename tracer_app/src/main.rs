//! Tracer demo application
//!
//! Builds a small scene (ground plane, a parented stack of cubes, two
//! lights), renders it with the snapshot-driven CPU raytracer, writes
//! the result to a PNG, and then demonstrates both picking paths
//! against the rendered frame.

mod config;
mod raytracer;

use config::TracerConfig;
use raytracer::Raytracer;
use vantage::prelude::*;

fn build_scene(viewport: &mut Viewport) {
    let scene = viewport.scene_mut();

    let ground = Mesh::plane(6.0).with_material(Material::new().with_color(0.4, 0.45, 0.4));
    scene.add_mesh(ground);

    let mut base = Mesh::cuboid(Vec3::new(1.0, 0.5, 1.0))
        .with_material(Material::new().with_color(0.8, 0.3, 0.2));
    base.set_translation(Vec3::new(0.0, 0.5, 0.0));
    let base = scene.add_mesh(base);

    let mut top =
        Mesh::unit_cube().with_material(Material::new().with_color(0.2, 0.4, 0.8).with_metallic(0.3));
    top.set_translation(Vec3::new(0.0, 1.0, 0.0));
    let top = scene.add_mesh(top);

    // The small cube rides the base: moving the base moves both
    if let Err(e) = scene.set_parent(top, base) {
        log::error!("failed to parent stack: {e}");
    }

    scene.add_light(Light::directional(
        Vec3::new(-0.5, -1.0, -0.3),
        Vec3::new(1.0, 0.95, 0.85),
        0.9,
    ));
    scene.add_light(Light::point(
        Vec3::new(3.0, 4.0, 3.0),
        Vec3::new(0.9, 0.9, 1.0),
        0.6,
        20.0,
    ));
}

fn save_png(backend: &Raytracer, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let buffer = image::RgbImage::from_raw(
        backend.width(),
        backend.height(),
        backend.color_plane().to_vec(),
    )
    .ok_or("color plane size mismatch")?;
    buffer.save(path)?;
    log::info!("wrote {path}");
    Ok(())
}

fn run(config: &TracerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut viewport = Viewport::new(config.width, config.height);
    viewport
        .camera_mut()
        .set_position(Vec3::from(config.camera.position));
    viewport
        .camera_mut()
        .look_at(Vec3::from(config.camera.target), Vec3::y());
    viewport.camera_mut().fov = config.camera.fov_degrees.to_radians();

    build_scene(&mut viewport);
    log::info!(
        "scene built: {} meshes, {} triangles, {} visible",
        viewport.scene().mesh_count(),
        viewport.scene().triangle_count(),
        viewport.visible_mesh_count()
    );

    let mut backend = Raytracer::new();
    viewport.render(&mut backend)?;
    save_png(&backend, &config.output)?;

    // Both picking paths answered from the same frame: the O(1) buffer
    // lookup and the CPU raycast through the same pixel
    let (cx, cy) = (config.width / 2, config.height / 2);
    let pick = viewport.pick_by_id(cx, cy);
    let hit = viewport.raycast_pixel(cx as f32, cy as f32);
    log::info!(
        "center pixel: id-buffer pick {:?} at depth {:.3}, raycast object {} at distance {:.3}",
        pick.hit.then_some(pick.object_id),
        pick.depth,
        hit.object_id,
        hit.distance
    );
    if pick.hit && hit.hit {
        assert_eq!(pick.object_id, hit.object_id);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TracerConfig::load_from_file(&path)?,
        None => TracerConfig::default(),
    };
    log::info!(
        "starting tracer demo at {}x{} -> {}",
        config.width,
        config.height,
        config.output
    );

    run(&config)
}
