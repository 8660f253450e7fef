//! Scene composition and the per-frame drive loop
//!
//! [`SceneComposer`] owns every entity in a fixed order, sweeps their
//! loading once per frame, pushes camera state into each before its
//! draw, and applies the valley's one piece of gameplay: meteors that
//! hit the ground respawn at a fresh randomized point, re-entering the
//! loading phase like a newly constructed entity.

pub mod catalog;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::assets::AssetSources;
use crate::foundation::math::{Mat4, Vec3};
use crate::gpu::GpuDevice;
use crate::render::Renderable;

/// Minimum and maximum displacement power the scene allows
const DISPLACEMENT_RANGE: (f32, f32) = (1.0, 10.0);

/// Camera state supplied by the application shell each frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// View matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
    /// Camera position in world space
    pub position: Vec3,
}

impl CameraFrame {
    /// Inverse of the view matrix, identity if the view is singular
    #[must_use]
    pub fn inverse_view(&self) -> Mat4 {
        self.view.try_inverse().unwrap_or_else(Mat4::identity)
    }
}

/// The valley scene: all entities, their update/render order, and the
/// meteor respawn rule
pub struct SceneComposer {
    entities: Vec<Renderable>,
    meteor_range: std::ops::Range<usize>,
    assets: AssetSources,
    rng: SmallRng,
    displacement_power: f32,
}

impl SceneComposer {
    /// Build the full catalog scene with `meteor_count` meteors
    ///
    /// The seed fixes every randomized spawn, so a run is reproducible.
    #[must_use]
    pub fn new(assets: AssetSources, meteor_count: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut entities = vec![
            Renderable::new(catalog::star_sky(), assets.clone()),
            Renderable::new(catalog::wireframe_sphere(), assets.clone()),
            Renderable::new(catalog::view_dependent_sphere(), assets.clone()),
            Renderable::new(catalog::bump_sphere(), assets.clone()),
            Renderable::new(catalog::terrain(), assets.clone()),
            Renderable::new(catalog::rock_field(), assets.clone()),
            Renderable::new(catalog::pottery(), assets.clone()),
        ];

        let meteor_start = entities.len();
        for _ in 0..meteor_count {
            entities.push(Renderable::new(catalog::meteor(&mut rng), assets.clone()));
        }
        let meteor_range = meteor_start..entities.len();

        entities.push(Renderable::new(catalog::alien(0), assets.clone()));
        entities.push(Renderable::new(catalog::alien(1), assets.clone()));
        entities.push(Renderable::new(catalog::ray_march_quad(), assets.clone()));
        entities.push(Renderable::new(
            catalog::ray_traced_sphere_cube(),
            assets.clone(),
        ));
        entities.push(Renderable::new(catalog::ray_traced_terrain(), assets.clone()));

        info!(
            "scene composed: {} entities ({} meteors)",
            entities.len(),
            meteor_count
        );

        Self {
            entities,
            meteor_range,
            assets,
            rng,
            displacement_power: DISPLACEMENT_RANGE.0,
        }
    }

    /// Sweep every entity's loading once; failed entities stay dormant
    pub fn poll_loading(&mut self, device: &mut dyn GpuDevice) {
        for entity in &mut self.entities {
            if let Err(error) = entity.poll_loading(device) {
                warn!("'{}' left the scene: {error}", entity.label());
            }
        }
    }

    /// Advance motion and apply the meteor ground-respawn rule
    ///
    /// A meteor whose height drops below ground is released, removed,
    /// and replaced by a freshly randomized one that re-enters loading
    /// like any new entity. Per-entity motion itself never touches the
    /// device; it is only needed here to reclaim the removed meteor's
    /// resources.
    pub fn update(&mut self, device: &mut dyn GpuDevice, delta_seconds: f32, total_seconds: f32) {
        for entity in &mut self.entities {
            entity.update(delta_seconds, total_seconds);
        }

        for index in self.meteor_range.clone() {
            if self.entities[index].transform().position.y < 0.0 {
                self.entities[index].release(device);
                self.entities[index] =
                    Renderable::new(catalog::meteor(&mut self.rng), self.assets.clone());
            }
        }
    }

    /// Push camera state into every entity and draw the ready ones
    pub fn render(&mut self, device: &mut dyn GpuDevice, camera: &CameraFrame) {
        let inverse_view = camera.inverse_view();
        for entity in &mut self.entities {
            entity.set_view_projection(&camera.view, &camera.projection);
            entity.set_camera_position(camera.position);
            entity.set_inverse_view(&inverse_view);
            entity.set_scalar(self.displacement_power);
            entity.render(device);
        }
    }

    /// Nudge the displacement power, clamped to the scene's range
    pub fn adjust_displacement(&mut self, delta: f32) {
        self.displacement_power =
            (self.displacement_power + delta).clamp(DISPLACEMENT_RANGE.0, DISPLACEMENT_RANGE.1);
    }

    /// Current displacement power
    #[must_use]
    pub fn displacement_power(&self) -> f32 {
        self.displacement_power
    }

    /// Device-loss phase 1: drop every entity's device resources
    pub fn release_device_resources(&mut self, device: &mut dyn GpuDevice) {
        info!("releasing device resources for {} entities", self.entities.len());
        for entity in &mut self.entities {
            entity.release(device);
        }
    }

    /// Device-loss phase 2: rebuild every entity from its config
    pub fn create_device_dependent_resources(&mut self) {
        info!("recreating device resources for {} entities", self.entities.len());
        for entity in &mut self.entities {
            entity.create_device_dependent_resources();
        }
    }

    /// Number of entities currently ready to draw
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.entities.iter().filter(|entity| entity.is_ready()).count()
    }

    /// Total entity count
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the scene holds no entities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities in update/render order
    #[must_use]
    pub fn entities(&self) -> &[Renderable] {
        &self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use crate::assets::{ByteSource, GridModelSource, MemoryByteSource};
    use crate::gpu::TraceDevice;

    fn demo_assets() -> AssetSources {
        let mut source = MemoryByteSource::new();
        for name in catalog::shader_manifest() {
            source.insert(name, vec![0xCD; 32]);
        }
        let bytes: Arc<dyn ByteSource> = Arc::new(source);
        AssetSources::new(bytes, Arc::new(GridModelSource::new(8)))
    }

    fn pump_scene(scene: &mut SceneComposer, device: &mut TraceDevice) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while scene.ready_count() < scene.len() {
            scene.poll_loading(device);
            assert!(Instant::now() < deadline, "scene never finished loading");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn test_camera() -> CameraFrame {
        CameraFrame {
            view: Mat4::new_translation(&Vec3::new(0.0, -1.5, -8.0)),
            projection: Mat4::identity(),
            position: Vec3::new(0.0, 1.5, 8.0),
        }
    }

    #[test]
    fn test_scene_loads_and_draws_every_entity() {
        let mut device = TraceDevice::new();
        let mut scene = SceneComposer::new(demo_assets(), 3, 7);
        assert_eq!(scene.len(), 15); // 7 fixed + 3 meteors + 5 fixed

        pump_scene(&mut scene, &mut device);
        scene.update(&mut device, 0.016, 0.016);
        scene.render(&mut device, &test_camera());

        assert_eq!(device.draw_count(), 15);
    }

    #[test]
    fn test_grounded_meteor_respawns_and_reloads() {
        let mut device = TraceDevice::new();
        let mut scene = SceneComposer::new(demo_assets(), 2, 7);
        pump_scene(&mut scene, &mut device);

        let meteor_index = scene.meteor_range.start;
        let live_before = device.live_resources();
        scene.entities[meteor_index].transform_mut().position.y = -0.1;

        scene.update(&mut device, 0.016, 1.0);

        let meteor = &scene.entities[meteor_index];
        assert!(!meteor.is_ready(), "respawned meteor re-enters loading");
        assert!(meteor.transform().position.y >= 2.0);
        assert!(
            device.live_resources() < live_before,
            "the grounded meteor's resources are reclaimed"
        );

        pump_scene(&mut scene, &mut device);
        assert!(scene.entities[meteor_index].is_ready());
    }

    #[test]
    fn test_device_loss_drill_restores_the_whole_scene() {
        let mut device = TraceDevice::new();
        let mut scene = SceneComposer::new(demo_assets(), 2, 7);
        pump_scene(&mut scene, &mut device);

        scene.release_device_resources(&mut device);
        assert_eq!(scene.ready_count(), 0);
        assert_eq!(device.live_resources(), 0);

        scene.create_device_dependent_resources();
        pump_scene(&mut scene, &mut device);
        assert_eq!(scene.ready_count(), scene.len());

        scene.render(&mut device, &test_camera());
        assert_eq!(device.draw_count(), scene.len() as u64);
    }

    #[test]
    fn test_displacement_power_clamps_to_range() {
        use approx::assert_relative_eq;

        let mut scene = SceneComposer::new(demo_assets(), 0, 7);
        assert_relative_eq!(scene.displacement_power(), 1.0);

        scene.adjust_displacement(100.0);
        assert_relative_eq!(scene.displacement_power(), 10.0);

        scene.adjust_displacement(-100.0);
        assert_relative_eq!(scene.displacement_power(), 1.0);
    }
}
