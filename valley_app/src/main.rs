//! Headless valley demo
//!
//! Drives the full scene against the tracing device: placeholder shader
//! bytecode, manual frame stepping, a device-loss drill halfway through
//! the run, and a displacement-power sweep. Prints command-stream
//! statistics at the end, so a run doubles as a smoke test of the
//! resource protocol without any GPU present.

use std::sync::Arc;

use log::info;
use serde::Deserialize;

use render_engine::assets::{AssetSources, ByteSource, GridModelSource, MemoryByteSource};
use render_engine::foundation::math::{Mat4, Point3, Vec3};
use render_engine::foundation::time::Timer;
use render_engine::gpu::TraceDevice;
use render_engine::scene::{catalog, CameraFrame, SceneComposer};

/// Demo run parameters, loadable from `valley.ron`
#[derive(Debug, Clone, Deserialize)]
struct AppConfig {
    /// Number of frames to simulate
    #[serde(default = "default_frames")]
    frames: u32,
    /// Meteors in the valley
    #[serde(default = "default_meteor_count")]
    meteor_count: usize,
    /// RNG seed for every randomized spawn
    #[serde(default = "default_seed")]
    seed: u64,
    /// Displacement-power nudge applied during the sweep
    #[serde(default = "default_displacement_step")]
    displacement_step: f32,
}

fn default_frames() -> u32 {
    600
}
fn default_meteor_count() -> usize {
    10
}
fn default_seed() -> u64 {
    20_260_826
}
fn default_displacement_step() -> f32 {
    0.5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            meteor_count: default_meteor_count(),
            seed: default_seed(),
            displacement_step: default_displacement_step(),
        }
    }
}

impl AppConfig {
    fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(config) => {
                    info!("loaded config from {path}");
                    config
                }
                Err(error) => {
                    log::warn!("{path} is not valid config ({error}), using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no {path}, using defaults");
                Self::default()
            }
        }
    }
}

/// Register placeholder bytecode for every shader the catalog names
fn demo_assets() -> AssetSources {
    let mut source = MemoryByteSource::new();
    for name in catalog::shader_manifest() {
        // Any non-empty blob satisfies the tracing device's compiler.
        source.insert(name, vec![0x44, 0x58, 0x42, 0x43]);
    }
    let bytes: Arc<dyn ByteSource> = Arc::new(source);
    AssetSources::new(bytes, Arc::new(GridModelSource::new(50)))
}

fn demo_camera() -> CameraFrame {
    let position = Vec3::new(0.0, 2.0, 9.0);
    let target = Point3::new(0.0, 1.0, 0.0);
    let view = Mat4::look_at_rh(&Point3::from(position), &target, &Vec3::y_axis());
    let projection = Mat4::new_perspective(16.0 / 9.0, std::f32::consts::FRAC_PI_4, 0.1, 200.0);
    CameraFrame {
        view,
        projection,
        position,
    }
}

fn main() {
    env_logger::init();

    let config = AppConfig::load("valley.ron");
    info!("{config:?}");

    let mut device = TraceDevice::new();
    let mut scene = SceneComposer::new(demo_assets(), config.meteor_count, config.seed);
    let mut timer = Timer::new();
    let camera = demo_camera();

    let loss_frame = config.frames / 2;
    let sweep_frames = (config.frames / 10).max(1);

    for frame in 0..config.frames {
        timer.advance(1.0 / 60.0);

        scene.poll_loading(&mut device);
        scene.update(&mut device, timer.delta_time(), timer.total_time());

        // Raise the displacement power early in the run, the way a key
        // press would.
        if frame < sweep_frames {
            scene.adjust_displacement(config.displacement_step);
        }

        // Device-loss drill: everything down, then rebuilt from configs.
        if frame == loss_frame {
            info!("frame {frame}: simulating device loss");
            scene.release_device_resources(&mut device);
            scene.create_device_dependent_resources();
        }

        device.clear_commands();
        scene.render(&mut device, &camera);

        if frame % 120 == 0 {
            info!(
                "frame {frame}: {}/{} entities ready, {} commands this frame",
                scene.ready_count(),
                scene.len(),
                device.commands().len()
            );
        }
    }

    info!(
        "run complete: {} frames, {} draws total, {}/{} entities ready, displacement {:.1}",
        config.frames,
        device.draw_count(),
        scene.ready_count(),
        scene.len(),
        scene.displacement_power()
    );

    scene.release_device_resources(&mut device);
    info!("released: {} live resources remain", device.live_resources());
}
