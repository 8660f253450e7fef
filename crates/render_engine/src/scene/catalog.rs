//! The valley scene catalog
//!
//! Twelve entity configurations covering every pipeline shape the
//! protocol supports, from a plain vertex/pixel quad to a five-stage
//! tessellated, textured meteor. Each is pure data interpreted by
//! [`Renderable`](crate::render::Renderable); the geometry generators
//! live alongside so a config and its mesh cannot drift apart.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::foundation::math::{Transform, Vec3};
use crate::gpu::{PrimitiveTopology, RasterizerDesc, Stage, StageSet};
use crate::render::config::{EntityConfig, Motion, TextureBinding};
use crate::render::constants::{ConstantSpec, PayloadKind};
use crate::render::mesh::{MeshData, MeshSource};
use crate::render::vertex::{VertexFormat, VertexPosition, VertexPositionColor};

/// Number of stars in the sky dome
pub const STAR_COUNT: usize = 200;

/// Rock-field grid points per side
const ROCK_GRID_SIDE: u32 = 51;

// --- geometry generators ---------------------------------------------------

/// Random points on a far sphere, expanded to sprites by the geometry stage
fn star_sky_mesh() -> MeshData {
    // Fixed seed: the sky is part of the scene, not of the RNG stream.
    let mut rng = SmallRng::seed_from_u64(0x5747_4C4F);
    let mut vertices = Vec::with_capacity(STAR_COUNT);
    for _ in 0..STAR_COUNT {
        let theta = rng.gen_range(0.0..std::f32::consts::TAU);
        let phi = rng.gen_range(0.05..std::f32::consts::FRAC_PI_2);
        let radius = 50.0;
        let brightness = rng.gen_range(0.4..1.0);
        vertices.push(VertexPositionColor {
            position: [
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ],
            color: [brightness, brightness, brightness],
        });
    }
    let indices = (0..vertices.len() as u32).collect();
    MeshData::from_vertices(&vertices, indices)
}

/// Jittered grid of points scattered over the terrain footprint
fn rock_field_mesh() -> MeshData {
    let mut rng = SmallRng::seed_from_u64(0x524F_434B);
    let side = ROCK_GRID_SIDE;
    let mut vertices = Vec::with_capacity((side * side) as usize);
    for row in 0..side {
        for col in 0..side {
            let x = (col as f32 / (side - 1) as f32 - 0.5) * 40.0;
            let z = (row as f32 / (side - 1) as f32 - 0.5) * 40.0;
            vertices.push(VertexPosition {
                position: [
                    x + rng.gen_range(-0.3..0.3),
                    0.0,
                    z + rng.gen_range(-0.3..0.3),
                ],
            });
        }
    }
    let indices = (0..vertices.len() as u32).collect();
    MeshData::from_vertices(&vertices, indices)
}

/// Six cube faces as 4-control-point patches; the domain stage inflates
/// them into a sphere
fn sphere_patch_positions() -> Vec<[f32; 3]> {
    let mut corners = Vec::with_capacity(24);
    for &(axis, sign) in &[
        (0_usize, 1.0_f32),
        (0, -1.0),
        (1, 1.0),
        (1, -1.0),
        (2, 1.0),
        (2, -1.0),
    ] {
        for &(u, v) in &[(-1.0_f32, 1.0_f32), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
            let mut position = [0.0_f32; 3];
            position[axis] = sign;
            position[(axis + 1) % 3] = u * sign;
            position[(axis + 2) % 3] = v;
            corners.push(position);
        }
    }
    corners
}

fn sphere_patch_mesh_colored() -> MeshData {
    let face_colors = [
        [1.0, 0.4, 0.4],
        [0.4, 1.0, 0.4],
        [0.4, 0.4, 1.0],
        [1.0, 1.0, 0.4],
        [0.4, 1.0, 1.0],
        [1.0, 0.4, 1.0],
    ];
    let vertices: Vec<VertexPositionColor> = sphere_patch_positions()
        .into_iter()
        .enumerate()
        .map(|(i, position)| VertexPositionColor {
            position,
            color: face_colors[i / 4],
        })
        .collect();
    let indices = (0..vertices.len() as u32).collect();
    MeshData::from_vertices(&vertices, indices)
}

/// Lathe surface: bicubic patches revolved around the y axis
fn pottery_mesh() -> MeshData {
    // Profile radii at four heights, a classic pot silhouette
    let profile = [(0.0_f32, 0.30_f32), (0.33, 0.50), (0.66, 0.20), (1.0, 0.25)];
    let segments = 4_u32;
    let mut vertices = Vec::with_capacity((segments * 16) as usize);

    for segment in 0..segments {
        let base_angle = segment as f32 * std::f32::consts::FRAC_PI_2;
        for &(height, radius) in &profile {
            for step in 0..4_u32 {
                let angle = base_angle + step as f32 * std::f32::consts::FRAC_PI_6;
                vertices.push(VertexPosition {
                    position: [radius * angle.cos(), height, radius * angle.sin()],
                });
            }
        }
    }
    let indices = (0..vertices.len() as u32).collect();
    MeshData::from_vertices(&vertices, indices)
}

/// One quad patch; the tessellator carves the meteor's silhouette
fn meteor_mesh() -> MeshData {
    let vertices = [
        VertexPosition { position: [-0.2, 0.0, 0.2] },
        VertexPosition { position: [0.2, 0.0, 0.2] },
        VertexPosition { position: [-0.2, 0.0, -0.2] },
        VertexPosition { position: [0.2, 0.0, -0.2] },
    ];
    MeshData::from_vertices(&vertices, vec![0, 1, 2, 3])
}

/// Unit quad in the xy plane, two triangles
fn quad_mesh() -> MeshData {
    let vertices = [
        VertexPosition { position: [-0.5, 0.5, 0.0] },
        VertexPosition { position: [0.5, 0.5, 0.0] },
        VertexPosition { position: [-0.5, -0.5, 0.0] },
        VertexPosition { position: [0.5, -0.5, 0.0] },
    ];
    MeshData::from_vertices(&vertices, vec![0, 1, 2, 3, 2, 1])
}

/// Unit cube used as the proxy volume for ray-traced pixel shaders
fn cube_mesh() -> MeshData {
    let mut vertices = Vec::with_capacity(8);
    for &y in &[-0.5_f32, 0.5] {
        for &z in &[-0.5_f32, 0.5] {
            for &x in &[-0.5_f32, 0.5] {
                vertices.push(VertexPosition { position: [x, y, z] });
            }
        }
    }
    let indices = vec![
        0, 4, 5, 0, 5, 1, // bottom/top split per face below
        2, 7, 6, 2, 3, 7, //
        0, 2, 6, 0, 6, 4, //
        1, 5, 7, 1, 7, 3, //
        0, 1, 3, 0, 3, 2, //
        4, 6, 7, 4, 7, 5, //
    ];
    MeshData::from_vertices(&vertices, indices)
}

// --- entity configurations -------------------------------------------------

/// Point-sprite star dome on the far sphere
#[must_use]
pub fn star_sky() -> EntityConfig {
    EntityConfig {
        label: "star sky",
        shader_base: "StarSky",
        stages: StageSet::VERTEX | StageSet::GEOMETRY | StageSet::PIXEL,
        topology: PrimitiveTopology::PointList,
        vertex_format: VertexFormat::PositionColor,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![ConstantSpec::new(
            PayloadKind::Mvp,
            &[(Stage::Vertex, 0), (Stage::Geometry, 0)],
        )],
        texture: None,
        mesh: MeshSource::Inline(star_sky_mesh),
        motion: Motion::Static,
        transform: Transform::identity(),
    }
}

/// Scattered rocks grown from grid points by the geometry stage
#[must_use]
pub fn rock_field() -> EntityConfig {
    EntityConfig {
        label: "rock field",
        shader_base: "RockField",
        stages: StageSet::VERTEX | StageSet::GEOMETRY | StageSet::PIXEL,
        topology: PrimitiveTopology::PointList,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(
                PayloadKind::Mvp,
                &[(Stage::Vertex, 0), (Stage::Pixel, 0), (Stage::Geometry, 0)],
            ),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Geometry, 2)]),
        ],
        texture: None,
        mesh: MeshSource::Inline(rock_field_mesh),
        motion: Motion::Static,
        transform: Transform::identity(),
    }
}

/// Tessellated, displaced valley floor loaded through the model collaborator
#[must_use]
pub fn terrain() -> EntityConfig {
    EntityConfig {
        label: "terrain",
        shader_base: "Terrain",
        stages: StageSet::VERTEX | StageSet::HULL | StageSet::DOMAIN | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList3,
        vertex_format: VertexFormat::Full,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(
                PayloadKind::Mvp,
                &[(Stage::Vertex, 0), (Stage::Pixel, 0), (Stage::Domain, 0)],
            ),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Pixel, 1), (Stage::Domain, 1)]),
        ],
        texture: None,
        mesh: MeshSource::Model("terrain"),
        motion: Motion::Static,
        transform: Transform::new(
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::new(40.0, 1.0, 40.0),
        ),
    }
}

/// Tessellated sphere shown as raw wireframe patches
#[must_use]
pub fn wireframe_sphere() -> EntityConfig {
    EntityConfig {
        label: "wireframe sphere",
        shader_base: "WireSphere",
        stages: StageSet::VERTEX | StageSet::HULL | StageSet::DOMAIN | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList4,
        vertex_format: VertexFormat::PositionColor,
        rasterizer: RasterizerDesc::wireframe(),
        constants: vec![ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Domain, 0)])],
        texture: None,
        mesh: MeshSource::Inline(sphere_patch_mesh_colored),
        motion: Motion::Spin(Vec3::new(0.0, 0.2, 0.0)),
        transform: Transform::from_position(Vec3::new(-2.5, 1.0, 0.0)),
    }
}

/// Sphere whose tessellation density follows the camera distance
#[must_use]
pub fn view_dependent_sphere() -> EntityConfig {
    EntityConfig {
        label: "view-dependent sphere",
        shader_base: "ViewSphere",
        stages: StageSet::VERTEX | StageSet::HULL | StageSet::DOMAIN | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList4,
        vertex_format: VertexFormat::PositionColor,
        rasterizer: RasterizerDesc::wireframe(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Vertex, 0), (Stage::Domain, 0)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Vertex, 1)]),
        ],
        texture: None,
        mesh: MeshSource::Inline(sphere_patch_mesh_colored),
        motion: Motion::Spin(Vec3::new(0.0, -0.2, 0.0)),
        transform: Transform::from_position(Vec3::new(2.5, 1.0, 0.0)),
    }
}

/// Displacement-mapped sphere driven by the adjustable power scalar
#[must_use]
pub fn bump_sphere() -> EntityConfig {
    EntityConfig {
        label: "bump-map sphere",
        shader_base: "BumpSphere",
        stages: StageSet::VERTEX
            | StageSet::HULL
            | StageSet::DOMAIN
            | StageSet::GEOMETRY
            | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList4,
        vertex_format: VertexFormat::PositionColor,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Domain, 0)]),
            ConstantSpec::new(PayloadKind::Scalar, &[(Stage::Domain, 1)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Pixel, 0)]),
        ],
        texture: Some(TextureBinding {
            file: "earth.dds",
            stage: Stage::Pixel,
            slot: 0,
        }),
        mesh: MeshSource::Inline(sphere_patch_mesh_colored),
        motion: Motion::Spin(Vec3::new(0.0, 0.1, 0.0)),
        transform: Transform::from_position(Vec3::new(0.0, 1.5, 0.0)),
    }
}

/// Bicubic lathe pot
#[must_use]
pub fn pottery() -> EntityConfig {
    EntityConfig {
        label: "pottery",
        shader_base: "Pottery",
        stages: StageSet::VERTEX
            | StageSet::HULL
            | StageSet::DOMAIN
            | StageSet::GEOMETRY
            | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList16,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Domain, 0)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Domain, 1), (Stage::Pixel, 0)]),
        ],
        texture: Some(TextureBinding {
            file: "pottery.dds",
            stage: Stage::Pixel,
            slot: 0,
        }),
        mesh: MeshSource::Inline(pottery_mesh),
        motion: Motion::Static,
        transform: Transform::from_position(Vec3::new(1.0, 0.0, 1.5)),
    }
}

/// One falling meteor with a randomized spawn point and velocity
pub fn meteor(rng: &mut impl Rng) -> EntityConfig {
    let position = Vec3::new(
        rng.gen_range(-4.0..4.0),
        rng.gen_range(2.0..3.5),
        rng.gen_range(-4.0..4.0),
    );
    let velocity = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-0.5..-0.2),
        rng.gen_range(-1.0..1.0),
    );

    EntityConfig {
        label: "meteor",
        shader_base: "Meteor",
        stages: StageSet::VERTEX
            | StageSet::HULL
            | StageSet::DOMAIN
            | StageSet::GEOMETRY
            | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList4,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Domain, 0)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Domain, 1), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::Time, &[(Stage::Domain, 2)]),
        ],
        texture: Some(TextureBinding {
            file: "lava_rock.dds",
            stage: Stage::Pixel,
            slot: 0,
        }),
        mesh: MeshSource::Inline(meteor_mesh),
        motion: Motion::Linear(velocity),
        transform: Transform::from_position(position),
    }
}

/// One of the two model-loaded aliens
#[must_use]
pub fn alien(index: usize) -> EntityConfig {
    let x = if index == 0 { -3.0 } else { 3.0 };
    EntityConfig {
        label: if index == 0 { "alien left" } else { "alien right" },
        shader_base: "Alien",
        stages: StageSet::VERTEX | StageSet::HULL | StageSet::DOMAIN | StageSet::PIXEL,
        topology: PrimitiveTopology::PatchList3,
        vertex_format: VertexFormat::Full,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Domain, 0), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Domain, 1), (Stage::Pixel, 1)]),
            ConstantSpec::new(PayloadKind::Time, &[(Stage::Domain, 2)]),
            ConstantSpec::new(PayloadKind::Offset, &[(Stage::Domain, 3)]),
        ],
        texture: None,
        mesh: MeshSource::Model("alien"),
        motion: Motion::Static,
        transform: Transform::from_position(Vec3::new(x, 0.5, 3.0)),
    }
}

/// Fullscreen-style quad ray-marched entirely in the pixel stage
#[must_use]
pub fn ray_march_quad() -> EntityConfig {
    EntityConfig {
        label: "ray-march quad",
        shader_base: "RayMarch",
        stages: StageSet::VERTEX | StageSet::PIXEL,
        topology: PrimitiveTopology::TriangleList,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Vertex, 0), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Pixel, 1)]),
        ],
        texture: None,
        mesh: MeshSource::Inline(quad_mesh),
        motion: Motion::Static,
        transform: Transform::from_position(Vec3::new(0.0, 1.0, -3.0)),
    }
}

/// Cube proxy volume whose pixels ray-trace an inscribed sphere
#[must_use]
pub fn ray_traced_sphere_cube() -> EntityConfig {
    EntityConfig {
        label: "ray-traced sphere cube",
        shader_base: "RaySphere",
        stages: StageSet::VERTEX | StageSet::PIXEL,
        topology: PrimitiveTopology::TriangleList,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Vertex, 0), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::InverseView, &[(Stage::Pixel, 1)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Pixel, 2)]),
        ],
        texture: None,
        mesh: MeshSource::Inline(cube_mesh),
        motion: Motion::Static,
        transform: Transform::from_position(Vec3::new(3.0, 1.0, -2.0)),
    }
}

/// Quad whose pixels ray-trace a distant heightfield
#[must_use]
pub fn ray_traced_terrain() -> EntityConfig {
    EntityConfig {
        label: "ray-traced terrain",
        shader_base: "RayTerrain",
        stages: StageSet::VERTEX | StageSet::PIXEL,
        topology: PrimitiveTopology::TriangleList,
        vertex_format: VertexFormat::Position,
        rasterizer: RasterizerDesc::solid(),
        constants: vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Vertex, 0), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::InverseView, &[(Stage::Pixel, 1)]),
            ConstantSpec::new(PayloadKind::Camera, &[(Stage::Pixel, 2)]),
        ],
        texture: None,
        mesh: MeshSource::Inline(quad_mesh),
        motion: Motion::Static,
        transform: Transform::from_position(Vec3::new(-3.0, 1.0, -2.0)),
    }
}

/// Every distinct shader blob the catalog references
///
/// The demo app registers placeholder bytecode under each of these names
/// before the scene starts fetching.
#[must_use]
pub fn shader_manifest() -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(0);
    let configs = [
        star_sky(),
        rock_field(),
        terrain(),
        wireframe_sphere(),
        view_dependent_sphere(),
        bump_sphere(),
        pottery(),
        meteor(&mut rng),
        alien(0),
        alien(1),
        ray_march_quad(),
        ray_traced_sphere_cube(),
        ray_traced_terrain(),
    ];

    let mut names: Vec<String> = configs
        .iter()
        .flat_map(|config| config.shader_requests().into_iter().map(|(_, name)| name))
        .collect();
    names.sort();
    names.dedup();
    names
}
