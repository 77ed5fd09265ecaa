//! voxspace probe
//!
//! Builds a small mixed-resolution scene and logs what the spatial core says
//! about it. Pass a workspace edge length in meters as the first argument.
//! Set `RUST_LOG=debug` to see placement rejections.

use anyhow::Context;
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxspace_core::{IncrementPos, Ray, Resolution};
use voxspace_spatial::collision::{
    check_stability, colliding_voxels, find_nearest_free_position, is_completely_surrounded,
};
use voxspace_spatial::face::classify_hit_face;
use voxspace_spatial::placement::placement_on_face;
use voxspace_spatial::raycast::{
    raycast_all_hits, raycast_grid, raycast_workspace, voxels_along_ray,
};
use voxspace_spatial::{
    validate_placement, SpatialBounds, SpatialConfig, StoredVoxel, VoxelMap, WorkspaceBounds,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = SpatialConfig::default();
    if let Some(arg) = std::env::args().nth(1) {
        let edge: f32 = arg
            .parse()
            .with_context(|| format!("workspace size must be a number of meters, got {arg:?}"))?;
        config.workspace_size = Vec3::splat(edge);
    }
    let workspace = config.workspace()?;
    info!(size = ?workspace.size(), "Workspace ready");

    let storage = VoxelMap::new();
    build_scene(&storage, &workspace);
    info!(voxels = storage.len(), "Scene built");

    probe_placements(&storage, &workspace, &config);
    probe_selection(&storage, &config);

    Ok(())
}

/// A row of 64 cm blocks with a 32 cm voxel on top and a few small ones.
fn build_scene(storage: &VoxelMap, workspace: &WorkspaceBounds) {
    let requests = [
        (IncrementPos::new(0, 0, 0), Resolution::Size64cm),
        (IncrementPos::new(64, 0, 0), Resolution::Size64cm),
        (IncrementPos::new(128, 0, 0), Resolution::Size64cm),
        (IncrementPos::new(0, 64, 0), Resolution::Size32cm),
        (IncrementPos::new(10, 0, 60), Resolution::Size4cm),
        // Overlaps the first block
        (IncrementPos::new(16, 0, 16), Resolution::Size32cm),
        // Below ground
        (IncrementPos::new(0, -8, 100), Resolution::Size8cm),
    ];

    for (pos, resolution) in requests {
        match validate_placement(pos, resolution, workspace, storage) {
            Ok(()) => {
                storage.insert(StoredVoxel::new(pos, resolution));
            }
            Err(reason) => warn!(?pos, %resolution, %reason, "Skipped voxel"),
        }
    }
}

fn probe_placements(storage: &VoxelMap, workspace: &WorkspaceBounds, config: &SpatialConfig) {
    let desired = IncrementPos::new(64, 0, 0);
    let resolution = Resolution::Size16cm;

    let blockers = colliding_voxels(desired, resolution, storage);
    info!(?desired, %resolution, blockers = blockers.len(), "Desired position");

    match find_nearest_free_position(desired, resolution, storage, config.max_search_distance) {
        Some(free) => info!(
            ?free,
            stable = check_stability(free, resolution, storage, config.stability_epsilon),
            valid = validate_placement(free, resolution, workspace, storage).is_ok(),
            "Nearest free position"
        ),
        None => warn!(?desired, "No free position within search distance"),
    }

    let floating = IncrementPos::new(0, 200, 0);
    info!(
        ?floating,
        stable = check_stability(floating, resolution, storage, config.stability_epsilon),
        "Floating candidate"
    );

    let middle = IncrementPos::new(64, 0, 0);
    info!(
        surrounded = is_completely_surrounded(middle, Resolution::Size64cm, storage),
        "Middle block"
    );

    info!(
        max = ?workspace.max_fitting_resolution(IncrementPos::new(200, 0, 0)),
        "Largest voxel fitting near the edge"
    );
}

fn probe_selection(storage: &VoxelMap, config: &SpatialConfig) {
    let ray = Ray::new(Vec3::new(-1.0, 0.32, 0.0), Vec3::X);
    let resolution = Resolution::Size64cm;

    let cells = voxels_along_ray(&ray, resolution, config.max_ray_distance.min(4.0));
    info!(cells = cells.len(), "Grid cells along ray");

    let hits = raycast_all_hits(
        &ray,
        storage,
        resolution,
        config.max_ray_distance,
        config.max_hits,
    );
    for hit in &hits {
        info!(voxel = ?hit.voxel, face = hit.face.name(), distance = hit.distance, "Hit");
    }

    let Some(hit) = raycast_grid(&ray, storage, resolution, config.max_ray_distance) else {
        info!("Ray missed every voxel");
        return;
    };

    let bounds = SpatialBounds::from_increment(hit.voxel, resolution);
    let (face, exact) = classify_hit_face(hit.point, &bounds, config.face_epsilon);
    let target = placement_on_face(&hit, resolution, Resolution::Size16cm);
    info!(face = face.name(), exact, ?target, "Closest hit and placement target");

    let down = Ray::new(Vec3::new(1.5, 3.0, 1.5), Vec3::NEG_Y);
    if let Some(ground) = raycast_workspace(&down, config.workspace_size) {
        info!(voxel = ?ground.voxel, face = ground.face.name(), "Workspace hit");
    }
}
