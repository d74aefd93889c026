//! Scene compiler binary: generates a construct box, merges it and packs the
//! vertex buffers, optionally exporting the merged geometry as OBJ.
//!
//! Usage: cargo run --release --bin compile_scene -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Scene configuration JSON (default: built-in defaults)
//!   --size <WxHxD>    Box interior size, e.g. 128x64x64
//!   --margin <N>      Extra cells around the interior
//!   --roof            Close the layer above the interior
//!   --edges           Turn edge-marker colours into trim instead of geometry
//!   --lines           Merge rows only, without growing along Z
//!   --obj <DIR>       Write <name>.obj and <name>.mtl into DIR
//!   --save <PATH>     Write the effective configuration as JSON

use std::path::PathBuf;
use std::time::Instant;

use glam::IVec3;

use voxquad::core::{logging, Result};
use voxquad::mesh::MeshBuffers;
use voxquad::scene::{export_obj, Scene, SceneConfig};
use voxquad::voxel::{generate_box, EdgeMarkers, MergeMode, VoxelSource};

fn main() -> Result<()> {
    logging::init_with_timestamps();

    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SceneConfig::load(&PathBuf::from(path))?,
        None => SceneConfig::default(),
    };
    if let Some(size) = parse_size_arg(&args, "--size") {
        config.size = size.to_array();
    }
    if let Some(margin) = parse_i32_arg(&args, "--margin") {
        config.margin = margin;
    }
    if has_flag(&args, "--roof") {
        config.roof = true;
    }
    if has_flag(&args, "--edges") && config.merge.edge_markers.is_none() {
        config.merge.edge_markers = Some(EdgeMarkers::default());
    }
    if has_flag(&args, "--lines") {
        config.merge.mode = MergeMode::Lines;
    }

    if let Some(path) = parse_str_arg(&args, "--save") {
        config.save(&PathBuf::from(&path))?;
        log::info!("Saved configuration to {}", path);
    }

    let size = config.box_size();
    log::info!(
        "Compiling '{}': {}x{}x{} box, margin {}, roof {}, {:?} merge",
        config.name, size.x, size.y, size.z, config.margin, config.roof, config.merge.mode
    );

    let start = Instant::now();
    let source = generate_box(size, config.roof, config.margin);
    log::info!(
        "Generated {} models, {} instances ({} cells) in {:.1}ms",
        source.models().len(),
        source.instances().len(),
        source.instanced_volume(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let start = Instant::now();
    let mut scene = Scene::new(config.params);
    scene.import(&source, &config.merge)?;
    log::info!(
        "Merged into {} rectangles, {} edges in {:.1}ms",
        scene.voxels().len(),
        scene.edges().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    for area in scene.areas() {
        log::debug!(
            "Area {}: origin {:?}, {} rects, {} edges",
            area.no, area.origin, area.rect_count(), area.edge_count()
        );
    }
    if let Some(bounds) = scene.bounds() {
        log::info!("Scene bounds {:?} .. {:?}", bounds.min, bounds.max);
    }

    let start = Instant::now();
    let mesh = MeshBuffers::from_scene(&scene);
    log::info!(
        "Packed {} voxel quads and {} edge quads ({} KB) in {:.1}ms",
        mesh.voxel_quad_count(),
        mesh.edge_quad_count(),
        mesh.byte_len() / 1024,
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(dir) = parse_str_arg(&args, "--obj") {
        let path = export_obj(&scene, &PathBuf::from(dir), &config.name, true)?;
        log::info!("Exported {}", path.display());
    }

    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// `WxHxD` with each part a positive integer
fn parse_size_arg(args: &[String], flag: &str) -> Option<IVec3> {
    let s = parse_str_arg(args, flag)?;
    let parts: Vec<i32> = s.split('x').map(|p| p.trim().parse().ok()).collect::<Option<_>>()?;
    match parts.as_slice() {
        &[x, y, z] if x > 0 && y > 0 && z > 0 => Some(IVec3::new(x, y, z)),
        _ => {
            log::warn!("Ignoring malformed {} '{}', expected WxHxD", flag, s);
            None
        }
    }
}
