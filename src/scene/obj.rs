//! Wavefront OBJ/MTL export of the merged rectangles
//!
//! Each rectangle becomes four vertices and two triangles using material
//! `c<color>`. Coordinates are scaled to metres with X negated and Y/Z
//! swapped to match the usual Y-up tooling.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::voxel::{Palette, VoxelRect};
use super::assembler::Scene;

/// World cells per OBJ unit
pub const OBJ_SCALE: f32 = 0.01;

fn write_rect_vertices<W: Write>(out: &mut W, r: &VoxelRect) -> std::io::Result<()> {
    let x0 = -OBJ_SCALE * r.sx as f32;
    let x1 = -OBJ_SCALE * (r.ex as f32 + 1.0);
    let z0 = OBJ_SCALE * r.sz as f32;
    let z1 = OBJ_SCALE * (r.ez as f32 + 1.0);
    let y = OBJ_SCALE * r.y as f32;
    for (x, z) in [(x0, z0), (x1, z0), (x0, z1), (x1, z1)] {
        writeln!(out, "v {:.6} {:.6} {:.6}", x, z, y)?;
    }
    Ok(())
}

/// Write the geometry of `rects` as an OBJ object referencing `<name>.mtl`
pub fn write_obj<W: Write>(out: &mut W, name: &str, rects: &[VoxelRect]) -> std::io::Result<()> {
    writeln!(out, "o {}", name)?;
    writeln!(out, "mtllib {}.mtl", name)?;
    for r in rects {
        write_rect_vertices(out, r)?;
    }
    for (face, r) in rects.iter().enumerate() {
        let base = face * 4 + 1;
        writeln!(out, "usemtl c{}", r.color)?;
        writeln!(out, "f {} {} {}", base, base + 1, base + 2)?;
        writeln!(out, "f {} {} {}", base + 3, base + 2, base + 1)?;
    }
    Ok(())
}

/// Write one diffuse material per non-empty palette index
pub fn write_mtl<W: Write>(out: &mut W, palette: &Palette, srgb: bool) -> std::io::Result<()> {
    for index in 1..=u8::MAX {
        let [r, g, b] = palette.get(index).to_rgb_f32(srgb);
        writeln!(out, "newmtl c{}", index)?;
        writeln!(out, "Kd {:.6} {:.6} {:.6}", r, g, b)?;
    }
    Ok(())
}

/// Export `scene` as `<dir>/<name>.obj` and `<dir>/<name>.mtl`, returning the
/// OBJ path
pub fn export_obj(scene: &Scene, dir: &Path, name: &str, srgb: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let obj_path = dir.join(format!("{}.obj", name));

    let mut obj = BufWriter::new(File::create(&obj_path)?);
    write_obj(&mut obj, name, scene.voxels())?;
    obj.flush()?;

    let mut mtl = BufWriter::new(File::create(dir.join(format!("{}.mtl", name)))?);
    write_mtl(&mut mtl, scene.palette(), srgb)?;
    mtl.flush()?;

    log::info!("Exported {} rects to {}", scene.voxels().len(), obj_path.display());
    Ok(obj_path)
}
