//! Example: Convert a COLLADA file and inspect the resulting buffers.
//!
//! Run with: cargo run --example load_dae -- scene.dae [options.json]

use std::env;

use anyhow::Context;
use dae_core::{convert_with_options, ReaderOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_dae <path-to-dae-file> [options.json]");
        println!("\nOptions file example:");
        println!(r#"  {{ "float_precision": 4, "numeric_policy": "lenient", "layout_policy": "strict" }}"#);
        return Ok(());
    }

    let options = match args.get(2) {
        Some(path) => ReaderOptions::from_json_file(path).with_context(|| format!("Failed to load options {}", path))?,
        None => ReaderOptions::default(),
    };

    let path = &args[1];
    println!("Converting COLLADA file: {}", path);

    let reader = convert_with_options(path, &options).with_context(|| format!("Failed to convert {}", path))?;

    println!("\n=== {} ===", path);
    println!("Up axis: {:?}", reader.up_axis());
    println!(
        "Layout: {} floats per vertex (normals: {}, texcoords: {})",
        reader.layout_width(),
        reader.layout().has_normals,
        reader.layout().has_texcoords
    );
    if let Some(offset) = reader.layout().normal_offset() {
        println!("  normal at float {}", offset);
    }
    if let Some(offset) = reader.layout().texcoord_offset() {
        println!("  texcoord at float {}", offset);
    }
    println!("Geometries: {}", reader.geometry_count());
    println!("Total vertices: {}", reader.vertex_count());
    println!("Total indices: {}", reader.index_count());

    let bounds = reader.bounds();
    if !bounds.is_empty() {
        let center = bounds.centroid();
        println!(
            "Bounds: center ({:.2}, {:.2}, {:.2}), diagonal {:.2}",
            center.x,
            center.y,
            center.z,
            bounds.size()
        );
    }

    println!("\n--- Geometries ---");
    for (i, geometry) in reader.geometries().iter().enumerate() {
        println!(
            "  [{}] {} - {} vertices, {} indices, base {}",
            i,
            geometry.label(),
            geometry.vertex_count(),
            geometry.corner_count(),
            geometry.index_base
        );

        let bounds = geometry.bounds();
        if !bounds.is_empty() {
            println!(
                "       Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            );
        }

        for (submesh, range) in geometry.submeshes.iter().zip(&geometry.draw_ranges) {
            println!(
                "       <{}> indices {}..{}",
                submesh.primitive.element_name(),
                range.offset,
                range.end()
            );
        }
    }

    Ok(())
}
