//! Per-corner tuple gathering.
//!
//! Every face corner is expanded into one interleaved vertex (position, then
//! normal and texcoord when the global layout has them). Positions and normals
//! go through the document's axis remap; texcoords are copied unchanged.

use dae_math::AxisRemap;
use thiserror::Error;

use crate::layout::GlobalLayout;
use crate::source::AttributeSources;
use crate::submesh::Submesh;

/// Errors that can occur while gathering tuples.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatherError {
    #[error("Corner {corner}: {semantic} index {index} is out of range ({available} entries)")]
    IndexOutOfRange {
        semantic: &'static str,
        corner: usize,
        index: u32,
        available: usize,
    },
}

/// Result type for gathering.
pub type GatherResult<T> = Result<T, GatherError>;

/// Interleaved per-corner attribute tuples, `width` floats each.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuples {
    pub data: Vec<f32>,
    pub width: usize,
}

impl Tuples {
    pub fn with_capacity(width: usize, corners: usize) -> Self {
        Self {
            data: Vec::with_capacity(width * corners),
            width,
        }
    }

    /// Number of tuples (face corners).
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Tuple `i`.
    pub fn get(&self, i: usize) -> &[f32] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.width)
    }
}

/// Gather the tuples of all submeshes of a geometry, in submesh order.
pub fn gather_geometry(
    sources: &AttributeSources,
    submeshes: &[Submesh],
    layout: &GlobalLayout,
    remap: &AxisRemap,
) -> GatherResult<Tuples> {
    let corners = submeshes.iter().map(Submesh::corner_count).sum();
    let mut tuples = Tuples::with_capacity(layout.width, corners);

    for submesh in submeshes {
        gather_submesh(sources, submesh, layout, remap, &mut tuples)?;
    }

    Ok(tuples)
}

/// Append one tuple per corner of `submesh` to `out`.
///
/// When the layout carries an attribute that this submesh does not provide,
/// the attribute is filled with zeros so every tuple keeps the layout width.
pub fn gather_submesh(
    sources: &AttributeSources,
    submesh: &Submesh,
    layout: &GlobalLayout,
    remap: &AxisRemap,
    out: &mut Tuples,
) -> GatherResult<()> {
    debug_assert_eq!(out.width, layout.width);

    let normal_column = submesh.offsets.normal.filter(|_| sources.has_normals());
    let texcoord_column = submesh.offsets.texcoord.filter(|_| sources.has_texcoords());

    if layout.has_normals && normal_column.is_none() {
        log::debug!("Submesh has no normals, padding with zeros");
    }
    if layout.has_texcoords && texcoord_column.is_none() {
        log::debug!("Submesh has no texcoords, padding with zeros");
    }

    for (corner, record) in submesh.corners().enumerate() {
        let index = record[submesh.offsets.vertex];
        let position = remap
            .read(&sources.positions, index as usize)
            .ok_or(GatherError::IndexOutOfRange {
                semantic: "VERTEX",
                corner,
                index,
                available: sources.position_count(),
            })?;
        out.data.extend_from_slice(&position);

        if layout.has_normals {
            let normal = match normal_column {
                Some(column) => {
                    let index = record[column];
                    remap
                        .read(&sources.normals, index as usize)
                        .ok_or(GatherError::IndexOutOfRange {
                            semantic: "NORMAL",
                            corner,
                            index,
                            available: sources.normal_count(),
                        })?
                }
                None => [0.0; 3],
            };
            out.data.extend_from_slice(&normal);
        }

        if layout.has_texcoords {
            let texcoord = match texcoord_column {
                Some(column) => {
                    let index = record[column];
                    read_texcoord(&sources.texcoords, index as usize).ok_or(GatherError::IndexOutOfRange {
                        semantic: "TEXCOORD",
                        corner,
                        index,
                        available: sources.texcoord_count(),
                    })?
                }
                None => [0.0; 2],
            };
            out.data.extend_from_slice(&texcoord);
        }
    }

    Ok(())
}

fn read_texcoord(values: &[f32], index: usize) -> Option<[f32; 2]> {
    let start = index.checked_mul(2)?;
    let entry = values.get(start..start + 2)?;
    Some([entry[0], entry[1]])
}
