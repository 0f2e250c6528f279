//! Converted geometry.

use dae_math::{Bounds, Vec3};

use crate::ranges::DrawRange;
use crate::source::AttributeSources;
use crate::submesh::Submesh;

/// One `<geometry>` converted to render-ready buffers.
///
/// `vertex_buffer` holds only this geometry's unique vertices, interleaved
/// according to the reader's [`GlobalLayout`](crate::GlobalLayout). Indices are
/// global: they start at `index_base`, which is the number of unique vertices
/// of all earlier geometries.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// `name` attribute, empty when absent.
    pub name: String,

    /// `id` attribute, empty when absent.
    pub id: String,

    /// Source arrays as read from the document.
    pub sources: AttributeSources,

    /// Face groups in document order.
    pub submeshes: Vec<Submesh>,

    /// Floats per vertex in `vertex_buffer`.
    pub vertex_width: usize,

    pub vertex_buffer: Vec<f32>,

    /// One entry per face corner, across all submeshes.
    pub index_buffer: Vec<u32>,

    /// First index of this geometry's namespace.
    pub index_base: u32,

    pub unique_vertex_count: usize,

    /// One range per submesh into the combined index buffer.
    pub draw_ranges: Vec<DrawRange>,
}

impl Geometry {
    /// Label for log and error messages: the name, else the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.unique_vertex_count
    }

    /// Number of face corners (length of the index buffer).
    pub fn corner_count(&self) -> usize {
        self.index_buffer.len()
    }

    /// Unique vertex `i` as a slice of `vertex_width` floats.
    pub fn vertex(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.vertex_width)?;
        self.vertex_buffer.get(start..start + self.vertex_width)
    }

    /// Position of unique vertex `i` (already axis-remapped).
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.vertex(i).map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    /// Iterate over the positions of all unique vertices.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertex_buffer
            .chunks_exact(self.vertex_width)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    /// Axis-aligned bounds of the emitted positions.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.positions())
    }

    /// The vertex buffer as raw bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertex_buffer)
    }

    /// The index buffer as raw bytes (`u32` indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.index_buffer)
    }
}
