//! Submesh (face group) reading.
//!
//! Each `<polylist>` or `<triangles>` element of a mesh becomes one
//! [`Submesh`]. Its `<input>` children say which column of a face-corner
//! record holds the vertex, normal and texcoord index. The `<p>` element holds
//! the records back to back:
//!
//! ```text
//! <input semantic="VERTEX" offset="0"/>
//! <input semantic="NORMAL" offset="1"/>
//! <p>0 0  1 0  2 0</p>        three corners, stride 2
//! ```

use roxmltree::Node;
use thiserror::Error;

use crate::document::{child, children, text};
use crate::numeric::{read_values, FromToken, NumericError, NumericOptions};

/// Errors that can occur while reading a face group.
#[derive(Error, Debug)]
pub enum SubmeshError {
    #[error("<{element}>: {error}")]
    Numeric {
        element: &'static str,
        #[source]
        error: NumericError,
    },

    #[error("<{element}> input '{semantic}' has no offset")]
    MissingOffset {
        element: &'static str,
        semantic: String,
    },

    #[error("<{element}> input '{semantic}' uses offset {offset}, but records only have {stride} columns")]
    OffsetOutOfStride {
        element: &'static str,
        semantic: &'static str,
        offset: usize,
        stride: usize,
    },

    #[error("<{element}> index stream has {len} values, not a multiple of stride {stride}")]
    RaggedStream {
        element: &'static str,
        len: usize,
        stride: usize,
    },
}

/// Result type for submesh reading.
pub type SubmeshResult<T> = Result<T, SubmeshError>;

/// Which face-grouping element a submesh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// `<polylist>` (Blender).
    Polylist,
    /// `<triangles>` (3ds Max).
    Triangles,
}

impl PrimitiveKind {
    pub fn element_name(self) -> &'static str {
        match self {
            PrimitiveKind::Polylist => "polylist",
            PrimitiveKind::Triangles => "triangles",
        }
    }
}

/// Column of each semantic within a face-corner record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticOffsets {
    pub vertex: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl SemanticOffsets {
    /// Number of recognised semantics, which is the record width.
    pub fn stride(&self) -> usize {
        1 + usize::from(self.normal.is_some()) + usize::from(self.texcoord.is_some())
    }

    /// Whether both declare the same semantic set. Column order may differ.
    pub fn same_layout(&self, other: &SemanticOffsets) -> bool {
        self.normal.is_some() == other.normal.is_some() && self.texcoord.is_some() == other.texcoord.is_some()
    }
}

/// One face group of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    pub primitive: PrimitiveKind,

    pub offsets: SemanticOffsets,

    /// Raw face-corner records, `offsets.stride()` values per corner.
    pub indices: Vec<u32>,

    /// Corners per face from `<vcount>` (polylists only).
    pub face_sizes: Option<Vec<u32>>,
}

impl Submesh {
    pub fn stride(&self) -> usize {
        self.offsets.stride()
    }

    /// Number of face corners in this submesh.
    pub fn corner_count(&self) -> usize {
        self.indices.len() / self.stride()
    }

    /// Iterate over face-corner records.
    pub fn corners(&self) -> std::slice::ChunksExact<'_, u32> {
        self.indices.chunks_exact(self.stride())
    }
}

/// Read every face group of a `<mesh>`.
///
/// `<polylist>` elements are preferred; `<triangles>` are only read when the
/// mesh has no polylist. Groups without a `<p>` stream or without a `VERTEX`
/// input are skipped.
pub fn read_submeshes(mesh: Node, options: &NumericOptions) -> SubmeshResult<Vec<Submesh>> {
    let mut primitive = PrimitiveKind::Polylist;
    let mut groups: Vec<Node> = children(mesh, primitive.element_name()).collect();
    if groups.is_empty() {
        primitive = PrimitiveKind::Triangles;
        groups = children(mesh, primitive.element_name()).collect();
    }

    let mut submeshes = Vec::with_capacity(groups.len());
    for group in groups {
        if let Some(submesh) = read_submesh(group, primitive, options)? {
            submeshes.push(submesh);
        }
    }

    Ok(submeshes)
}

fn read_submesh(group: Node, primitive: PrimitiveKind, options: &NumericOptions) -> SubmeshResult<Option<Submesh>> {
    let element = primitive.element_name();

    let Some(p) = child(group, "p") else {
        log::debug!("Skipping <{}> without index stream", element);
        return Ok(None);
    };

    let mut vertex = None;
    let mut normal = None;
    let mut texcoord = None;
    let mut columns = 0;

    for input in children(group, "input") {
        let semantic = input.attribute("semantic").unwrap_or("");
        let declared = input.attribute("offset").map(str::trim);

        let slot = match semantic.to_lowercase().as_str() {
            "vertex" => Some(&mut vertex),
            "normal" => Some(&mut normal),
            "texcoord" => Some(&mut texcoord),
            other => {
                log::debug!("Ignoring <{}> input semantic '{}'", element, other);
                None
            }
        };

        // Only the first set of a semantic is used (e.g. TEXCOORD set="0").
        // Ignored inputs still widen the declared record when their offset parses.
        let Some(slot) = slot.filter(|slot| slot.is_none()) else {
            if let Some(offset) = declared.and_then(|token| token.parse::<usize>().ok()) {
                columns = columns.max(offset + 1);
            }
            continue;
        };

        let offset = match declared {
            Some(token) => u32::from_token(token, options).map_err(|error| SubmeshError::Numeric { element, error })?
                as usize,
            None => {
                return Err(SubmeshError::MissingOffset {
                    element,
                    semantic: semantic.to_string(),
                })
            }
        };
        columns = columns.max(offset + 1);
        *slot = Some(offset);
    }

    let Some(vertex) = vertex else {
        log::warn!("Skipping <{}> without VERTEX input", element);
        return Ok(None);
    };

    let offsets = SemanticOffsets {
        vertex,
        normal,
        texcoord,
    };
    let stride = offsets.stride();

    if columns != stride {
        log::warn!(
            "<{}> declares {} index columns, reading records as {} columns",
            element,
            columns,
            stride
        );
    }

    let named = [("VERTEX", Some(vertex)), ("NORMAL", normal), ("TEXCOORD", texcoord)];
    for (semantic, offset) in named {
        if let Some(offset) = offset.filter(|&o| o >= stride) {
            return Err(SubmeshError::OffsetOutOfStride {
                element,
                semantic,
                offset,
                stride,
            });
        }
    }

    let indices: Vec<u32> =
        read_values(&text(p), options).map_err(|error| SubmeshError::Numeric { element, error })?;
    if indices.len() % stride != 0 {
        return Err(SubmeshError::RaggedStream {
            element,
            len: indices.len(),
            stride,
        });
    }

    let face_sizes = match child(group, "vcount") {
        Some(vcount) => {
            let sizes: Vec<u32> =
                read_values(&text(vcount), options).map_err(|error| SubmeshError::Numeric { element, error })?;
            if sizes.iter().any(|&n| n != 3) {
                log::warn!("<{}> contains non-triangle faces; corners are kept as-is", element);
            }
            Some(sizes)
        }
        None => None,
    };

    Ok(Some(Submesh {
        primitive,
        offsets,
        indices,
        face_sizes,
    }))
}
