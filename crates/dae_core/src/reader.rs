//! Document conversion entry points.
//!
//! Conversion runs in two passes over the document's geometries:
//!
//! 1. Read every geometry's source arrays and face groups.
//! 2. Resolve the [`GlobalLayout`] from all of them, then gather, weld and
//!    compute draw ranges for each geometry in declaration order. Each
//!    geometry's index namespace continues where the previous one ended.

use std::path::Path;
use std::time::Instant;

use dae_math::{AxisRemap, Bounds, UpAxis};
use roxmltree::Node;
use thiserror::Error;

use crate::config::{ConfigError, LayoutPolicy, ReaderOptions};
use crate::document::{child, read_document_text, ColladaDocument, DocumentError};
use crate::gather::{gather_geometry, GatherError};
use crate::geometry::Geometry;
use crate::layout::GlobalLayout;
use crate::numeric::NumericOptions;
use crate::ranges::RangeCursor;
use crate::source::{collect_sources, AttributeSources, SourceError};
use crate::submesh::{read_submeshes, Submesh, SubmeshError};
use crate::weld::{weld, WeldError};

/// Errors that abort a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid options: {0}")]
    Config(#[from] ConfigError),

    #[error("Geometry '{geometry}': {error}")]
    Source {
        geometry: String,
        #[source]
        error: SourceError,
    },

    #[error("Geometry '{geometry}': {error}")]
    Submesh {
        geometry: String,
        #[source]
        error: SubmeshError,
    },

    #[error("Geometry '{geometry}': {error}")]
    Gather {
        geometry: String,
        #[source]
        error: GatherError,
    },

    #[error("Geometry '{geometry}': {error}")]
    Weld {
        geometry: String,
        #[source]
        error: WeldError,
    },

    #[error("Geometry '{geometry}': submesh {submesh} declares a different semantic set than submesh 0")]
    LayoutMismatch { geometry: String, submesh: usize },

    #[error("Geometry '{geometry}': index base {base} is past the last u32 index")]
    IndexBaseOverflow { geometry: String, base: u64 },
}

/// Result type for conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// The converted contents of one document.
///
/// Immutable once returned; dropping it releases every buffer.
#[derive(Clone, Debug)]
pub struct Reader {
    up_axis: UpAxis,
    remap: AxisRemap,
    layout: GlobalLayout,
    options: ReaderOptions,
    geometries: Vec<Geometry>,
}

impl Reader {
    pub fn up_axis(&self) -> UpAxis {
        self.up_axis
    }

    /// Component remap applied to positions and normals.
    pub fn axis_remap(&self) -> AxisRemap {
        self.remap
    }

    pub fn layout(&self) -> GlobalLayout {
        self.layout
    }

    /// Floats per interleaved vertex, shared by every geometry.
    pub fn layout_width(&self) -> usize {
        self.layout.width
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Converted geometries in declaration order.
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Find a geometry by name, falling back to id.
    pub fn find(&self, name: &str) -> Option<&Geometry> {
        self.geometries
            .iter()
            .find(|g| g.name == name)
            .or_else(|| self.geometries.iter().find(|g| g.id == name))
    }

    /// Total unique vertices across all geometries.
    pub fn vertex_count(&self) -> usize {
        self.geometries.iter().map(|g| g.unique_vertex_count).sum()
    }

    /// Total face corners (indices) across all geometries.
    pub fn index_count(&self) -> usize {
        self.geometries.iter().map(|g| g.index_buffer.len()).sum()
    }

    /// Bounds of every emitted position in the document.
    pub fn bounds(&self) -> Bounds {
        self.geometries
            .iter()
            .fold(Bounds::EMPTY, |bounds, g| bounds.union(&g.bounds()))
    }

    /// All vertex buffers concatenated; addressable by the shared indices.
    pub fn combined_vertex_buffer(&self) -> Vec<f32> {
        self.geometries
            .iter()
            .flat_map(|g| g.vertex_buffer.iter().copied())
            .collect()
    }

    /// All index buffers concatenated; addressed by the draw ranges.
    pub fn combined_index_buffer(&self) -> Vec<u32> {
        self.geometries
            .iter()
            .flat_map(|g| g.index_buffer.iter().copied())
            .collect()
    }

    /// Release all buffers. Equivalent to dropping the reader.
    pub fn release(self) {}
}

/// Convert the COLLADA document at `path` with default options.
pub fn convert<P: AsRef<Path>>(path: P) -> ConvertResult<Reader> {
    convert_with_options(path, &ReaderOptions::default())
}

/// Convert the COLLADA document at `path`.
pub fn convert_with_options<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> ConvertResult<Reader> {
    let path = path.as_ref();
    let text = read_document_text(path)?;
    log::debug!("Read {} bytes from {}", text.len(), path.display());
    convert_str(&text, options)
}

/// Convert a COLLADA document held in memory.
pub fn convert_str(text: &str, options: &ReaderOptions) -> ConvertResult<Reader> {
    options.validate()?;

    let doc = ColladaDocument::parse(text)?;
    let up_axis = doc.up_axis();
    let mut builder = ReaderBuilder::new(options, up_axis);

    for node in doc.geometries() {
        builder.read_geometry(node)?;
    }

    builder.finish()
}

/// A geometry whose sources and face groups have been read but whose buffers
/// have not been built yet.
struct PendingGeometry {
    name: String,
    id: String,
    sources: AttributeSources,
    submeshes: Vec<Submesh>,
}

impl PendingGeometry {
    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        }
    }
}

/// Internal builder driving both conversion passes.
struct ReaderBuilder<'o> {
    options: &'o ReaderOptions,
    numeric: NumericOptions,
    up_axis: UpAxis,
    remap: AxisRemap,
    pending: Vec<PendingGeometry>,
}

impl<'o> ReaderBuilder<'o> {
    fn new(options: &'o ReaderOptions, up_axis: UpAxis) -> Self {
        Self {
            options,
            numeric: options.numeric(),
            up_axis,
            remap: AxisRemap::from_up_axis(up_axis),
            pending: Vec::new(),
        }
    }

    /// First pass: read one `<geometry>` element.
    fn read_geometry(&mut self, node: Node) -> ConvertResult<()> {
        let name = node.attribute("name").unwrap_or("").to_string();
        let id = node.attribute("id").unwrap_or("").to_string();
        let label = if name.is_empty() { id.clone() } else { name.clone() };

        let Some(mesh) = child(node, "mesh") else {
            log::debug!("Skipping geometry '{}' without <mesh>", label);
            return Ok(());
        };

        let sources = collect_sources(mesh, &self.numeric).map_err(|error| ConvertError::Source {
            geometry: label.clone(),
            error,
        })?;
        if sources.positions.is_empty() {
            log::warn!("Skipping geometry '{}' without position source", label);
            return Ok(());
        }

        let submeshes = read_submeshes(mesh, &self.numeric).map_err(|error| ConvertError::Submesh {
            geometry: label.clone(),
            error,
        })?;
        if submeshes.is_empty() {
            log::warn!("Skipping geometry '{}' without face groups", label);
            return Ok(());
        }

        self.pending.push(PendingGeometry {
            name,
            id,
            sources,
            submeshes,
        });
        Ok(())
    }

    /// Second pass: resolve the layout and build every geometry's buffers.
    fn finish(self) -> ConvertResult<Reader> {
        let started = Instant::now();
        let layout = GlobalLayout::resolve(self.pending.iter().map(|g| &g.sources));

        let mut geometries = Vec::with_capacity(self.pending.len());
        let mut cursor = RangeCursor::new();
        let mut next_base: u64 = 0;

        for pending in self.pending {
            check_uniform_layout(&pending, self.options.layout_policy)?;

            let tuples = gather_geometry(&pending.sources, &pending.submeshes, &layout, &self.remap).map_err(
                |error| ConvertError::Gather {
                    geometry: pending.label(),
                    error,
                },
            )?;
            let base = index_base(next_base, &pending)?;
            let welded = weld(&tuples, base).map_err(|error| ConvertError::Weld {
                geometry: pending.label(),
                error,
            })?;
            let draw_ranges = cursor.advance(&pending.submeshes);

            log::debug!(
                "Geometry '{}': {} corners welded to {} vertices (base {})",
                pending.label(),
                tuples.len(),
                welded.unique_count,
                base
            );

            next_base += welded.unique_count as u64;

            geometries.push(Geometry {
                name: pending.name,
                id: pending.id,
                sources: pending.sources,
                submeshes: pending.submeshes,
                vertex_width: layout.width,
                vertex_buffer: welded.vertices,
                index_buffer: welded.indices,
                index_base: base,
                unique_vertex_count: welded.unique_count,
                draw_ranges,
            });
        }

        log::debug!("Built {} indices in {:?}", cursor.position(), started.elapsed());

        let reader = Reader {
            up_axis: self.up_axis,
            remap: self.remap,
            layout,
            options: self.options.clone(),
            geometries,
        };

        log::info!(
            "Converted {} geometries: {} vertices, {} indices, {} floats per vertex",
            reader.geometry_count(),
            reader.vertex_count(),
            reader.index_count(),
            reader.layout_width()
        );

        Ok(reader)
    }
}

/// Narrow the carried base to `u32`. The previous geometry may have used the
/// last representable index.
fn index_base(next_base: u64, geometry: &PendingGeometry) -> ConvertResult<u32> {
    u32::try_from(next_base).map_err(|_| ConvertError::IndexBaseOverflow {
        geometry: geometry.label(),
        base: next_base,
    })
}

/// Every submesh of a geometry must declare the same semantics as the first.
fn check_uniform_layout(geometry: &PendingGeometry, policy: LayoutPolicy) -> ConvertResult<()> {
    let Some((first, rest)) = geometry.submeshes.split_first() else {
        return Ok(());
    };

    for (i, submesh) in rest.iter().enumerate() {
        if submesh.offsets.same_layout(&first.offsets) {
            continue;
        }
        match policy {
            LayoutPolicy::Strict => {
                return Err(ConvertError::LayoutMismatch {
                    geometry: geometry.label(),
                    submesh: i + 1,
                })
            }
            LayoutPolicy::Lenient => log::warn!(
                "Geometry '{}': submesh {} declares a different semantic set than submesh 0",
                geometry.label(),
                i + 1
            ),
        }
    }

    Ok(())
}
