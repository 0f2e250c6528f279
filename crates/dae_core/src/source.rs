//! Attribute source collection.
//!
//! A `<mesh>` declares its attribute data as `<source>` elements, each holding
//! a `<float_array>`. Exporters do not agree on how sources are linked to
//! semantics, so sources are classified by their `id` instead:
//!
//! - `...position...` → positions (Blender `-mesh-positions`, 3ds Max `-POSITION`)
//! - `...normal...` → normals
//! - `...map...` / `...-uv...` → texture coordinates (Blender `-map-0`, 3ds Max `-UV0`)

use roxmltree::Node;
use thiserror::Error;

use crate::document::{child, children, text};
use crate::numeric::{read_values, NumericError, NumericOptions};

/// Errors that can occur while reading attribute sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source '{id}': {error}")]
    Numeric {
        id: String,
        #[source]
        error: NumericError,
    },

    #[error("Source '{id}' has accessor stride {stride}, expected {expected}")]
    BadStride {
        id: String,
        stride: usize,
        expected: usize,
    },
}

/// Result type for source collection.
pub type SourceResult<T> = Result<T, SourceError>;

/// Kind of attribute data a source holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Position,
    Normal,
    Texcoord,
}

impl SourceKind {
    /// Classify a source by its `id` (case-insensitive substring match).
    pub fn classify(id: &str) -> Option<Self> {
        let id = id.to_lowercase();
        if id.contains("position") {
            Some(SourceKind::Position)
        } else if id.contains("normal") {
            Some(SourceKind::Normal)
        } else if id.contains("map") || id.contains("-uv") {
            Some(SourceKind::Texcoord)
        } else {
            None
        }
    }

    /// Floats per entry in the collected array.
    pub fn components(self) -> usize {
        match self {
            SourceKind::Position | SourceKind::Normal => 3,
            SourceKind::Texcoord => 2,
        }
    }
}

/// Flat attribute arrays of one geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSources {
    /// 3 floats per entry, as stored in the document (not yet remapped).
    pub positions: Vec<f32>,

    /// 3 floats per entry, empty when the geometry has no normals.
    pub normals: Vec<f32>,

    /// 2 floats per entry, empty when the geometry has no texture coordinates.
    pub texcoords: Vec<f32>,
}

impl AttributeSources {
    pub fn position_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    fn slot(&mut self, kind: SourceKind) -> &mut Vec<f32> {
        match kind {
            SourceKind::Position => &mut self.positions,
            SourceKind::Normal => &mut self.normals,
            SourceKind::Texcoord => &mut self.texcoords,
        }
    }
}

/// Collect the position, normal and texcoord arrays of a `<mesh>`.
///
/// Sources whose id matches no known pattern are ignored. When two sources
/// share a kind the later one wins.
pub fn collect_sources(mesh: Node, options: &NumericOptions) -> SourceResult<AttributeSources> {
    let mut sources = AttributeSources::default();

    for source in children(mesh, "source") {
        let Some(id) = source.attribute("id") else {
            continue;
        };
        let Some(kind) = SourceKind::classify(id) else {
            log::debug!("Ignoring source '{}'", id);
            continue;
        };
        let Some(array) = source_array(source) else {
            log::debug!("Source '{}' has no array element", id);
            continue;
        };

        let values: Vec<f32> = read_values(&text(array), options).map_err(|error| SourceError::Numeric {
            id: id.to_string(),
            error,
        })?;
        let values = restride(id, values, accessor_stride(source), kind)?;

        let slot = sources.slot(kind);
        if !slot.is_empty() {
            log::debug!("Source '{}' replaces an earlier {:?} source", id, kind);
        }
        *slot = values;
    }

    Ok(sources)
}

/// First child element whose name contains `array` (`float_array` in practice).
fn source_array<'a, 'input>(source: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    source
        .children()
        .find(|n| n.is_element() && n.tag_name().name().contains("array"))
}

/// `technique_common/accessor@stride`, if declared and valid.
fn accessor_stride(source: Node) -> Option<usize> {
    let accessor = child(child(source, "technique_common")?, "accessor")?;
    accessor.attribute("stride")?.trim().parse().ok()
}

/// Normalise an array to `kind.components()` floats per entry.
///
/// Texture coordinates exported as UVW (stride 3) keep only U and V.
fn restride(id: &str, values: Vec<f32>, stride: Option<usize>, kind: SourceKind) -> SourceResult<Vec<f32>> {
    let expected = kind.components();
    let stride = stride.unwrap_or(expected);

    if stride == expected {
        return Ok(values);
    }

    if kind != SourceKind::Texcoord || stride < expected {
        return Err(SourceError::BadStride {
            id: id.to_string(),
            stride,
            expected,
        });
    }

    if values.len() % stride != 0 {
        log::warn!(
            "Source '{}' has {} values, not a multiple of stride {}",
            id,
            values.len(),
            stride
        );
    }

    Ok(values
        .chunks_exact(stride)
        .flat_map(|entry| entry[..expected].iter().copied())
        .collect())
}
