//! Interleaved vertex layout shared by every geometry of a document.

use crate::source::AttributeSources;

/// Which attributes each interleaved vertex carries, and in what float count.
///
/// Resolved once per document: if any geometry has normals (or texcoords),
/// every vertex of every geometry carries them. Element order is always
/// position, normal, texcoord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalLayout {
    pub has_normals: bool,
    pub has_texcoords: bool,
    /// Floats per vertex.
    pub width: usize,
}

impl Default for GlobalLayout {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl GlobalLayout {
    pub const POSITION_WIDTH: usize = 3;
    pub const NORMAL_WIDTH: usize = 3;
    pub const TEXCOORD_WIDTH: usize = 2;

    pub fn new(has_normals: bool, has_texcoords: bool) -> Self {
        let mut width = Self::POSITION_WIDTH;
        if has_normals {
            width += Self::NORMAL_WIDTH;
        }
        if has_texcoords {
            width += Self::TEXCOORD_WIDTH;
        }
        Self {
            has_normals,
            has_texcoords,
            width,
        }
    }

    /// Scan geometries in order until both optional attributes have been seen.
    pub fn resolve<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a AttributeSources>,
    {
        let mut has_normals = false;
        let mut has_texcoords = false;

        for geometry in sources {
            if has_normals && has_texcoords {
                break;
            }
            has_normals |= geometry.has_normals();
            has_texcoords |= geometry.has_texcoords();
        }

        Self::new(has_normals, has_texcoords)
    }

    /// Float offset of the normal within a vertex.
    pub fn normal_offset(&self) -> Option<usize> {
        self.has_normals.then_some(Self::POSITION_WIDTH)
    }

    /// Float offset of the texcoord within a vertex.
    pub fn texcoord_offset(&self) -> Option<usize> {
        let offset = Self::POSITION_WIDTH + if self.has_normals { Self::NORMAL_WIDTH } else { 0 };
        self.has_texcoords.then_some(offset)
    }
}
