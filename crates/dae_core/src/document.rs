//! Read-only access to a parsed COLLADA document.
//!
//! COLLADA files put everything in a default namespace (1.4 uses
//! `http://www.collada.org/2005/11/COLLADASchema`). Elements are matched by
//! local name within the namespace of the `<COLLADA>` root. Documents that
//! declare no namespace at all are accepted as well.

use std::borrow::Cow;
use std::path::Path;

use dae_math::UpAxis;
use roxmltree::{Document, Node};
use thiserror::Error;

/// Namespace used by COLLADA 1.4 documents.
pub const COLLADA_1_4_NAMESPACE: &str = "http://www.collada.org/2005/11/COLLADASchema";

/// Errors that can occur while loading a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Root element is <{0}>, expected <COLLADA>")]
    NotCollada(String),
}

/// Result type for document loading.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Read a document from disk.
///
/// The returned text is what [`ColladaDocument::parse`] borrows from.
pub fn read_document_text<P: AsRef<Path>>(path: P) -> DocumentResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// A parsed COLLADA document.
pub struct ColladaDocument<'input> {
    doc: Document<'input>,
}

impl<'input> ColladaDocument<'input> {
    /// Parse document text and check that the root is `<COLLADA>`.
    pub fn parse(text: &'input str) -> DocumentResult<Self> {
        let doc = Document::parse(text)?;
        let root = doc.root_element();
        if root.tag_name().name() != "COLLADA" {
            return Err(DocumentError::NotCollada(root.tag_name().name().to_string()));
        }
        if root.tag_name().namespace() != Some(COLLADA_1_4_NAMESPACE) {
            log::debug!(
                "COLLADA root namespace is {:?}, matching elements within it",
                root.tag_name().namespace()
            );
        }
        Ok(Self { doc })
    }

    /// The `<COLLADA>` element.
    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// Text of `/COLLADA/asset/up_axis`, if declared.
    pub fn up_axis_text(&self) -> Option<Cow<'_, str>> {
        let asset = child(self.root(), "asset")?;
        let up_axis = child(asset, "up_axis")?;
        Some(text(up_axis))
    }

    /// The declared up-axis, defaulting to Z-up when absent or unrecognised.
    pub fn up_axis(&self) -> UpAxis {
        match self.up_axis_text() {
            None => UpAxis::default(),
            Some(declared) => UpAxis::parse(&declared).unwrap_or_else(|| {
                log::warn!("Unrecognised up_axis {:?}, assuming Z_UP", declared.trim());
                UpAxis::default()
            }),
        }
    }

    /// All `/COLLADA/library_geometries/geometry` elements in document order.
    pub fn geometries(&self) -> Vec<Node<'_, 'input>> {
        children(self.root(), "library_geometries")
            .flat_map(|library| children(library, "geometry"))
            .collect()
    }
}

/// Child elements of `node` named `name` in the same namespace as `node`.
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    let namespace = node.tag_name().namespace();
    node.children().filter(move |n| {
        n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == namespace
    })
}

/// First child element of `node` named `name`.
pub fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// Text content of an element, empty when it has none.
///
/// All descendant text nodes are joined, so a comment inside an array does not
/// cut it short. The common single-text-node case borrows.
pub fn text<'a>(node: Node<'a, '_>) -> Cow<'a, str> {
    let mut parts = node.descendants().filter(|n| n.is_text()).filter_map(|n| n.text());
    let Some(first) = parts.next() else {
        return Cow::Borrowed("");
    };
    match parts.next() {
        None => Cow::Borrowed(first),
        Some(second) => {
            let mut joined = String::with_capacity(first.len() + second.len());
            joined.push_str(first);
            joined.push_str(second);
            parts.for_each(|part| joined.push_str(part));
            Cow::Owned(joined)
        }
    }
}
