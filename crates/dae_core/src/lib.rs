//! DAE Core - COLLADA mesh conversion to render-ready buffers.
//!
//! This crate provides:
//!
//! - **Document reading**: COLLADA 1.4 XML, up-axis and geometry discovery
//! - **Mesh conversion**: per-corner gathering, vertex welding, draw ranges
//! - **Options**: float precision and strict/lenient policies, loadable from JSON
//!
//! Every geometry of a document is emitted with the same interleaved vertex
//! layout (position, then normal and texcoord when any geometry has them), and
//! all geometries share one continuous index namespace.
//!
//! # Example
//!
//! ```ignore
//! use dae_core::convert;
//!
//! let reader = convert("scene.dae")?;
//! println!("Converted {} geometries, {} floats per vertex",
//!     reader.geometry_count(),
//!     reader.layout_width());
//! ```

pub mod config;
pub mod document;
pub mod gather;
pub mod geometry;
pub mod layout;
pub mod numeric;
pub mod ranges;
pub mod reader;
pub mod source;
pub mod submesh;
pub mod weld;

// Re-export commonly used types
pub use config::{ConfigError, LayoutPolicy, NumericPolicy, ReaderOptions};
pub use document::{ColladaDocument, DocumentError};
pub use geometry::Geometry;
pub use layout::GlobalLayout;
pub use ranges::DrawRange;
pub use reader::{convert, convert_str, convert_with_options, ConvertError, ConvertResult, Reader};
pub use submesh::{PrimitiveKind, Submesh};
