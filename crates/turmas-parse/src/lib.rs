//! turmas-parse: raw table extraction for turmas.
//!
//! Interprets PDF page content streams via [lopdf] into positioned glyphs
//! and ruling edges, then finds tables with either the lattice strategy
//! (ruling lines) or the stream strategy (text alignment). CSV dumps
//! produced by an earlier run can be read back as tables too.

pub mod csv_source;
pub mod document;
pub mod error;
pub mod geometry;
pub mod interpreter;
pub mod lattice;
pub mod stream;
pub mod table;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use document::PdfDocument;
pub use error::BackendError;
pub use geometry::{BBox, Ctm, Edge, Orientation};
pub use interpreter::{Glyph, PageContent, interpret_page};
pub use lattice::LatticeSettings;
pub use stream::StreamSettings;
pub use table::{RawTable, Strategy, TableSettings};
pub use text::{Word, WordOptions};
