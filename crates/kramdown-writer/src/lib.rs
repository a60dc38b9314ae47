//! # kramdown-writer
//!
//! Serialize a kramdown document tree back to kramdown markup text.
//!
//! The input is an [`Element`](kramdown_ast::Element) tree as produced
//! by a kramdown parser, plus the footnote and abbreviation definition
//! tables the parser collected alongside it. The output is a single
//! UTF-8 string that re-parses into an equivalent tree: attributes are
//! re-attached through inline attribute lists, links become numbered
//! reference definitions, and footnote bodies are emitted once after
//! the document body.
//!
//! ## Example
//!
//! ```rust
//! use kramdown_ast::{Element, ElementKind};
//! use kramdown_writer::{write_document, Definitions};
//!
//! let root = Element::container(
//!     ElementKind::Root,
//!     vec![Element::container(
//!         ElementKind::Paragraph,
//!         vec![Element::text("Hello world")],
//!     )],
//! );
//!
//! let out = write_document(&root, &Definitions::default()).unwrap();
//! assert_eq!(out, "Hello world\n");
//! ```

mod context;
mod entities;
mod ial;
mod writer;

pub use context::RenderContext;
pub use writer::Writer;

use indexmap::IndexMap;
use kramdown_ast::Element;

/// Error type for serialization.
///
/// Every variant is a contract violation by the tree producer; the
/// render aborts rather than emitting corrupt markup.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("unknown typographic symbol: {0}")]
    UnknownTypographicSym(String),

    #[error("unknown smart quote variant: {0}")]
    UnknownSmartQuote(String),

    #[error("no definition for footnote: {0}")]
    MissingFootnote(String),
}

pub type Result<T> = std::result::Result<T, WriteError>;

/// Deferred definitions collected by the parser and supplied to the
/// writer alongside the tree: footnote bodies by name, and
/// abbreviation expansions by name. Both are emitted after the
/// document body, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub footnotes: IndexMap<String, Element>,
    pub abbreviations: IndexMap<String, String>,
}

/// Serialize a document tree to kramdown markup.
///
/// Convenience wrapper that builds a single-use [`Writer`] and runs it.
pub fn write_document(root: &Element, definitions: &Definitions) -> Result<String> {
    Writer::new(definitions).write(root)
}
