//! kramdown-ast - document tree types for the kramdown dialect
//!
//! This crate defines the element tree that a kramdown parser produces
//! and that the `kramdown-writer` crate serializes back to markup text.
//! It owns no parsing or rendering logic; it is the shared vocabulary
//! between the two.
//!
//! # Example
//!
//! ```rust
//! use kramdown_ast::{Element, ElementKind};
//!
//! let mut para = Element::new(ElementKind::Paragraph);
//! para.add_child(Element::text("Hello "));
//! para.add_child(Element::container(
//!     ElementKind::Strong,
//!     vec![Element::text("world")],
//! ));
//!
//! assert!(para.is_block());
//! assert_eq!(para.children.len(), 2);
//! ```

mod element;

pub use element::{Alignment, Category, Element, ElementKind, ElementOptions, ParseType};
