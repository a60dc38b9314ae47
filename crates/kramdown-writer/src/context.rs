//! Per-call rendering context.
//!
//! Instead of a shared mutable ancestor stack, every recursive call
//! owns an immutable context naming its parent, its position among its
//! siblings, and the inherited literal-text flags. Each call frame
//! derives fresh contexts for its children, so no push/pop discipline
//! is needed and the ancestor information cannot get out of sync when
//! a render aborts mid-tree.

use kramdown_ast::{Alignment, Element};

/// Context for rendering a single element.
///
/// The sibling pointers look one and two elements in each direction;
/// the two-step lookahead is what lets the spacing policy see through
/// a blank element to the container that follows it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    /// The element whose children are being rendered
    pub parent: Option<&'a Element>,

    /// Index of the current child within its parent
    pub index: usize,

    /// Previous sibling
    pub prev: Option<&'a Element>,

    /// Sibling two back
    pub pprev: Option<&'a Element>,

    /// Next sibling
    pub next: Option<&'a Element>,

    /// Sibling two ahead
    pub nnext: Option<&'a Element>,

    /// Render descendant text verbatim, without escaping
    pub raw_text: bool,

    /// A block-level HTML ancestor already switched to raw text;
    /// descendants stay raw regardless of their own content
    pub block_raw_text: bool,

    /// An element that never holds markup (script/pre/code) forces
    /// raw text on everything below it
    pub force_raw_text: bool,

    /// Column alignment of the enclosing table
    pub alignment: &'a [Alignment],
}

impl<'a> RenderContext<'a> {
    /// Derive the context for the child at `index` of `parent`,
    /// inheriting the literal-text flags and table alignment.
    pub(crate) fn for_child(&self, parent: &'a Element, index: usize) -> Self {
        let children = &parent.children;
        Self {
            parent: Some(parent),
            index,
            prev: index.checked_sub(1).and_then(|i| children.get(i)),
            pprev: index.checked_sub(2).and_then(|i| children.get(i)),
            next: children.get(index + 1),
            nnext: children.get(index + 2),
            ..*self
        }
    }
}
