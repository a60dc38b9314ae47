//! The kramdown element tree.
//!
//! An [`Element`] either carries a literal `value` (text content, raw
//! HTML, math source) or `children`, never both semantically. The
//! attribute map keeps insertion order so that serialized attribute
//! lists come out the way the source document declared them.

use indexmap::IndexMap;

/// The closed set of element kinds a kramdown document tree contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Document root
    Root,
    /// A run of blank lines between block elements
    Blank,
    /// Plain text
    Text,
    /// Paragraph
    Paragraph,
    /// ATX header, level in [`ElementOptions::level`]
    Header,
    /// Block quote
    Blockquote,
    /// Indented code block, source in `value`
    CodeBlock,
    /// Horizontal rule
    HorizontalRule,
    /// Unordered list
    UnorderedList,
    /// Ordered list
    OrderedList,
    /// Definition list
    DefinitionList,
    /// Item of an ordered or unordered list
    ListItem,
    /// Term of a definition list
    DefinitionTerm,
    /// Description of a definition list term
    DefinitionDescription,
    /// Table, column alignment in [`ElementOptions::alignment`]
    Table,
    /// Table header section
    TableHead,
    /// Table body section
    TableBody,
    /// Table footer section
    TableFoot,
    /// Table row
    TableRow,
    /// Table data cell
    TableCell,
    /// Table header cell
    TableHeaderCell,
    /// Emphasis span
    Emphasis,
    /// Strong emphasis span
    Strong,
    /// Code span, content in `value`
    CodeSpan,
    /// Hyperlink, destination in the `href` attribute
    Link,
    /// Image, destination in the `src` attribute
    Image,
    /// Hard line break
    LineBreak,
    /// Raw HTML element, tag name in `value`
    HtmlElement,
    /// XML/HTML comment passthrough, full text in `value`
    XmlComment,
    /// XML processing instruction passthrough, full text in `value`
    XmlPi,
    /// HTML doctype passthrough, full text in `value`
    HtmlDoctype,
    /// kramdown comment extension
    Comment,
    /// Math element, TeX source in `value`
    Math,
    /// Footnote reference, name in [`ElementOptions::name`]
    Footnote,
    /// HTML entity, name or `#codepoint` in `value`
    Entity,
    /// Typographic symbol (dashes, ellipsis, guillemets), name in `value`
    TypographicSym,
    /// Smart quote, variant name in `value`
    SmartQuote,
    /// Abbreviation occurrence, text in `value`
    Abbreviation,
    /// Non-markdown passthrough, content in `value`
    Raw,
}

/// Whether an element occupies its own line(s) or flows inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Block,
    Span,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

/// How the content of an HTML element was parsed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseType {
    Block,
    Span,
    Raw,
}

/// Typed element options set by the parser and consulted during
/// rendering. Only the fields a renderer actually reads exist here;
/// everything defaults to "absent".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementOptions {
    /// Block/span override for kinds without a fixed category
    /// (HTML elements, comments, math, raw passthrough).
    pub category: Option<Category>,

    /// Heading level (1-6)
    pub level: Option<u8>,

    /// Paragraph exists only as a structural wrapper and must not
    /// produce its own block boundaries.
    pub transparent: bool,

    /// Per-column table alignment
    pub alignment: Vec<Alignment>,

    /// Footnote name
    pub name: Option<String>,

    /// Parse mode of an HTML element's content
    pub parse_type: Option<ParseType>,

    /// HTML element is the outermost of a raw HTML run
    pub outer_element: bool,

    /// Immediate parent was parsed as raw HTML
    pub parent_is_raw: bool,

    /// Original textual form of an entity (e.g. `&amp;`)
    pub original: Option<String>,

    /// Type annotation of a raw passthrough (e.g. `["html"]`)
    pub raw_types: Vec<String>,

    /// Attribute-list references attached to this element
    pub ial_refs: Vec<String>,
}

/// A node of the kramdown document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub value: Option<String>,
    pub attributes: IndexMap<String, String>,
    pub options: ElementOptions,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element of the given kind.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            value: None,
            attributes: IndexMap::new(),
            options: ElementOptions::default(),
            children: Vec::new(),
        }
    }

    /// Create a text element.
    pub fn text(content: &str) -> Self {
        let mut el = Self::new(ElementKind::Text);
        el.value = Some(content.to_string());
        el
    }

    /// Create an element of the given kind with a literal value.
    pub fn with_value(kind: ElementKind, value: &str) -> Self {
        let mut el = Self::new(kind);
        el.value = Some(value.to_string());
        el
    }

    /// Create an element of the given kind with children.
    pub fn container(kind: ElementKind, children: Vec<Element>) -> Self {
        let mut el = Self::new(kind);
        el.children = children;
        el
    }

    /// Append a child element.
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The category of this element: the explicit option override if
    /// present, otherwise the fixed per-kind category. `None` only for
    /// kinds whose category the parser must supply and didn't.
    pub fn category(&self) -> Option<Category> {
        use ElementKind::*;
        if let Some(category) = self.options.category {
            return Some(category);
        }
        match self.kind {
            Root | Blank | Paragraph | Header | Blockquote | CodeBlock | HorizontalRule
            | UnorderedList | OrderedList | DefinitionList | ListItem | DefinitionTerm
            | DefinitionDescription | Table | TableHead | TableBody | TableFoot | TableRow
            | TableCell | TableHeaderCell => Some(Category::Block),
            Text | Emphasis | Strong | CodeSpan | Link | Image | LineBreak | Footnote
            | Entity | TypographicSym | SmartQuote | Abbreviation => Some(Category::Span),
            HtmlElement | XmlComment | XmlPi | HtmlDoctype | Comment | Math | Raw => None,
        }
    }

    /// Check if this element is block-level.
    pub fn is_block(&self) -> bool {
        self.category() == Some(Category::Block)
    }

    /// Check if this element flows inline.
    pub fn is_span(&self) -> bool {
        self.category() == Some(Category::Span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_element() {
        let el = Element::text("Hello");
        assert_eq!(el.kind, ElementKind::Text);
        assert_eq!(el.value.as_deref(), Some("Hello"));
        assert!(el.children.is_empty());
        assert!(el.is_span());
    }

    #[test]
    fn test_container() {
        let el = Element::container(
            ElementKind::Paragraph,
            vec![Element::text("a"), Element::text("b")],
        );
        assert_eq!(el.children.len(), 2);
        assert!(el.is_block());
    }

    #[test]
    fn test_attributes_keep_order() {
        let mut el = Element::new(ElementKind::Header);
        el.set_attr("id", "intro");
        el.set_attr("class", "wide");
        let keys: Vec<&str> = el.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "class"]);
        assert_eq!(el.attr("id"), Some("intro"));
        assert_eq!(el.attr("title"), None);
    }

    #[test]
    fn test_category_override() {
        let mut el = Element::with_value(ElementKind::Math, "x^2");
        assert_eq!(el.category(), None);
        el.options.category = Some(Category::Block);
        assert!(el.is_block());
    }

    #[test]
    fn test_fixed_categories() {
        assert!(Element::new(ElementKind::Blockquote).is_block());
        assert!(Element::new(ElementKind::TableCell).is_block());
        assert!(Element::new(ElementKind::Emphasis).is_span());
        assert!(Element::new(ElementKind::Footnote).is_span());
    }
}
