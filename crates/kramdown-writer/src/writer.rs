//! The kramdown serializer.
//!
//! Walks the element tree once, dispatching on the element kind, and
//! accumulates link references and footnotes on the way; after the
//! body is rendered the collected definitions are flushed in a fixed
//! order (link references, footnotes, abbreviations).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use kramdown_ast::{Alignment, Category, Element, ElementKind, ParseType};

use crate::context::RenderContext;
use crate::entities;
use crate::ial::{html_attributes, ial_for_element};
use crate::{Definitions, Result, WriteError};

/// Characters that would be re-parsed as markup and need a backslash,
/// plus a colon in the first three columns of a line.
static ESCAPED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(\$\$|[\\*_`\[\]{}"'])|^[ ]{0,3}(:)"#).unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sequences at the start of a paragraph that would be misread as
/// block syntax: a header or table marker, an ordered list marker, or
/// a bullet marker.
static PARAGRAPH_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?:([#|])|([0-9]+)\.|([+-]\s))").unwrap());

/// Block HTML elements that always render a paired open/close tag,
/// even when empty.
const HTML_TAGS_WITH_BODY: &[&str] = &["div", "script"];

/// A single-use kramdown renderer.
///
/// The deferred reference tables live on the writer, so one writer
/// value serves exactly one render; [`Writer::write`] consumes `self`
/// to make reuse impossible.
pub struct Writer<'a> {
    definitions: &'a Definitions,
    linkrefs: Vec<&'a Element>,
    footnotes: Vec<(&'a str, &'a Element)>,
}

impl<'a> Writer<'a> {
    /// Create a writer for one render, borrowing the footnote and
    /// abbreviation definition tables collected by the parser.
    pub fn new(definitions: &'a Definitions) -> Self {
        Self {
            definitions,
            linkrefs: Vec::new(),
            footnotes: Vec::new(),
        }
    }

    /// Render the document tree rooted at `root`.
    pub fn write(mut self, root: &'a Element) -> Result<String> {
        self.convert(root, &RenderContext::default())
    }

    /// Render a single element, then apply the post-element spacing
    /// policy: attribute annotation, the `^` separation escape between
    /// containers that would visually merge, or a blank line between
    /// block siblings.
    fn convert(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        use ElementKind::*;

        let mut res = match el.kind {
            Root => {
                let mut res = self.inner(el, ctx)?;
                res.push_str(&self.link_defs());
                res.push_str(&self.footnote_defs()?);
                res.push_str(&self.abbrev_defs());
                res
            }
            Blank => String::new(),
            Text => self.convert_text(el, ctx),
            Paragraph => self.convert_paragraph(el, ctx)?,
            Header => self.convert_header(el, ctx)?,
            Blockquote => self.convert_blockquote(el, ctx)?,
            CodeBlock => convert_codeblock(el),
            HorizontalRule => "* * *\n".to_string(),
            UnorderedList | OrderedList | DefinitionList => self.convert_list(el, ctx)?,
            ListItem => self.convert_list_item(el, ctx)?,
            DefinitionTerm => {
                let mut res = self.inner(el, ctx)?;
                res.push('\n');
                res
            }
            DefinitionDescription => self.convert_description(el, ctx)?,
            Table => self.convert_table(el, ctx)?,
            TableHead => self.convert_table_head(el, ctx)?,
            TableBody => self.convert_table_body(el, ctx)?,
            TableFoot => format!("|{}\n{}", "=".repeat(10), self.inner(el, ctx)?),
            TableRow => self.convert_table_row(el, ctx)?,
            TableCell | TableHeaderCell => self.inner(el, ctx)?.replace('|', "\\|"),
            Emphasis => format!("*{}*", self.inner(el, ctx)?),
            Strong => format!("**{}**", self.inner(el, ctx)?),
            CodeSpan => convert_codespan(el),
            Link => self.convert_link(el, ctx)?,
            Image => convert_image(el),
            LineBreak => "  \n".to_string(),
            HtmlElement => self.convert_html_element(el, ctx)?,
            XmlComment | XmlPi | HtmlDoctype => convert_xml_passthrough(el),
            Comment => convert_comment(el),
            Math => convert_math(el, ctx),
            Footnote => self.convert_footnote(el)?,
            Entity => entities::entity_to_str(value_of(el), el.options.original.as_deref())?,
            TypographicSym => entities::typographic_sym_to_str(value_of(el))?.to_string(),
            SmartQuote => entities::smart_quote_to_str(value_of(el))?.to_string(),
            Abbreviation => value_of(el).to_string(),
            Raw => convert_raw(el, ctx),
        };

        // List items, descriptions, and HTML elements manage their own
        // trailing whitespace and attribute annotations.
        let ial = match el.kind {
            HtmlElement | ListItem | DefinitionDescription => None,
            _ => ial_for_element(el),
        };
        if let Some(ial) = ial {
            res.push_str(&ial);
            if el.is_block() {
                res.push_str("\n\n");
            }
        } else if matches!(el.kind, UnorderedList | OrderedList | DefinitionList | CodeBlock)
            && merges_with_next(el, ctx)
        {
            res.push_str("^\n\n");
        } else if el.is_block()
            && !matches!(
                el.kind,
                ListItem
                    | DefinitionDescription
                    | DefinitionTerm
                    | TableCell
                    | TableHeaderCell
                    | TableRow
                    | TableHead
                    | TableBody
                    | TableFoot
                    | Blank
            )
            && ctx.next.is_some()
            && !(el.kind == Paragraph && el.options.transparent)
        {
            res.push('\n');
        }
        Ok(res)
    }

    /// Render the children of `el`, deriving a sibling-aware context
    /// for each.
    fn inner(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let mut result = String::new();
        for (index, child) in el.children.iter().enumerate() {
            let child_ctx = ctx.for_child(el, index);
            result.push_str(&self.convert(child, &child_ctx)?);
        }
        Ok(result)
    }

    fn convert_text(&self, el: &Element, ctx: &RenderContext) -> String {
        let value = value_of(el);
        if ctx.raw_text {
            return value.to_string();
        }
        let ends_with_newline = value.ends_with('\n');
        let after_break = ctx
            .prev
            .map_or(false, |prev| prev.kind == ElementKind::LineBreak);
        // A leading newline right after a hard break is redundant; one
        // anywhere else collapses to a space below.
        let text = if after_break {
            value.strip_prefix('\n').unwrap_or(value)
        } else {
            value
        };
        let collapsed = WHITESPACE.replace_all(text, " ");
        let mut escaped = ESCAPED_CHARS
            .replace_all(&collapsed, |caps: &Captures| {
                let c = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or("", |m| m.as_str());
                format!("\\{}", c)
            })
            .into_owned();
        if ends_with_newline {
            escaped.push('\n');
        }
        escaped
    }

    fn convert_paragraph(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let inner = self.inner(el, ctx)?;
        let escaped = PARAGRAPH_START.replace(inner.trim(), |caps: &Captures| {
            if let Some(m) = caps.get(1).or_else(|| caps.get(3)) {
                format!("\\{}", m.as_str())
            } else {
                format!("{}\\.", &caps[2])
            }
        });
        Ok(format!("{}\n", escaped))
    }

    fn convert_header(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let level = el.options.level.unwrap_or(1) as usize;
        let mut res = format!("{} {}", "#".repeat(level), self.inner(el, ctx)?);
        if let Some(id) = el.attr("id") {
            res.push_str(&format!("   {{#{}}}", id));
        }
        res.push('\n');
        Ok(res)
    }

    fn convert_blockquote(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let inner = self.inner(el, ctx)?;
        let mut res = String::new();
        for (i, line) in split_lines(&inner).iter().enumerate() {
            if i > 0 {
                res.push('\n');
            }
            res.push_str("> ");
            res.push_str(line);
        }
        res.push('\n');
        Ok(res)
    }

    /// Lists collapse any run of trailing newlines to exactly one.
    fn convert_list(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let inner = self.inner(el, ctx)?;
        if inner.ends_with('\n') {
            Ok(format!("{}\n", inner.trim_end_matches('\n')))
        } else {
            Ok(inner)
        }
    }

    fn convert_list_item(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let first_child = el.children.first();
        let first_is_codeblock = first_child.map_or(false, |c| c.kind == ElementKind::CodeBlock);
        let in_unordered = ctx
            .parent
            .map_or(false, |p| p.kind == ElementKind::UnorderedList);

        let (mut sym, width) = if in_unordered {
            ("* ".to_string(), if first_is_codeblock { 4 } else { 2 })
        } else {
            (format!("{:<4}", format!("{}.", ctx.index + 1)), 4)
        };
        if let Some(ial) = ial_for_element(el) {
            sym.push_str(&ial);
            sym.push(' ');
        }

        let inner = self.inner(el, ctx)?;
        let lines = split_lines(&inner);
        let first = lines.first().copied().unwrap_or("");
        let rest: Vec<String> = lines[lines.len().min(1)..]
            .iter()
            .map(|line| format!("{}{}", " ".repeat(width), line))
            .collect();
        let last = if rest.is_empty() {
            "\n".to_string()
        } else {
            format!("\n{}\n", rest.join("\n"))
        };

        let first_is_literal_para = first_child
            .map_or(false, |c| c.kind == ElementKind::Paragraph && !c.options.transparent);
        if first_is_literal_para {
            let mut res = format!("{}{}\n{}", sym, first, last);
            if let Some(parent) = ctx.parent {
                let mixed_content = parent.children.iter().any(|c| {
                    c.children
                        .first()
                        .map_or(true, |f| f.kind != ElementKind::Paragraph)
                });
                if el.children.len() == 1
                    && ctx.next.is_none()
                    && (mixed_content || parent.children.len() == 1)
                {
                    res.push_str("^\n");
                }
            }
            Ok(res)
        } else if first_is_codeblock {
            Ok(format!("{}\n    {}{}", sym, first, last))
        } else {
            Ok(format!("{}{}{}", sym, first, last))
        }
    }

    fn convert_description(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let first_child = el.children.first();
        let first_is_codeblock = first_child.map_or(false, |c| c.kind == ElementKind::CodeBlock);
        let mut sym = ": ".to_string();
        let width = if first_is_codeblock { 4 } else { 2 };
        if let Some(ial) = ial_for_element(el) {
            sym.push_str(&ial);
            sym.push(' ');
        }

        let inner = self.inner(el, ctx)?;
        let lines = split_lines(&inner);
        let first = lines.first().copied().unwrap_or("");
        let rest: Vec<String> = lines[lines.len().min(1)..]
            .iter()
            .map(|line| format!("{}{}", " ".repeat(width), line))
            .collect();
        let text = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}\n{}", first, rest.join("\n"))
        };

        let first_is_literal_para = first_child
            .map_or(false, |c| c.kind == ElementKind::Paragraph && !c.options.transparent);
        if first_is_literal_para {
            Ok(format!("\n{}{}\n", sym, text))
        } else if first_is_codeblock {
            Ok(format!("{}\n    {}\n", sym, text))
        } else {
            Ok(format!("{}{}\n", sym, text))
        }
    }

    fn convert_table(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let mut table_ctx = *ctx;
        table_ctx.alignment = &el.options.alignment;
        self.inner(el, &table_ctx)
    }

    fn convert_table_head(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let rows = self.inner(el, ctx)?;
        if ctx.alignment.iter().all(|a| *a == Alignment::Default) {
            Ok(format!("{}|{}\n", rows, "-".repeat(10)))
        } else {
            let columns: Vec<&str> = ctx
                .alignment
                .iter()
                .map(|a| match a {
                    Alignment::Left => ":-",
                    Alignment::Right => "-:",
                    Alignment::Center => ":-:",
                    Alignment::Default => "-",
                })
                .collect();
            Ok(format!("{}| {}\n", rows, columns.join(" ")))
        }
    }

    fn convert_table_body(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let mut res = self.inner(el, ctx)?;
        if ctx
            .next
            .map_or(false, |next| next.kind == ElementKind::TableBody)
        {
            res.push_str(&format!("|{}\n", "-".repeat(10)));
        }
        Ok(res)
    }

    fn convert_table_row(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let mut cells = Vec::with_capacity(el.children.len());
        for cell in &el.children {
            cells.push(self.convert(cell, ctx)?);
        }
        Ok(format!("| {} |\n", cells.join(" | ")))
    }

    fn convert_link(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let href = el.attr("href").unwrap_or("");
        let inner = self.inner(el, ctx)?;
        if href.is_empty() {
            Ok(format!("[{}]()", inner))
        } else {
            self.linkrefs.push(el);
            Ok(format!("[{}][{}]", inner, self.linkrefs.len()))
        }
    }

    fn convert_html_element(&mut self, el: &'a Element, ctx: &RenderContext<'a>) -> Result<String> {
        let name = value_of(el);
        let markdown_attr = el.is_block()
            && el.children.iter().any(|c| {
                c.kind != ElementKind::HtmlElement
                    && (c.kind != ElementKind::Paragraph || !c.options.transparent)
                    && c.is_block()
            });

        let mut child_ctx = *ctx;
        if matches!(name, "script" | "pre" | "code") {
            child_ctx.force_raw_text = true;
        }
        child_ctx.raw_text = child_ctx.force_raw_text
            || child_ctx.block_raw_text
            || (el.category() != Some(Category::Span) && !markdown_attr);
        if el.is_block() && child_ctx.raw_text {
            child_ctx.block_raw_text = true;
        }
        let res = self.inner(el, &child_ctx)?;

        let attrs = html_attributes(el);
        if el.category() == Some(Category::Span) {
            return Ok(if res.is_empty() {
                format!("<{}{} />", name, attrs)
            } else {
                format!("<{}{}>{}</{}>", name, attrs, res, name)
            });
        }

        let mut output = format!("<{}{}", name, attrs);
        if markdown_attr {
            output.push_str(" markdown=\"1\"");
        }
        if !res.is_empty() && el.options.parse_type != Some(ParseType::Block) {
            output.push_str(&format!(">{}</{}>", res, name));
        } else if !res.is_empty() {
            output.push_str(&format!(">\n{}</{}>", res, name));
        } else if HTML_TAGS_WITH_BODY.contains(&name) {
            output.push_str(&format!("></{}>", name));
        } else {
            output.push_str(" />");
        }
        if el.options.outer_element || !el.options.parent_is_raw {
            output.push('\n');
        }
        Ok(output)
    }

    /// Footnote references register their body on first encounter and
    /// emit the name marker every time.
    fn convert_footnote(&mut self, el: &'a Element) -> Result<String> {
        let name = el.options.name.as_deref().unwrap_or("");
        if !self.footnotes.iter().any(|(n, _)| *n == name) {
            let content = self
                .definitions
                .footnotes
                .get(name)
                .ok_or_else(|| WriteError::MissingFootnote(name.to_string()))?;
            self.footnotes.push((name, content));
        }
        Ok(format!("[^{}]", name))
    }

    fn link_defs(&self) -> String {
        if self.linkrefs.is_empty() {
            return String::new();
        }
        let mut res = "\n\n".to_string();
        for (i, el) in self.linkrefs.iter().enumerate() {
            let link = el.attr("href").unwrap_or("");
            let link = if link.contains(' ') {
                format!("<{}>", link)
            } else {
                link.to_string()
            };
            let title = el
                .attr("title")
                .map(|t| format!("\"{}\"", t.replace('"', "&quot;")))
                .unwrap_or_default();
            res.push_str(&format!("[{}]: {} {}\n", i + 1, link, title));
        }
        res
    }

    fn footnote_defs(&mut self) -> Result<String> {
        if self.footnotes.is_empty() {
            return Ok(String::new());
        }
        let mut res = "\n".to_string();
        // Rendering a body can reference further footnotes; the index
        // loop picks up entries registered while flushing.
        let mut index = 0;
        while index < self.footnotes.len() {
            let (name, content) = self.footnotes[index];
            res.push_str(&format!("\n[^{}]:\n", name));
            let body = self.inner(content, &RenderContext::default())?;
            for (i, line) in split_lines(&body).iter().enumerate() {
                if i > 0 {
                    res.push('\n');
                }
                res.push_str("    ");
                res.push_str(line);
            }
            res.push('\n');
            index += 1;
        }
        Ok(res)
    }

    fn abbrev_defs(&self) -> String {
        let mut res = String::new();
        for (name, text) in &self.definitions.abbreviations {
            res.push_str(&format!("*[{}]: {}\n", name, text));
        }
        res
    }
}

/// Whether the next sibling (looking through one blank element) is a
/// container that would visually merge with this one on re-parse.
fn merges_with_next(el: &Element, ctx: &RenderContext) -> bool {
    let merges = |kind: ElementKind| kind == el.kind || kind == ElementKind::CodeBlock;
    match ctx.next.map(|next| next.kind) {
        Some(ElementKind::Blank) => ctx.nnext.map_or(false, |nnext| merges(nnext.kind)),
        Some(kind) => merges(kind),
        None => false,
    }
}

fn convert_codeblock(el: &Element) -> String {
    let mut res = String::new();
    for (i, line) in split_lines(value_of(el)).iter().enumerate() {
        if i > 0 {
            res.push('\n');
        }
        res.push_str("    ");
        res.push_str(line);
    }
    res.push('\n');
    res
}

fn convert_codespan(el: &Element) -> String {
    let value = value_of(el);
    let delim = "`".repeat(longest_backtick_run(value) + 1);
    let pad = if delim.len() > 1 { " " } else { "" };
    format!("{delim}{pad}{value}{pad}{delim}")
}

fn convert_image(el: &Element) -> String {
    let src = el.attr("src").unwrap_or("");
    let alt = el.attr("alt").unwrap_or("");
    let dest = if src.contains(' ') {
        format!("<{}>", src)
    } else {
        src.to_string()
    };
    let title = el
        .attr("title")
        .map(|t| format!(" \"{}\"", t.replace('"', "&quot;")))
        .unwrap_or_default();
    format!("![{}]({}{})", alt, dest, title)
}

fn convert_xml_passthrough(el: &Element) -> String {
    let value = value_of(el);
    if el.is_block() && !el.options.parent_is_raw {
        format!("{}\n", value)
    } else {
        value.to_string()
    }
}

fn convert_comment(el: &Element) -> String {
    let value = value_of(el);
    if el.is_block() {
        format!("{{::comment}}\n{}\n{{:/}}\n", value)
    } else {
        format!("{{::comment}}{}{{:/}}", value)
    }
}

fn convert_math(el: &Element, ctx: &RenderContext) -> String {
    let in_paragraph_start = ctx
        .parent
        .map_or(false, |p| p.kind == ElementKind::Paragraph)
        && ctx.prev.is_none();
    let mut res = String::new();
    if in_paragraph_start {
        // Keep a leading display-math span from opening a math block.
        res.push('\\');
    }
    res.push_str("$$");
    res.push_str(value_of(el));
    res.push_str("$$");
    if el.is_block() {
        res.push('\n');
    }
    res
}

fn convert_raw(el: &Element, ctx: &RenderContext) -> String {
    let value = value_of(el);
    if ctx
        .parent
        .map_or(false, |p| p.kind == ElementKind::HtmlElement)
    {
        return value.to_string();
    }
    let types = el.options.raw_types.join(" ");
    let attr = if types.is_empty() {
        String::new()
    } else {
        format!(" type=\"{}\"", types)
    };
    if el.is_block() {
        format!("{{::nomarkdown{}}}\n{}\n{{:/}}\n", attr, value)
    } else {
        format!("{{::nomarkdown{}}}{}{{:/}}", attr, value)
    }
}

fn value_of(el: &Element) -> &str {
    el.value.as_deref().unwrap_or("")
}

/// Split into lines, dropping trailing empty segments so that a final
/// newline does not produce a phantom last line.
fn split_lines(s: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = s.split('\n').collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn longest_backtick_run(s: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in s.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
