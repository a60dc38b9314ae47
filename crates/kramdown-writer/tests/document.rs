//! Whole-document serialization tests.

use kramdown_ast::{Alignment, Element, ElementKind};
use kramdown_writer::{write_document, Definitions};

fn para(children: Vec<Element>) -> Element {
    Element::container(ElementKind::Paragraph, children)
}

fn text_para(text: &str) -> Element {
    para(vec![Element::text(text)])
}

fn transparent_para(text: &str) -> Element {
    let mut p = text_para(text);
    p.options.transparent = true;
    p
}

fn item(text: &str) -> Element {
    Element::container(ElementKind::ListItem, vec![transparent_para(text)])
}

#[test]
fn test_full_document() {
    let mut title = Element::container(ElementKind::Header, vec![Element::text("Title")]);
    title.options.level = Some(1);
    title.set_attr("id", "top");

    let mut link = Element::container(ElementKind::Link, vec![Element::text("this")]);
    link.set_attr("href", "http://example.com");
    link.set_attr("title", "Example");
    let intro = para(vec![
        Element::text("See "),
        link,
        Element::text(" and "),
        Element::container(ElementKind::Emphasis, vec![Element::text("that")]),
        Element::text("."),
    ]);

    let quote = Element::container(ElementKind::Blockquote, vec![text_para("Quoted.")]);

    let list = Element::container(ElementKind::UnorderedList, vec![item("one"), item("two")]);

    let code = Element::with_value(ElementKind::CodeBlock, "let x = 1;\n");

    let mut footnote = Element::new(ElementKind::Footnote);
    footnote.options.name = Some("note1".to_string());
    let closing = para(vec![
        Element::text("The "),
        Element::with_value(ElementKind::Abbreviation, "WWW"),
        Element::text(" rocks"),
        footnote,
    ]);

    let root = Element::container(
        ElementKind::Root,
        vec![
            title,
            intro,
            quote,
            list,
            code,
            Element::new(ElementKind::HorizontalRule),
            closing,
        ],
    );

    let mut definitions = Definitions::default();
    definitions.footnotes.insert(
        "note1".to_string(),
        Element::container(ElementKind::Root, vec![text_para("A note.")]),
    );
    definitions
        .abbreviations
        .insert("WWW".to_string(), "World Wide Web".to_string());

    let out = write_document(&root, &definitions).unwrap();
    let expected = concat!(
        "# Title   {#top}\n\n",
        "See [this][1] and *that*.\n\n",
        "> Quoted.\n\n",
        "* one\n* two\n^\n\n",
        "    let x = 1;\n\n",
        "* * *\n\n",
        "The WWW rocks[^note1]\n",
        "\n\n[1]: http://example.com \"Example\"\n",
        "\n\n[^note1]:\n    A note.\n",
        "*[WWW]: World Wide Web\n",
    );
    assert_eq!(out, expected);
}

#[test]
fn test_document_with_table_and_nested_list() {
    let cell = |t: &str| Element::container(ElementKind::TableCell, vec![Element::text(t)]);
    let head = Element::container(
        ElementKind::TableHead,
        vec![Element::container(
            ElementKind::TableRow,
            vec![cell("Name"), cell("Value")],
        )],
    );
    let body = Element::container(
        ElementKind::TableBody,
        vec![Element::container(
            ElementKind::TableRow,
            vec![cell("x"), cell("1")],
        )],
    );
    let mut table = Element::container(ElementKind::Table, vec![head, body]);
    table.options.alignment = vec![Alignment::Left, Alignment::Right];

    let nested = Element::container(ElementKind::UnorderedList, vec![item("inner")]);
    let outer_item =
        Element::container(ElementKind::ListItem, vec![transparent_para("outer"), nested]);
    let list = Element::container(ElementKind::OrderedList, vec![outer_item]);

    let root = Element::container(ElementKind::Root, vec![table, list]);
    let out = write_document(&root, &Definitions::default()).unwrap();
    assert_eq!(
        out,
        "| Name | Value |\n\
         | :- -:\n\
         | x | 1 |\n\n\
         1.  outer\n    * inner\n"
    );
}

#[test]
fn test_footnote_body_can_reference_another_footnote() {
    let mut first = Element::new(ElementKind::Footnote);
    first.options.name = Some("a".to_string());
    let root = Element::container(
        ElementKind::Root,
        vec![para(vec![Element::text("x"), first])],
    );

    let mut nested_ref = Element::new(ElementKind::Footnote);
    nested_ref.options.name = Some("b".to_string());
    let mut definitions = Definitions::default();
    definitions.footnotes.insert(
        "a".to_string(),
        Element::container(
            ElementKind::Root,
            vec![para(vec![Element::text("see"), nested_ref])],
        ),
    );
    definitions.footnotes.insert(
        "b".to_string(),
        Element::container(ElementKind::Root, vec![text_para("deep")]),
    );

    let out = write_document(&root, &definitions).unwrap();
    assert!(out.contains("[^a]:\n    see[^b]"));
    assert!(out.contains("[^b]:\n    deep"));
}
