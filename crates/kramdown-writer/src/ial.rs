//! Inline attribute list (IAL) re-emission.
//!
//! Reconstructs the `{: ...}` annotation from an element's attribute
//! map, skipping attributes the textual form already expresses
//! positionally (a link's destination, a header's id).

use kramdown_ast::{Element, ElementKind};

/// Build the IAL annotation for an element, or `None` if nothing
/// needs re-emitting.
pub(crate) fn ial_for_element(el: &Element) -> Option<String> {
    let mut res = String::new();
    for (key, value) in &el.attributes {
        if matches!(el.kind, ElementKind::Link | ElementKind::Image)
            && matches!(key.as_str(), "href" | "src" | "alt" | "title")
        {
            continue;
        }
        if el.kind == ElementKind::Header && key == "id" {
            continue;
        }
        if key == "class" {
            for class in value.split_whitespace() {
                res.push_str(" .");
                res.push_str(class);
            }
        } else if key == "id" {
            res.push_str(" #");
            res.push_str(value);
        } else {
            res.push_str(&format!(" {}=\"{}\"", key, value));
        }
    }

    let toc = matches!(el.kind, ElementKind::UnorderedList | ElementKind::OrderedList)
        && el.options.ial_refs.iter().any(|r| r == "toc");
    if toc {
        res = if res.trim().is_empty() {
            "toc".to_string()
        } else {
            format!("toc {}", res.trim_start())
        };
    }

    if res.trim().is_empty() {
        None
    } else {
        Some(format!("{{:{}}}", res))
    }
}

/// Render an element's attributes in HTML form (` key="value"` runs),
/// with the values HTML-escaped.
pub(crate) fn html_attributes(el: &Element) -> String {
    el.attributes
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_html_attr(value)))
        .collect()
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kramdown_ast::Element;

    #[test]
    fn test_empty_attributes_yield_none() {
        let el = Element::new(ElementKind::Paragraph);
        assert_eq!(ial_for_element(&el), None);
    }

    #[test]
    fn test_id_and_class_forms() {
        let mut el = Element::new(ElementKind::Paragraph);
        el.set_attr("id", "intro");
        el.set_attr("class", "wide  deep");
        assert_eq!(
            ial_for_element(&el).unwrap(),
            "{: #intro .wide .deep}"
        );
    }

    #[test]
    fn test_generic_attribute() {
        let mut el = Element::new(ElementKind::Paragraph);
        el.set_attr("lang", "de");
        assert_eq!(ial_for_element(&el).unwrap(), "{: lang=\"de\"}");
    }

    #[test]
    fn test_positional_link_attributes_skipped() {
        let mut el = Element::new(ElementKind::Link);
        el.set_attr("href", "http://example.com");
        el.set_attr("title", "Example");
        assert_eq!(ial_for_element(&el), None);

        el.set_attr("class", "ext");
        assert_eq!(ial_for_element(&el).unwrap(), "{: .ext}");
    }

    #[test]
    fn test_header_id_skipped() {
        let mut el = Element::new(ElementKind::Header);
        el.set_attr("id", "intro");
        assert_eq!(ial_for_element(&el), None);
    }

    #[test]
    fn test_toc_marker() {
        let mut el = Element::new(ElementKind::UnorderedList);
        el.options.ial_refs.push("toc".to_string());
        assert_eq!(ial_for_element(&el).unwrap(), "{:toc}");

        el.set_attr("id", "contents");
        assert_eq!(ial_for_element(&el).unwrap(), "{:toc #contents}");
    }

    #[test]
    fn test_reemission_is_idempotent() {
        let mut el = Element::new(ElementKind::Paragraph);
        el.set_attr("class", "a b");
        el.set_attr("id", "x");
        assert_eq!(ial_for_element(&el), ial_for_element(&el));
    }

    #[test]
    fn test_html_attributes_escaped() {
        let mut el = Element::with_value(ElementKind::HtmlElement, "div");
        el.set_attr("data-x", "a < b & \"c\"");
        assert_eq!(
            html_attributes(&el),
            " data-x=\"a &lt; b &amp; &quot;c&quot;\""
        );
    }
}
