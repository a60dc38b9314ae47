//! Lookup tables for entities, typographic symbols, and smart quotes.
//!
//! All three are fixed tables; a value outside the table is a data
//! model violation and aborts the render.

use crate::{Result, WriteError};

/// Named entities the writer knows how to re-emit. The table covers
/// the entities a kramdown parser produces for typographic input plus
/// the XHTML basics.
const NAMED_ENTITIES: &[(&str, u32)] = &[
    ("amp", 0x26),
    ("lt", 0x3C),
    ("gt", 0x3E),
    ("quot", 0x22),
    ("apos", 0x27),
    ("nbsp", 0xA0),
    ("iexcl", 0xA1),
    ("cent", 0xA2),
    ("pound", 0xA3),
    ("curren", 0xA4),
    ("yen", 0xA5),
    ("brvbar", 0xA6),
    ("sect", 0xA7),
    ("uml", 0xA8),
    ("copy", 0xA9),
    ("ordf", 0xAA),
    ("laquo", 0xAB),
    ("not", 0xAC),
    ("shy", 0xAD),
    ("reg", 0xAE),
    ("macr", 0xAF),
    ("deg", 0xB0),
    ("plusmn", 0xB1),
    ("sup2", 0xB2),
    ("sup3", 0xB3),
    ("acute", 0xB4),
    ("micro", 0xB5),
    ("para", 0xB6),
    ("middot", 0xB7),
    ("cedil", 0xB8),
    ("sup1", 0xB9),
    ("ordm", 0xBA),
    ("raquo", 0xBB),
    ("frac14", 0xBC),
    ("frac12", 0xBD),
    ("frac34", 0xBE),
    ("iquest", 0xBF),
    ("times", 0xD7),
    ("divide", 0xF7),
    ("ndash", 0x2013),
    ("mdash", 0x2014),
    ("lsquo", 0x2018),
    ("rsquo", 0x2019),
    ("sbquo", 0x201A),
    ("ldquo", 0x201C),
    ("rdquo", 0x201D),
    ("bdquo", 0x201E),
    ("dagger", 0x2020),
    ("Dagger", 0x2021),
    ("bull", 0x2022),
    ("hellip", 0x2026),
    ("permil", 0x2030),
    ("lsaquo", 0x2039),
    ("rsaquo", 0x203A),
    ("euro", 0x20AC),
    ("trade", 0x2122),
    ("larr", 0x2190),
    ("uarr", 0x2191),
    ("rarr", 0x2192),
    ("darr", 0x2193),
    ("harr", 0x2194),
];

/// Render an entity to its textual form.
///
/// The recorded original form wins when the parser kept it; otherwise
/// the character itself is emitted unless it is markup-significant, in
/// which case a numeric character reference keeps it re-parseable.
pub(crate) fn entity_to_str(value: &str, original: Option<&str>) -> Result<String> {
    let codepoint = if let Some(num) = value.strip_prefix('#') {
        let parsed = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            num.parse::<u32>().ok()
        };
        parsed.ok_or_else(|| WriteError::UnknownEntity(value.to_string()))?
    } else {
        NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, cp)| *cp)
            .ok_or_else(|| WriteError::UnknownEntity(value.to_string()))?
    };
    let ch =
        char::from_u32(codepoint).ok_or_else(|| WriteError::UnknownEntity(value.to_string()))?;

    if let Some(original) = original {
        return Ok(original.to_string());
    }
    match ch {
        '&' | '<' | '>' | '"' | '\'' => Ok(format!("&#{};", codepoint)),
        _ => Ok(ch.to_string()),
    }
}

/// Render a typographic symbol to its kramdown form.
pub(crate) fn typographic_sym_to_str(value: &str) -> Result<&'static str> {
    match value {
        "mdash" => Ok("---"),
        "ndash" => Ok("--"),
        "hellip" => Ok("..."),
        "laquo_space" => Ok("<< "),
        "raquo_space" => Ok(" >>"),
        "laquo" => Ok("<<"),
        "raquo" => Ok(">>"),
        other => Err(WriteError::UnknownTypographicSym(other.to_string())),
    }
}

/// Render a smart quote variant to its ASCII quote character.
pub(crate) fn smart_quote_to_str(value: &str) -> Result<&'static str> {
    match value {
        "lsquo" | "rsquo" => Ok("'"),
        "ldquo" | "rdquo" => Ok("\""),
        other => Err(WriteError::UnknownSmartQuote(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entity() {
        assert_eq!(entity_to_str("mdash", None).unwrap(), "\u{2014}");
        assert_eq!(entity_to_str("nbsp", None).unwrap(), "\u{A0}");
    }

    #[test]
    fn test_markup_significant_entity_stays_numeric() {
        assert_eq!(entity_to_str("amp", None).unwrap(), "&#38;");
        assert_eq!(entity_to_str("lt", None).unwrap(), "&#60;");
    }

    #[test]
    fn test_original_form_wins() {
        assert_eq!(entity_to_str("amp", Some("&amp;")).unwrap(), "&amp;");
    }

    #[test]
    fn test_numeric_entity() {
        assert_eq!(entity_to_str("#8212", None).unwrap(), "\u{2014}");
        assert_eq!(entity_to_str("#x2014", None).unwrap(), "\u{2014}");
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        assert!(matches!(
            entity_to_str("nosuch", None),
            Err(WriteError::UnknownEntity(_))
        ));
        assert!(matches!(
            entity_to_str("#xzz", None),
            Err(WriteError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_typographic_syms() {
        assert_eq!(typographic_sym_to_str("mdash").unwrap(), "---");
        assert_eq!(typographic_sym_to_str("laquo_space").unwrap(), "<< ");
        assert!(typographic_sym_to_str("nosuch").is_err());
    }

    #[test]
    fn test_smart_quotes() {
        assert_eq!(smart_quote_to_str("lsquo").unwrap(), "'");
        assert_eq!(smart_quote_to_str("rdquo").unwrap(), "\"");
        assert!(smart_quote_to_str("nosuch").is_err());
    }
}
