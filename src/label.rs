//! # Label Module
//!
//! Helpers that turn raw chord-table labels into displayable text.
//!
//! ## Purpose
//! Table labels are plain ASCII with two kinds of markup:
//! - **Symbol tokens** like `&dim;` or `&65;` that stand for a Unicode glyph
//! - **Figured bass** in braces, `V{u}` or `ii⌀{z5}`, drawn as stacked figures
//!
//! [`convert_symbols`] rewrites the tokens, [`parse_label`] splits the
//! figured-bass parts out so a renderer can set them in a smaller font.
//!
//! ## Related Modules
//! - `analysis` - Produces the labels

use serde::Serialize;

const SYMBOLS: &[(&str, &str)] = &[
    ("&dim;", "°"),
    ("&hdim;", "⌀"),
    ("&3;", "³"),
    ("&6;", "⁶"),
    ("&7;", "⁷"),
    ("&42;", "⁴₂"),
    ("&43;", "⁴₃"),
    ("&52;", "⁵₂"),
    ("&53;", "⁵₃"),
    ("&54;", "⁵₄"),
    ("&64;", "⁶₄"),
    ("&65;", "⁶₅"),
    ("&73;", "⁷₃"),
    ("&75;", "⁷₅"),
];

/// Replace every symbol token in `text` with its Unicode form.
///
/// Unknown `&...;` sequences are left alone.
///
/// # Example
/// ```rust
/// use harmony::convert_symbols;
///
/// assert_eq!(convert_symbols("vii&dim;&7;"), "vii°⁷");
/// assert_eq!(convert_symbols("C&65;"), "C⁶₅");
/// ```
pub fn convert_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match SYMBOLS.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, glyph)) => {
                out.push_str(glyph);
                rest = &tail[token.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// One run of a parsed label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSegment {
    pub text: String,
    /// Text was inside braces
    pub figured: bool,
}

impl LabelSegment {
    fn plain(text: &str) -> Self {
        LabelSegment { text: text.to_string(), figured: false }
    }

    fn figured(text: &str) -> Self {
        LabelSegment { text: text.to_string(), figured: true }
    }
}

/// Split a label into plain and figured-bass segments.
///
/// Braces are not part of the segment text. Empty braces produce nothing,
/// and an unmatched brace stays in the plain text.
///
/// # Example
/// ```rust
/// use harmony::parse_label;
///
/// let segments = parse_label("V{u}/IV");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[0].text, "V");
/// assert!(segments[1].figured);
/// assert_eq!(segments[1].text, "u");
/// assert_eq!(segments[2].text, "/IV");
/// ```
pub fn parse_label(text: &str) -> Vec<LabelSegment> {
    let mut segments: Vec<LabelSegment> = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        // the figure ends at the first closing brace, unless another one opens first
        let close = after.find('}');
        let nested = after.find('{');
        match close {
            Some(close) if nested.map_or(true, |n| n > close) => {
                plain.push_str(&rest[..open]);
                if close > 0 {
                    if !plain.is_empty() {
                        segments.push(LabelSegment::plain(&plain));
                        plain.clear();
                    }
                    segments.push(LabelSegment::figured(&after[..close]));
                }
                rest = &after[close + 1..];
            }
            _ => {
                plain.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    plain.push_str(rest);
    if !plain.is_empty() {
        segments.push(LabelSegment::plain(&plain));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[LabelSegment]) -> Vec<(&str, bool)> {
        segments.iter().map(|s| (s.text.as_str(), s.figured)).collect()
    }

    #[test]
    fn test_convert_symbols() {
        assert_eq!(convert_symbols("ii&hdim;&43;"), "ii⌀⁴₃");
        assert_eq!(convert_symbols("&75;&73;&64;&54;&53;&52;&42;"), "⁷₅⁷₃⁶₄⁵₄⁵₃⁵₂⁴₂");
        assert_eq!(convert_symbols("&3;&6;"), "³⁶");
    }

    #[test]
    fn test_convert_symbols_leaves_other_text() {
        assert_eq!(convert_symbols("I"), "I");
        assert_eq!(convert_symbols("&R&x;"), "&R&x;");
        assert_eq!(convert_symbols("a & b"), "a & b");
        assert_eq!(convert_symbols(""), "");
    }

    #[test]
    fn test_parse_label_plain() {
        assert_eq!(texts(&parse_label("IV")), vec![("IV", false)]);
        assert!(parse_label("").is_empty());
    }

    #[test]
    fn test_parse_label_figures() {
        assert_eq!(
            texts(&parse_label("ii⌀{z5}")),
            vec![("ii⌀", false), ("z5", true)]
        );
        assert_eq!(
            texts(&parse_label("{u}{z}")),
            vec![("u", true), ("z", true)]
        );
        assert_eq!(texts(&parse_label("V{}/V")), vec![("V/V", false)]);
    }

    #[test]
    fn test_parse_label_unbalanced() {
        assert_eq!(texts(&parse_label("V{u")), vec![("V{u", false)]);
        assert_eq!(texts(&parse_label("V}u")), vec![("V}u", false)]);
        assert_eq!(
            texts(&parse_label("a{b{c}")),
            vec![("a{b", false), ("c", true)]
        );
    }
}
