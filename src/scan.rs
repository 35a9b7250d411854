use regex::Regex;

use crate::types::{AnchorMatch, ExtractOptions, ObjectSpan};

/// Compiles the anchor pattern for the configured first-field marker: an
/// opening brace followed by `"<field>"` and a quoted value, which is
/// captured as the object's key.
pub fn anchor_pattern(opts: &ExtractOptions) -> Regex {
    let pattern = format!(
        "\\{{\\s*\"{}\"\\s*:\\s*\"([^\"]+)\"",
        regex::escape(&opts.anchor_field)
    );
    Regex::new(&pattern).expect("valid anchor pattern")
}

/// Finds every anchor in document order. `start` is the byte offset of the
/// opening brace; matches are strictly increasing and non-overlapping.
pub fn find_anchors(text: &str, anchor: &Regex) -> Vec<AnchorMatch> {
    let mut anchors = Vec::new();
    for caps in anchor.captures_iter(text) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        anchors.push(AnchorMatch {
            key: key.as_str().to_string(),
            start: whole.start(),
        });
    }
    anchors
}

/// Scans forward from the anchor's opening brace to its balancing closing
/// brace. Brace depth is counted only outside string literals; a backslash
/// inside a string consumes the following byte uninterpreted, so an escaped
/// quote never toggles string state and brace characters inside strings
/// never touch the depth. Returns `None` when the text ends before depth
/// returns to zero.
pub fn match_object_span(text: &str, start: usize) -> Option<ObjectSpan> {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut escape_pending = false;
    let mut depth: i64 = 0;

    let mut i = start;
    while i < bytes.len() {
        let ch = bytes[i];
        if in_string {
            if escape_pending {
                escape_pending = false;
            } else if ch == b'\\' {
                escape_pending = true;
            } else if ch == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match ch {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(ObjectSpan { start, end: i + 1 });
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(text: &str) -> Vec<AnchorMatch> {
        find_anchors(text, &anchor_pattern(&ExtractOptions::default()))
    }

    #[test]
    fn finds_anchors_in_document_order() {
        let text = r#"{"grade": "5", "questions": []} {"grade": "4", "questions": []}"#;
        let found = anchors(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].key, "5");
        assert_eq!(found[0].start, 0);
        assert_eq!(found[1].key, "4");
        assert!(found[1].start > found[0].start);
    }

    #[test]
    fn anchor_tolerates_interior_whitespace() {
        let found = anchors("{ \"grade\" :\n\"pre2\", \"questions\": []}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "pre2");
    }

    #[test]
    fn non_leading_grade_field_is_not_an_anchor() {
        let found = anchors(r#"{"questions": [], "grade": "5"}"#);
        assert!(found.is_empty());
    }

    #[test]
    fn span_covers_nested_objects() {
        let text = r#"{"grade": "3", "questions": [{"q": {"deep": 1}}]} tail"#;
        let span = match_object_span(text, 0).unwrap();
        assert_eq!(span.slice(text), r#"{"grade": "3", "questions": [{"q": {"deep": 1}}]}"#);
    }

    #[test]
    fn braces_inside_strings_do_not_count() {
        let text = r#"{"grade": "2", "note": "use { and } wisely"}"#;
        let span = match_object_span(text, 0).unwrap();
        assert_eq!(span.slice(text), text);
    }

    #[test]
    fn escaped_quotes_do_not_toggle_string_state() {
        let text = r#"{"grade": "4", "note": "say \"hi\" and {go}"}"#;
        let span = match_object_span(text, 0).unwrap();
        assert_eq!(span.slice(text), text);
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        let text = r#"{"grade": "4", "path": "C:\\"}"#;
        let span = match_object_span(text, 0).unwrap();
        assert_eq!(span.slice(text), text);
    }

    #[test]
    fn unterminated_object_yields_no_span() {
        assert!(match_object_span(r#"{"grade": "5", "questions": ["#, 0).is_none());
    }

    #[test]
    fn scan_starts_at_the_given_offset() {
        let text = r#"junk {"grade": "1"} junk"#;
        let span = match_object_span(text, 5).unwrap();
        assert_eq!(span.slice(text), r#"{"grade": "1"}"#);
    }
}
