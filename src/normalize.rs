/// Space separators (Unicode category Zs) other than the plain ASCII space.
fn is_nonascii_space_separator(c: char) -> bool {
    matches!(
        c,
        '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Replaces every Unicode line/paragraph separator (U+2028, U+2029) and
/// every space separator other than ASCII space with an ordinary space.
/// These leak into hand-authored exports and break JSON parsing in ways
/// that are invisible in most editors. No other characters are altered;
/// pure, total, idempotent. Applied exactly once, before any repair pass.
pub fn normalize_separators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2028}' | '\u{2029}' => out.push(' '),
            c if is_nonascii_space_separator(c) => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_line_and_paragraph_separators() {
        assert_eq!(normalize_separators("a\u{2028}b\u{2029}c"), "a b c");
    }

    #[test]
    fn maps_nonascii_spaces() {
        assert_eq!(normalize_separators("a\u{00A0}b\u{3000}c\u{2003}d"), "a b c d");
    }

    #[test]
    fn leaves_ascii_whitespace_alone() {
        assert_eq!(normalize_separators("a b\tc\nd\re"), "a b\tc\nd\re");
    }

    #[test]
    fn leaves_multibyte_text_alone() {
        let text = r#"{"prompt":"これは質問です"}"#;
        assert_eq!(normalize_separators(text), text);
    }

    #[test]
    fn idempotent() {
        let raw = "x\u{2028}y\u{202F}z plain";
        let once = normalize_separators(raw);
        assert_eq!(normalize_separators(&once), once);
    }
}
