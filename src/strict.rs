use serde_json::Value;

/// A strict parse rejection, with the failure offset in span-local bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    pub offset: usize,
}

/// Strictly parses one candidate span. Only a JSON object is an acceptable
/// root; trailing garbage inside the span is a rejection like any other.
pub fn parse_object(text: &str) -> Result<Value, ParseFailure> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ParseFailure {
            message: "root is not an object".to_string(),
            offset: 0,
        }),
        Err(err) => Err(ParseFailure {
            offset: offset_of(text, err.line(), err.column()),
            message: err.to_string(),
        }),
    }
}

/// Converts the parser's 1-based line/column position into a byte offset,
/// clamped to the text length.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let mut base = 0usize;
    if line > 1 {
        let mut newlines = 0usize;
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                newlines += 1;
                if newlines == line - 1 {
                    base = i + 1;
                    break;
                }
            }
        }
    }
    (base + column.saturating_sub(1)).min(text.len())
}

/// Excerpt of up to `window` bytes on each side of `offset`, clamped to the
/// text and snapped to char boundaries so multibyte text never splits.
pub fn context_snippet(text: &str, offset: usize, window: usize) -> String {
    let offset = offset.min(text.len());
    let mut start = offset.saturating_sub(window);
    let mut end = (offset.saturating_add(window)).min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_string()
}
