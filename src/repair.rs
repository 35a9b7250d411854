use regex::Regex;

use crate::types::{ExtractOptions, RepairAction};

/// Ordered textual fixups for the three known defect classes of the export:
/// a stray quote appended after a recognized numeric field's value, a stray
/// quote after any numeric value before a structural delimiter, and a
/// missing separator comma between adjacent top-level objects.
///
/// Plain text substitution, not parsing: a string value that itself contains
/// a `}` + whitespace + `{` sequence will be falsely split by the comma
/// pass. Known limitation of the export heuristics; see
/// `comma_insert_depth_zero_only` for the string-aware alternative.
pub struct SyntaxRepairer {
    field_quote_fixes: Vec<(String, Regex)>,
    numeric_quote_fix: Regex,
    separator_comma: Regex,
    depth_zero_commas: bool,
}

impl SyntaxRepairer {
    pub fn new(opts: &ExtractOptions) -> Self {
        let field_quote_fixes = opts
            .numeric_fields
            .iter()
            .map(|f| {
                let pattern = format!("\"{}\":\\s*(\\d+)\"", regex::escape(f));
                (f.clone(), Regex::new(&pattern).expect("valid field pattern"))
            })
            .collect();
        Self {
            field_quote_fixes,
            numeric_quote_fix: Regex::new(r#":\s*(\d+)"([,}\]])"#).expect("valid pattern"),
            separator_comma: Regex::new(r"\}\s*\{").expect("valid pattern"),
            depth_zero_commas: opts.comma_insert_depth_zero_only,
        }
    }

    /// Applies the passes in fixed order. Each pass re-scans the full text;
    /// passes compose sequentially and are not recursive.
    pub fn repair(&self, text: &str) -> (String, Vec<RepairAction>) {
        let mut repairs: Vec<RepairAction> = Vec::new();
        let mut text = text.to_string();

        for (field, re) in &self.field_quote_fixes {
            let replacement = format!("\"{field}\": $1");
            text = replace_logged(re, &text, &replacement, "strip_field_numeric_quote", &mut repairs);
        }

        text = replace_logged(
            &self.numeric_quote_fix,
            &text,
            ": $1$2",
            "strip_numeric_quote",
            &mut repairs,
        );

        if self.depth_zero_commas {
            let (fixed, comma_repairs) = insert_separator_commas_depth_zero(&text);
            text = fixed;
            repairs.extend(comma_repairs);
        } else {
            text = replace_logged(
                &self.separator_comma,
                &text,
                "},\n{",
                "insert_separator_comma",
                &mut repairs,
            );
        }

        (text, repairs)
    }
}

fn replace_logged(
    re: &Regex,
    text: &str,
    replacement: &str,
    op: &str,
    repairs: &mut Vec<RepairAction>,
) -> String {
    for m in re.find_iter(text) {
        repairs.push(RepairAction::new(op, m.start()));
    }
    re.replace_all(text, replacement).into_owned()
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t')
}

/// String/escape-aware variant of the separator-comma fixup: appends a comma
/// after a closing brace that returns brace depth to zero when the next
/// non-whitespace byte opens another object. Never fires inside a string
/// literal. Strictly fewer false positives than the textual rule, and a
/// deliberate deviation from the export tooling's behavior.
fn insert_separator_commas_depth_zero(text: &str) -> (String, Vec<RepairAction>) {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut repairs = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut depth: i64 = 0;
    let mut i: usize = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        out.push(ch);
        if in_string {
            if escape {
                escape = false;
            } else if ch == b'\\' {
                escape = true;
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
                if depth < 0 {
                    depth = 0;
                }
                if depth == 0 {
                    let mut j = i + 1;
                    while j < bytes.len() && is_ws(bytes[j]) {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j] == b'{' {
                        out.push(b',');
                        repairs.push(RepairAction::new("insert_separator_comma", i + 1));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    (String::from_utf8_lossy(&out).to_string(), repairs)
}
