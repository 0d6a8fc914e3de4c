//! Escaping for text embedded in HCL string literals.

/// Escape `s` for use between double quotes in HCL.
///
/// Backslash, double quote, newline, carriage return and tab become their
/// backslash escapes. Everything else, `${` and `%{` included, passes through.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }

    out
}

/// Escape and wrap in double quotes.
#[must_use]
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}
