//! CSS identifier escaping.
//!
//! Implements the CSSOM `CSS.escape()` serialization so ids, class tokens and
//! attribute values survive embedding in a selector. Output matches what a
//! browser would produce for the same input.

/// Escape a string for use as a CSS identifier.
pub fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let len = value.chars().count();
    let first = value.chars().next();

    for (i, c) in value.chars().enumerate() {
        match c {
            // NUL is replaced, never escaped.
            '\u{0}' => out.push('\u{FFFD}'),
            // Control characters become hex escapes with a trailing space.
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_hex(&mut out, c),
            '0'..='9' if i == 0 => push_hex(&mut out, c),
            '0'..='9' if i == 1 && first == Some('-') => push_hex(&mut out, c),
            // A lone "-" is not a valid identifier.
            '-' if i == 0 && len == 1 => {
                out.push('\\');
                out.push('-');
            }
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c);
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

fn push_hex(out: &mut String, c: char) {
    out.push('\\');
    out.push_str(&format!("{:x} ", c as u32));
}
