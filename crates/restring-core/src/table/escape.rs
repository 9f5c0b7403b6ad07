//! Escape syntax for the strings file
//!
//! The file format is line-oriented, so newlines inside a string are written
//! as `\n`, carriage returns as `\r` (a raw one at the end of a line would
//! be taken for a CRLF ending), literal backslashes as `\\`, and a `#` that
//! would otherwise start a comment as `\#`.

/// Render raw string bytes in the strings-file escape syntax.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for (i, &byte) in bytes.iter().enumerate() {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b'#' if i == 0 => out.push_str("\\#"),
            _ => out.push(byte as char),
        }
    }
    out
}

/// Reverse of [`escape`], applied to one line of the strings file.
///
/// Unrecognized escape sequences are kept verbatim.
pub fn unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('#') => out.push('#'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
