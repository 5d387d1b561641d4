//! Resource-name escaping.
//!
//! Resource names travel inside the whitespace-separated configuration string, so any
//! character that would break tokenization is written as a `\uXXXX` escape
//! of its UTF-16 code units.

use super::error::ConfigError;

/// Returns true if `c` must be escaped.
fn needs_escape(c: char) -> bool {
    c.is_whitespace() || c == '\\' || c.is_control() || !c.is_ascii()
}

/// Escapes whitespace, backslashes, control and non-ASCII characters.
pub fn encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if needs_escape(c) {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Reverses [`encode`].
///
/// # Errors
///
/// Returns [`ConfigError::BadEscape`] for a truncated or non-hex escape or an
/// unpaired surrogate.
pub fn decode(encoded: &str) -> Result<String, ConfigError> {
    let bad = || ConfigError::BadEscape(encoded.to_string());

    let mut units: Vec<u16> = Vec::with_capacity(encoded.len());
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        if chars.next() != Some('u') {
            return Err(bad());
        }
        let hex: String = chars.by_ref().take(4).collect();
        if hex.len() != 4 {
            return Err(bad());
        }
        let unit = u16::from_str_radix(&hex, 16).map_err(|_| bad())?;
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| bad())
}
