//! Tolerant text-to-number conversion for vendor export fields.
//!
//! Channel-list files mix hexadecimal (`0x1A2B`) and decimal encodings and
//! regularly contain blank or garbled fields. Every function here is total:
//! anything that does not parse yields zero.

/// Parse a 32-bit integer, accepting `0x`/`0X` hexadecimal or signed decimal.
///
/// Hex digits are read as unsigned and reinterpreted, so `0xFFFFFFFF` is `-1`.
pub fn parse_int(text: &str) -> i32 {
    match hex_digits(text) {
        Some(digits) => u32::from_str_radix(digits, 16).map_or(0, |v| v as i32),
        None => text.trim().parse().unwrap_or(0),
    }
}

/// Parse a 64-bit integer with the same rules as [`parse_int`].
pub fn parse_long(text: &str) -> i64 {
    match hex_digits(text) {
        Some(digits) => u64::from_str_radix(digits, 16).map_or(0, |v| v as i64),
        None => text.trim().parse().unwrap_or(0),
    }
}

/// Parse a plain decimal number (`-12.5`, `3.14`, `.5`).
///
/// Only an optional sign, digits and a single `.` are accepted: no exponent,
/// no thousands separators, no hex, no `inf`/`nan`.
pub fn parse_decimal(text: &str) -> f64 {
    let text = text.trim();
    if !is_plain_decimal(text) {
        return 0.0;
    }
    text.parse().unwrap_or(0.0)
}

/// Returns the hex digits after a `0x` prefix, or `None` when the text is not
/// in hex form. A sign after the prefix is rejected later by requiring
/// non-empty, sign-free digits.
fn hex_digits(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        let digits = text[2..].trim();
        // from_str_radix would accept a leading '+'
        if digits.starts_with(['+', '-']) {
            return Some("");
        }
        Some(digits)
    } else {
        None
    }
}

fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut seen_digit = false;
    let mut seen_point = false;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}
