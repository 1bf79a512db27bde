//! Code normalization.
//!
//! Decoded QR payloads and keyboard-wedge bursts frequently carry quote
//! characters (mis-mapped keyboard layouts turn `-` into `'` or `"`) and
//! stray whitespace. [`normalize`] turns either into the canonical code
//! string used for classification and routing.

/// Characters replaced by a hyphen during normalization.
const QUOTE_CHARS: [char; 2] = ['\'', '"'];

/// Sanitize raw scanned text into a canonical code.
///
/// Every single or double quote becomes `-`, then leading and trailing
/// whitespace is trimmed. The function is pure and idempotent.
///
/// # Examples
///
/// ```
/// use lector_core::normalize;
///
/// assert_eq!(normalize("ext'erno\""), "ext-erno-");
/// assert_eq!(normalize("  abc'123\""), "abc-123-");
/// assert_eq!(normalize(&normalize(" x'y ")), normalize(" x'y "));
/// ```
pub fn normalize(raw: &str) -> String {
    raw.replace(QUOTE_CHARS, "-").trim().to_string()
}
