//! Best-effort capture-timestamp extraction from image metadata.
//!
//! Locates an embedded EXIF capture time in raw image bytes. Every failure
//! mode -- no metadata container, malformed container, no matching tag,
//! undecodable value -- is reported as absence, never as an error. Parsing
//! the returned string into a timestamp is the validator's job.

use exif::{In, Reader, Tag, Value};

/// Storage format of EXIF datetime strings, e.g. `"2024:03:01 08:00:00"`.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Tag candidates in priority order: capture time, digitized time, then
/// the generic file-modification time.
const TAG_PRIORITY: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Extract the raw capture-timestamp string from image bytes, if any.
pub fn capture_timestamp(bytes: &[u8]) -> Option<String> {
    let mut cursor = std::io::Cursor::new(bytes);
    let exif = Reader::new().read_from_container(&mut cursor).ok()?;

    TAG_PRIORITY
        .iter()
        .filter_map(|&tag| exif.get_field(tag, In::PRIMARY))
        .find_map(|field| decode_ascii(&field.value))
}

/// Decode an ASCII tag value into a trimmed string. NUL padding and
/// surrounding whitespace are stripped; empty results count as absent.
fn decode_ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(lines) => lines.iter().find_map(|raw| {
            let s = std::str::from_utf8(raw).ok()?;
            let s = s.trim_matches(char::from(0)).trim();
            (!s.is_empty()).then(|| s.to_string())
        }),
        _ => None,
    }
}
