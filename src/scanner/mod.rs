//! Turning scanned baggage tags into lookup codes.

pub mod decoder;
pub mod frames;
pub mod session;

use serde::Deserialize;

pub use decoder::RqrrDecoder;
pub use frames::DirectoryFrames;
pub use session::{scan_image, scan_image_file, FrameSource, QrDecoder, ScanError, ScanSession};

/// Tag codes of the seeded demo bags, offered when no camera is available.
pub const DEMO_CODES: [&str; 5] = [
    "BAG-A8C74A09",
    "BAG-6A2E7EAD",
    "BAG-4DAFF685",
    "BAG-F781DD59",
    "BAG-2106F8F3",
];

const CODE_PREFIX: &str = "BAG-";

#[derive(Deserialize)]
struct TagPayload {
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default)]
    baggage_id: Option<String>,
}

fn parse_payload(raw: &str) -> Option<TagPayload> {
    if !raw.starts_with('{') {
        return None;
    }

    // Printed tags carry a Python-style dict with single quotes.
    sonic_rs::from_str(raw)
        .ok()
        .or_else(|| sonic_rs::from_str(&raw.replace('\'', "\"")).ok())
}

fn is_baggage_code(raw: &str) -> bool {
    raw.get(..CODE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CODE_PREFIX))
        && raw.len() > CODE_PREFIX.len()
        && raw[CODE_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}

fn looks_like_baggage_id(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_hexdigit())
        && raw.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// `BAG-` followed by the first segment of a baggage UUID, uppercased.
fn code_from_id(id: &str) -> String {
    let first = id
        .split('-')
        .find(|segment| !segment.is_empty())
        .unwrap_or(id);
    format!("{}{}", CODE_PREFIX, first.to_uppercase())
}

/// Extracts the tag code from whatever a scanner or a person produced.
///
/// Accepts a JSON tag payload (`qr_code`, else `baggage_id`), a bare
/// `BAG-...` code in any case, or a baggage UUID. Anything else is returned
/// trimmed but otherwise unchanged.
pub fn extract_baggage_code(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(payload) = parse_payload(raw) {
        if let Some(code) = payload
            .qr_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            return code.to_string();
        }
        if let Some(id) = payload.baggage_id.as_deref().map(str::trim) {
            if looks_like_baggage_id(id) {
                return code_from_id(id);
            }
        }
        return raw.to_string();
    }

    if is_baggage_code(raw) {
        return raw.to_uppercase();
    }

    if looks_like_baggage_id(raw) {
        return code_from_id(raw);
    }

    raw.to_string()
}
