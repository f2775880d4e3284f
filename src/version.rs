//! Filename version-suffix parsing.
//!
//! The version convention is a `.` or `_` separator followed by `v` and one or
//! more digits (`bucket_v003.ma`, `sh020.v12.abc`). Parsing is the one piece of
//! business logic shared by every scan, so it is kept pure and total here.

use std::sync::OnceLock;

use regex::Regex;

/// Result of splitting a filename into its base name and version suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Text before the version separator, or the extension-stripped stem when
    /// no suffix matched.
    pub base_name: String,
    /// Parsed version number; 0 when the filename carries no suffix.
    pub number: u32,
    /// The original `v<digits>` text, preserved so display strings and
    /// filesystem paths round-trip the zero padding exactly.
    pub tag: Option<String>,
}

fn version_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[._]v[0-9]+").expect("invalid version suffix regex"))
}

/// Split a filename into base name and version number.
///
/// Matches the first (leftmost) `.` or `_` followed by `v` and digits. Total
/// for all inputs: unversioned or malformed names yield the stem and version
/// 0 instead of an error, and oversized digit runs saturate rather than
/// overflow.
pub fn extract_version(filename: &str) -> ParsedName {
    if let Some(found) = version_suffix().find(filename) {
        // Drop the leading separator; what remains is the `v<digits>` tag.
        let tag = &found.as_str()[1..];
        return ParsedName {
            base_name: filename[..found.start()].to_string(),
            number: saturating_parse(&tag[1..]),
            tag: Some(tag.to_string()),
        };
    }

    ParsedName {
        base_name: strip_extension(filename).to_string(),
        number: 0,
        tag: None,
    }
}

fn saturating_parse(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |acc, byte| {
        acc.saturating_mul(10).saturating_add(u32::from(byte - b'0'))
    })
}

fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
