//! Destination filename resolution.
//!
//! Picks a collision-free, length-bounded filename for a new export given
//! the names already present at the destination. Collisions are resolved
//! with a `" (n)"` disambiguator inserted before the extension; overlong
//! results are truncated on the stem only.

use std::collections::HashSet;

/// Max length of an export filename, including extension.
///
/// This is 255 minus a 38-character reserved margin for the unique-id
/// suffix safe creation may append on a commit-time collision.
pub const MAX_FILENAME_LENGTH: usize = 255 - (32 + 4 + 2);

/// Pick the first filename derived from `base` that is not already taken.
///
/// `existing` must contain both file and directory names at the
/// destination, since a directory collides with a prospective export name
/// just as a file does. The result is recomputed from the live destination
/// contents on every call; callers must not cache it.
pub fn next_available_filename(existing: &HashSet<String>, base: &str) -> String {
    let chosen = if !existing.contains(base) {
        base.to_string()
    } else {
        let (stem, ext) = split_extension(base);
        let mut n = 1u64;
        loop {
            let candidate = format!("{} ({}){}", stem, n, ext);
            if !existing.contains(&candidate) {
                break candidate;
            }
            n += 1;
        }
    };

    enforce_length(chosen)
}

/// Replace characters that are illegal in filenames with `_`.
///
/// Covers the union of restricted characters across platforms plus ASCII
/// control characters, so a name sanitized here is valid everywhere.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '<' | '>' | '|' | ':' | '*' | '?' | '\\' | '/' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect()
}

/// Split a filename into stem and extension.
///
/// The extension starts at the last `.` (inclusive); a name without a dot
/// has an empty extension.
pub(crate) fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Truncate an overlong filename down to [`MAX_FILENAME_LENGTH`] characters.
///
/// Only the stem is shortened; the extension is reattached verbatim.
/// Truncation runs after disambiguation, so it operates on the full
/// disambiguated stem including any `" (n)"` suffix.
fn enforce_length(filename: String) -> String {
    if filename.chars().count() <= MAX_FILENAME_LENGTH {
        return filename;
    }

    let (stem, ext) = split_extension(&filename);
    // An extension at or beyond the limit leaves no room for a stem; the
    // saturation keeps this total rather than panicking.
    let keep = MAX_FILENAME_LENGTH.saturating_sub(ext.chars().count());
    let truncated: String = stem.chars().take(keep).collect();
    format!("{}{}", truncated, ext)
}
