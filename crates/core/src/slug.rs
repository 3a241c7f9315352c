//! Slugs

use deunicode::deunicode;

/// Derive a URL slug from a display name.
///
/// The name is transliterated to ASCII first, so `Đặc Biệt` becomes
/// `dac-biet`. ASCII letters and digits are lowercased and kept, every other
/// run of characters becomes a single `-`, and leading/trailing separators are
/// dropped.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }

            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
