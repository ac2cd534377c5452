//! Slug derivation
//!
//! Slugs are derived from a display name: lowercased, punctuation dropped,
//! and whitespace, dashes and underscores collapsed into single dashes.
//! The same input always yields the same slug.

/// Derive a URL slug from a name or title.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}
