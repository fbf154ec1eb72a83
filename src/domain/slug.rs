//! Slug derivation for post titles.
//!
//! A slug is the URL-safe identifier of a post and doubles as its document id
//! in the backend. Derivation is pure and idempotent: feeding a slug back in
//! returns it unchanged, so manual edits to the slug field can be normalised
//! with the same function that derives it from the title.

/// Derive a slug from human-readable text.
///
/// The input is trimmed and lower-cased; every maximal run of characters that
/// are not ASCII letters or digits (whitespace and hyphens included) collapses
/// into a single `-`. Trailing punctuation therefore survives as a trailing
/// hyphen: `"My First Post!"` becomes `"my-first-post-"`.
pub fn derive_slug(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_separator = false;

    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }

    slug
}

/// Variant of [`derive_slug`] for optional input; absent text yields `""`.
pub fn derive_slug_opt(input: Option<&str>) -> String {
    input.map(derive_slug).unwrap_or_default()
}
