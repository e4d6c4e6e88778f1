//! URL-safe slug derivation.

/// Derive a URL-safe slug from a store name.
///
/// Lowercases the input, strips everything except alphanumerics, spaces and
/// hyphens, replaces runs of whitespace with a hyphen, collapses repeated
/// hyphens, and trims leading/trailing hyphens. Collision handling (the
/// `-2`, `-3`... suffix) is the caller's concern since it requires an
/// existence check.
///
/// # Examples
///
/// ```
/// use markethub_core::slugify;
///
/// assert_eq!(slugify("Ali's Electronics!"), "alis-electronics");
/// assert_eq!(slugify("  The   Book  Nook  "), "the-book-nook");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
        // Other characters are dropped entirely.
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("My Store"), "my-store");
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(slugify("Ali's Electronics!"), "alis-electronics");
        assert_eq!(slugify("Books & Media Hub"), "books-media-hub");
    }

    #[test]
    fn test_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("The   Book---Nook"), "the-book-nook");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(slugify("  -- Edge Case -- "), "edge-case");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_unicode_is_dropped() {
        assert_eq!(slugify("Café 42"), "caf-42");
    }
}
