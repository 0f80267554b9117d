//! Slug generation
//!
//! Two strategies coexist: title-derived slugs for pages with a human-chosen
//! title, and random slugs for anonymous submissions. `normalize_slug` is the
//! read-path counterpart that maps a raw URL slug to the stored form.

use uuid::Uuid;

/// Derive a slug from a page title.
///
/// Lowercases the title and strips everything outside `[a-z0-9 ]`. A title
/// without internal spaces is used as-is, exactly one space becomes a hyphen,
/// and two or more spaces all become underscores. Deterministic for a given
/// title; no uniqueness check is performed.
pub fn derive_slug(title: &str) -> String {
    let clean: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();
    let clean = clean.trim();

    let space_count = clean.matches(' ').count();

    match space_count {
        0 => clean.to_string(),
        1 => clean.replacen(' ', "-", 1),
        _ => clean.replace(' ', "_"),
    }
}

/// Generate a random page slug: `l_` plus 8 lowercase hex characters.
///
/// Drawn from a cryptographically strong source (UUID v4), giving a 2^32
/// space; collisions are negligible at expected volume.
pub fn random_slug() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("l_{}", &hex[..8])
}

/// Normalize a slug arriving from a URL to the stored form: lowercase,
/// trimmed, internal whitespace runs collapsed to single hyphens.
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_derive_slug_many_spaces_uses_underscores() {
        assert_eq!(derive_slug("Five Nights At Freddy's"), "five_nights_at_freddys");
    }

    #[test]
    fn test_derive_slug_single_space_uses_hyphen() {
        assert_eq!(derive_slug("Five Nights"), "five-nights");
    }

    #[test]
    fn test_derive_slug_no_space_passthrough() {
        assert_eq!(derive_slug("Freddys"), "freddys");
    }

    #[test]
    fn test_derive_slug_strips_symbols_and_trims() {
        assert_eq!(derive_slug("  Hello!!! "), "hello");
        // symbols drop out but the spaces around them remain
        assert_eq!(derive_slug("C++ & Rust"), "c__rust");
    }

    #[test]
    fn test_derive_slug_deterministic() {
        assert_eq!(derive_slug("Some Title"), derive_slug("Some Title"));
    }

    #[test]
    fn test_random_slug_format() {
        let slug = random_slug();
        assert!(slug.starts_with("l_"));
        assert_eq!(slug.len(), 10);
        assert!(slug[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_slugs_are_distinct() {
        let slugs: HashSet<String> = (0..1000).map(|_| random_slug()).collect();
        assert_eq!(slugs.len(), 1000);
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("  My Page  "), "my-page");
        assert_eq!(normalize_slug("Five  Nights"), "five-nights");
        assert_eq!(normalize_slug("already-normal"), "already-normal");
    }

    proptest! {
        #[test]
        fn property_derived_slug_charset(title in ".{0,64}") {
            let slug = derive_slug(&title);
            let charset_ok = slug.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
            });
            prop_assert!(charset_ok);
        }

        #[test]
        fn property_derived_slug_idempotent_on_clean_input(word in "[a-z0-9]{1,16}") {
            prop_assert_eq!(derive_slug(&word), word);
        }
    }
}
