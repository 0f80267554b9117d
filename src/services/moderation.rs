//! Content moderation
//!
//! Keyword-based screening of page submissions. This is substring matching
//! against static lists, not real classification; false positives and
//! negatives are expected. The `ContentClassifier` trait is the seam for
//! substituting a real classifier later without touching orchestration.

use crate::models::PageCategory;

/// Keywords rejected in text under the family category
const FORBIDDEN_FAMILY_TEXT: &[&str] = &["nudity", "sex act"];

/// Keywords rejected in text under the 18+ category
const FORBIDDEN_ADULT_TEXT: &[&str] = &["illegal", "child", "nudity"];

/// Keywords rejected in image references regardless of category
const FORBIDDEN_IMAGE: &[&str] = &["nudity", "naked"];

/// Moderation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Rejected(String),
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected(_))
    }
}

/// Classifies submitted content as allowed or rejected for a category.
pub trait ContentClassifier: Send + Sync {
    fn classify_text(&self, text: &str, category: PageCategory) -> Verdict;
    fn classify_image(&self, image_url: &str, category: PageCategory) -> Verdict;
}

/// Default classifier: case-insensitive substring match against the static
/// keyword lists above.
pub struct KeywordClassifier;

impl ContentClassifier for KeywordClassifier {
    fn classify_text(&self, text: &str, category: PageCategory) -> Verdict {
        let lowered = text.to_lowercase();

        let forbidden = match category {
            PageCategory::Family => FORBIDDEN_FAMILY_TEXT,
            PageCategory::Adult => FORBIDDEN_ADULT_TEXT,
        };

        for word in forbidden {
            if lowered.contains(word) {
                return match category {
                    PageCategory::Family => {
                        Verdict::Rejected("Family-friendly content only.".to_string())
                    }
                    PageCategory::Adult => Verdict::Rejected(
                        "This content is not allowed and has been flagged.".to_string(),
                    ),
                };
            }
        }

        Verdict::Allowed
    }

    fn classify_image(&self, image_url: &str, category: PageCategory) -> Verdict {
        let lowered = image_url.to_lowercase();

        for word in FORBIDDEN_IMAGE {
            if lowered.contains(word) {
                return Verdict::Rejected(
                    "This image has bad content and has been flagged. Repeated violations will block posting."
                        .to_string(),
                );
            }
        }

        // Family pages carry no images at all
        if category == PageCategory::Family {
            return Verdict::Rejected(
                "Images are not allowed in family-friendly pages.".to_string(),
            );
        }

        Verdict::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_text_rejects_nudity_any_case() {
        let c = KeywordClassifier;
        assert!(c.classify_text("some Nudity here", PageCategory::Family).is_rejected());
        assert!(c.classify_text("NUDITY", PageCategory::Family).is_rejected());
        assert!(c.classify_text("a sex act", PageCategory::Family).is_rejected());
    }

    #[test]
    fn test_adult_text_rejections() {
        let c = KeywordClassifier;
        assert!(c.classify_text("nudity", PageCategory::Adult).is_rejected());
        assert!(c.classify_text("something illegal", PageCategory::Adult).is_rejected());
        assert!(c.classify_text("a child appears", PageCategory::Adult).is_rejected());
    }

    #[test]
    fn test_adult_keywords_pass_under_family() {
        // "illegal"/"child" are only on the 18+ list
        let c = KeywordClassifier;
        assert_eq!(
            c.classify_text("nothing illegal about a child's drawing", PageCategory::Family),
            Verdict::Allowed
        );
    }

    #[test]
    fn test_clean_text_allowed() {
        let c = KeywordClassifier;
        assert_eq!(c.classify_text("my links page", PageCategory::Family), Verdict::Allowed);
        assert_eq!(c.classify_text("my links page", PageCategory::Adult), Verdict::Allowed);
    }

    #[test]
    fn test_image_keywords_rejected_regardless_of_category() {
        let c = KeywordClassifier;
        assert!(c
            .classify_image("https://cdn/naked.jpg", PageCategory::Adult)
            .is_rejected());
        assert!(c
            .classify_image("https://cdn/Nudity.png", PageCategory::Family)
            .is_rejected());
    }

    #[test]
    fn test_family_rejects_all_images() {
        let c = KeywordClassifier;
        let verdict = c.classify_image("https://cdn/cat.jpg", PageCategory::Family);
        assert_eq!(
            verdict,
            Verdict::Rejected("Images are not allowed in family-friendly pages.".to_string())
        );
    }

    #[test]
    fn test_adult_clean_image_allowed() {
        let c = KeywordClassifier;
        assert_eq!(
            c.classify_image("https://cdn/beach.jpg", PageCategory::Adult),
            Verdict::Allowed
        );
    }
}
