//! Completeness gate for public visibility.

use crate::transform::transform;
use crate::LinkType;

/// A link is complete when it has a non-blank title and a raw input that
/// transforms into a URL for its type. Incomplete links are never active.
pub fn is_complete(link_type: LinkType, title: &str, raw_input: &str) -> bool {
    if title.trim().is_empty() || raw_input.trim().is_empty() {
        return false;
    }
    transform(link_type, raw_input).is_ok()
}

/// The activation actually stored: the requested value, forced off for
/// incomplete links.
pub fn effective_active(requested: bool, complete: bool) -> bool {
    requested && complete
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_incomplete() {
        assert!(!is_complete(LinkType::Instagram, "", "@john"));
        assert!(!is_complete(LinkType::Instagram, "   ", "https://instagram.com/john"));
    }

    #[test]
    fn blank_or_invalid_input_is_incomplete() {
        assert!(!is_complete(LinkType::Email, "Mail", ""));
        assert!(!is_complete(LinkType::Email, "Mail", "not-an-email"));
        assert!(is_complete(LinkType::Email, "Mail", "a@b.co"));
    }

    #[test]
    fn activation_requires_completeness() {
        assert!(effective_active(true, true));
        assert!(!effective_active(true, false));
        assert!(!effective_active(false, true));
    }
}
