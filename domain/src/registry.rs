//! Static per-type link configuration.
//!
//! Keep in sync with the editor's copy of this table: display metadata and the
//! patterns here decide what the editor shows and what it accepts.

use std::sync::LazyLock;

use regex::Regex;

use crate::LinkType;

/// How a raw, non-URL input is interpreted for a link type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// A handle appended to the service's profile base URL.
    Username { base_url: &'static str },
    Email { protocol: &'static str },
    Phone { protocol: &'static str },
    /// A bare domain that gets an `https://` prefix.
    Domain,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Username { .. } => "username",
            InputKind::Email { .. } => "email",
            InputKind::Phone { .. } => "phone",
            InputKind::Domain => "domain",
        }
    }

    pub fn base_url(&self) -> Option<&'static str> {
        match *self {
            InputKind::Username { base_url } => Some(base_url),
            _ => None,
        }
    }

    pub fn protocol(&self) -> Option<&'static str> {
        match *self {
            InputKind::Email { protocol } | InputKind::Phone { protocol } => Some(protocol),
            _ => None,
        }
    }
}

/// Registry entry for one link type.
#[derive(Debug)]
pub struct LinkTypeDefinition {
    pub link_type: LinkType,
    /// Human label; also the fallback title.
    pub display_name: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    pub input_label: &'static str,
    pub input_kind: InputKind,
    /// Accepts inputs that are already a full URL/URI for this type.
    pub validation_pattern: &'static LazyLock<Regex>,
}

impl LinkTypeDefinition {
    pub fn matches_pattern(&self, url: &str) -> bool {
        self.validation_pattern.is_match(url)
    }

    pub fn pattern_source(&self) -> &str {
        self.validation_pattern.as_str()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("registry pattern is valid")
}

static INSTAGRAM_URL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^https?://(www\.)?instagram\.com/[a-zA-Z0-9._]+$"));
static MAILTO_URI: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^mailto:[^\s@]+@[^\s@]+\.[^\s@]+$"));
// Needs 8+ digits, so `tel:` URIs built from shorter phone inputs (the
// classifier allows 1 to 16 digits) are not accepted back as URLs.
static TEL_URI: LazyLock<Regex> = LazyLock::new(|| compile(r"^tel:\+?[1-9][0-9\s\-()]{7,20}$"));
// Either a full http(s) URL or a bare domain with optional path.
static ANY_WEB_URL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(https?://.+|([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(/.*)?$)")
});
static FACEBOOK_URL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^https?://(www\.)?facebook\.com/[a-zA-Z0-9._]+$"));

static INSTAGRAM: LinkTypeDefinition = LinkTypeDefinition {
    link_type: LinkType::Instagram,
    display_name: "Instagram",
    category: "social",
    icon: "instagram",
    description: "Share your Instagram profile",
    example: "@john_doe or https://instagram.com/john_doe",
    input_label: "URL or Username",
    input_kind: InputKind::Username {
        base_url: "https://instagram.com",
    },
    validation_pattern: &INSTAGRAM_URL,
};

static EMAIL: LinkTypeDefinition = LinkTypeDefinition {
    link_type: LinkType::Email,
    display_name: "Email",
    category: "communication",
    icon: "email",
    description: "Send an email",
    example: "john@example.com",
    input_label: "Email",
    input_kind: InputKind::Email { protocol: "mailto:" },
    validation_pattern: &MAILTO_URI,
};

static PHONE: LinkTypeDefinition = LinkTypeDefinition {
    link_type: LinkType::Phone,
    display_name: "Phone",
    category: "communication",
    icon: "phone",
    description: "Make a phone call",
    example: "+1234567890",
    input_label: "Phone",
    input_kind: InputKind::Phone { protocol: "tel:" },
    validation_pattern: &TEL_URI,
};

static CUSTOM_LINK: LinkTypeDefinition = LinkTypeDefinition {
    link_type: LinkType::CustomLink,
    display_name: "Custom Link",
    category: "custom",
    icon: "link",
    description: "Any other link",
    example: "https://example.com",
    input_label: "URL",
    input_kind: InputKind::Domain,
    validation_pattern: &ANY_WEB_URL,
};

static FACEBOOK: LinkTypeDefinition = LinkTypeDefinition {
    link_type: LinkType::Facebook,
    display_name: "Facebook",
    category: "social",
    icon: "facebook",
    description: "Share your Facebook profile",
    example: "https://facebook.com/john_doe",
    input_label: "Facebook",
    input_kind: InputKind::Username {
        base_url: "https://facebook.com",
    },
    validation_pattern: &FACEBOOK_URL,
};

impl LinkType {
    /// Registry entry for this type. Total over the enum.
    pub fn definition(self) -> &'static LinkTypeDefinition {
        match self {
            LinkType::Instagram => &INSTAGRAM,
            LinkType::Email => &EMAIL,
            LinkType::Phone => &PHONE,
            LinkType::CustomLink => &CUSTOM_LINK,
            LinkType::Facebook => &FACEBOOK,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.definition().display_name
    }
}

/// Look up a definition by wire tag. Unregistered tags yield `None`; callers
/// must treat that as an invalid link type, never fall back to a default.
pub fn lookup(tag: &str) -> Option<&'static LinkTypeDefinition> {
    LinkType::parse(tag).map(LinkType::definition)
}

/// All definitions, in declaration order.
pub fn definitions() -> impl Iterator<Item = &'static LinkTypeDefinition> {
    LinkType::ALL.into_iter().map(LinkType::definition)
}

pub fn is_link_type_registered(tag: &str) -> bool {
    lookup(tag).is_some()
}

pub fn get_display_name(link_type: LinkType) -> &'static str {
    link_type.display_name()
}

pub fn display_name_for_tag(tag: &str) -> Option<&'static str> {
    lookup(tag).map(|def| def.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_maps_to_its_own_definition() {
        for t in LinkType::ALL {
            assert_eq!(t.definition().link_type, t);
            assert!(!t.display_name().is_empty());
        }
    }

    #[test]
    fn lookup_by_tag() {
        assert_eq!(lookup("custom-link").map(|d| d.display_name), Some("Custom Link"));
        assert!(lookup("website").is_none());
        assert!(lookup("").is_none());
        assert!(is_link_type_registered("facebook"));
        assert!(!is_link_type_registered("Facebook"));
        assert_eq!(display_name_for_tag("phone"), Some("Phone"));
        assert_eq!(display_name_for_tag("tiktok"), None);
        assert_eq!(get_display_name(LinkType::Instagram), "Instagram");
    }

    #[test]
    fn input_kinds_carry_templates() {
        assert_eq!(
            LinkType::Instagram.definition().input_kind.base_url(),
            Some("https://instagram.com")
        );
        assert_eq!(LinkType::Email.definition().input_kind.protocol(), Some("mailto:"));
        assert_eq!(LinkType::Phone.definition().input_kind.protocol(), Some("tel:"));
        assert_eq!(LinkType::CustomLink.definition().input_kind, InputKind::Domain);
        assert_eq!(LinkType::CustomLink.definition().input_kind.base_url(), None);
    }

    #[test]
    fn patterns_compile_and_match_examples() {
        assert!(INSTAGRAM.matches_pattern("https://www.instagram.com/john_doe"));
        assert!(!INSTAGRAM.matches_pattern("https://instagram.com/john/posts"));
        assert!(EMAIL.matches_pattern("mailto:john@example.com"));
        assert!(PHONE.matches_pattern("tel:+15551234567"));
        assert!(!PHONE.matches_pattern("tel:+123"));
        assert!(CUSTOM_LINK.matches_pattern("https://instagram.com/john"));
        assert!(CUSTOM_LINK.matches_pattern("example.com/path"));
        assert!(!CUSTOM_LINK.matches_pattern("ftp://example.com"));
        assert!(FACEBOOK.matches_pattern("http://facebook.com/john.doe"));
        assert_eq!(definitions().count(), LinkType::ALL.len());
    }

    #[test]
    fn tel_pattern_only_takes_ascii_digits() {
        assert!(PHONE.matches_pattern("tel:+1 (555) 123-4567"));
        assert!(!PHONE.matches_pattern("tel:+1\u{0665}\u{0665}\u{0665}\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}"));
        assert!(!PHONE.matches_pattern("tel:1234567"));
    }
}
