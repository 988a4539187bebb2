//! Domain library for card link profiles.
//!
//! Holds the link types, the per-type registry, and the pure normalization
//! engine that turns a user's raw input into a canonical link. Storage lives
//! behind the `LinkRepository` port; HTTP and auth concerns stay out of this
//! crate.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of supported link types. Every variant has exactly one entry in
/// the registry (see [`registry`]).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    Instagram,
    Email,
    Phone,
    #[default]
    CustomLink,
    Facebook,
}

impl LinkType {
    pub const ALL: [LinkType; 5] = [
        LinkType::Instagram,
        LinkType::Email,
        LinkType::Phone,
        LinkType::CustomLink,
        LinkType::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Instagram => "instagram",
            LinkType::Email => "email",
            LinkType::Phone => "phone",
            LinkType::CustomLink => "custom-link",
            LinkType::Facebook => "facebook",
        }
    }

    /// Parse a wire tag. Tags are case-sensitive, matching the serde form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl Display for LinkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidLinkType(s.to_string()))
    }
}

/// Inbound link data as submitted by the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInput {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub raw_input: String,
    #[serde(default)]
    pub order_index: Option<u32>,
    /// Requested visibility. Absent means active, the stored default.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl LinkInput {
    pub fn new(link_type: LinkType, raw_input: impl Into<String>) -> Self {
        Self {
            link_type,
            raw_input: raw_input.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_order(mut self, order_index: u32) -> Self {
        self.order_index = Some(order_index);
        self
    }
}

/// Per-field validation messages surfaced inline by the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_input: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.raw_input.is_none()
    }
}

/// Editable source data kept alongside the derived URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMeta {
    /// The trimmed user input, kept even when it did not transform.
    #[serde(default)]
    pub raw_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<ValidationErrors>,
}

/// Normalized link ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedLink {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub is_incomplete: bool,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    pub is_active: bool,
    pub meta: LinkMeta,
}

impl ProcessedLink {
    /// Whether the link may be shown on the public page.
    pub fn is_public(&self) -> bool {
        self.is_active && !self.is_incomplete
    }
}

fn validate_id(kind: &'static str, val: &str) -> Result<(), CoreError> {
    if val.is_empty() {
        return Err(CoreError::InvalidId(format!("{} is empty", kind)));
    }
    if !val
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::InvalidId(format!(
            "{} has invalid characters",
            kind
        )));
    }
    Ok(())
}

/// Identifier of a single stored link.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkId(String);

impl LinkId {
    pub fn new<S: Into<String>>(s: S) -> Result<Self, CoreError> {
        let val = s.into();
        validate_id("link id", &val)?;
        Ok(Self(val))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LinkId {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LinkId> for String {
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// Identifier of the card link (public profile) owning a set of links.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardLinkId(String);

impl CardLinkId {
    pub fn new<S: Into<String>>(s: S) -> Result<Self, CoreError> {
        let val = s.into();
        validate_id("card link id", &val)?;
        Ok(Self(val))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CardLinkId {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardLinkId> for String {
    fn from(id: CardLinkId) -> Self {
        id.0
    }
}

/// A processed link as held by storage, keyed by id and owning card link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLink {
    pub id: LinkId,
    pub card_link_id: CardLinkId,
    #[serde(flatten)]
    pub link: ProcessedLink,
}

impl StoredLink {
    pub fn order_index(&self) -> u32 {
        self.link.order_index.unwrap_or(0)
    }
}

/// Repository port for persisting and loading card link entries.
pub trait LinkRepository: Send + Sync {
    fn get(&self, card: &CardLinkId, id: &LinkId) -> Result<Option<StoredLink>, CoreError>;
    fn put(&self, link: StoredLink) -> Result<(), CoreError>;
    fn update(&self, link: &StoredLink) -> Result<(), CoreError>;
    /// All links of a card link, ascending by order index.
    fn list(&self, card: &CardLinkId) -> Result<Vec<StoredLink>, CoreError>;
    fn count(&self, card: &CardLinkId) -> Result<usize, CoreError>;
    /// Update several existing links at once; either all are written or none.
    fn save_all(&self, links: &[StoredLink]) -> Result<(), CoreError>;
}

/// Core domain errors. Input validation problems are data on
/// [`ProcessedLink`], never variants here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid link type: {0}")]
    InvalidLinkType(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("{0}")]
    InvalidReorder(String),
    #[error("resource already exists")]
    AlreadyExists,
    #[error("not found")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(String),
}

/// Return a short about/version line for binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{}", pkg, ver)
}

pub mod adapters;
pub mod classify;
pub mod editing;
pub mod policy;
pub mod processor;
pub mod registry;
pub mod repair;
pub mod service;
pub mod transform;

pub use processor::{process_link, process_links, validate_link};
pub use registry::{display_name_for_tag, get_display_name, is_link_type_registered};
pub use transform::{transform, TransformError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_type_tags_match_serde_form() {
        for t in LinkType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(LinkType::parse(t.as_str()), Some(t));
        }
        assert_eq!(LinkType::parse("Instagram"), None);
        assert!(matches!(
            "website".parse::<LinkType>(),
            Err(CoreError::InvalidLinkType(tag)) if tag == "website"
        ));
    }

    #[test]
    fn link_input_deserializes_camel_case() {
        let input: LinkInput = serde_json::from_str(
            r#"{"type":"custom-link","title":"Site","rawInput":" example.com ","orderIndex":2,"isActive":false}"#,
        )
        .unwrap();
        assert_eq!(input.link_type, LinkType::CustomLink);
        assert_eq!(input.title.as_deref(), Some("Site"));
        assert_eq!(input.raw_input, " example.com ");
        assert_eq!(input.order_index, Some(2));
        assert_eq!(input.is_active, Some(false));
    }

    #[test]
    fn link_input_rejects_unknown_type() {
        let res: Result<LinkInput, _> = serde_json::from_str(r#"{"type":"website","rawInput":"x"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn processed_link_omits_absent_fields() {
        let link = ProcessedLink {
            title: "Email".into(),
            url: None,
            is_incomplete: true,
            link_type: LinkType::Email,
            order_index: None,
            is_active: false,
            meta: LinkMeta {
                raw_input: String::new(),
                validation_errors: None,
            },
        };
        let v = serde_json::to_value(&link).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "title": "Email",
                "isIncomplete": true,
                "type": "email",
                "isActive": false,
                "meta": {"rawInput": ""}
            })
        );
    }

    #[test]
    fn ids_validate_characters() {
        assert!(LinkId::new("abc-123_x").is_ok());
        assert!(matches!(LinkId::new(""), Err(CoreError::InvalidId(_))));
        assert!(matches!(CardLinkId::new("a/b"), Err(CoreError::InvalidId(_))));
        let res: Result<LinkId, _> = serde_json::from_str("\"bad id\"");
        assert!(res.is_err());
    }
}
