//! Raw input to canonical URL.
//!
//! An input that already is a well-formed URL is checked against the type's
//! pattern and kept verbatim; anything else is classified by the type's
//! [`InputKind`] and a URL is synthesized from it. The URL check runs first so
//! a pasted profile URL is never wrapped a second time.

use crate::classify::{
    is_domain_like, is_email_like, is_phone_like, is_username_like, is_well_formed_url,
    normalize_phone, normalize_username,
};
use crate::registry::{lookup, InputKind, LinkTypeDefinition};
use crate::LinkType;

/// Why a raw input could not be turned into a URL. `Display` is the message
/// shown to the editor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("Input is required")]
    InputRequired,
    #[error("Invalid link type")]
    InvalidLinkType,
    /// A URL was pasted but it does not belong to the expected service.
    #[error("Please enter a valid {expected} URL")]
    UrlMismatch { expected: String },
    #[error("Please enter a valid username (e.g., @username or username)")]
    InvalidUsername,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Please enter a valid domain (e.g., example.com)")]
    InvalidDomain,
}

/// Transform `raw` into the canonical URL for `link_type`.
pub fn transform(link_type: LinkType, raw: &str) -> Result<String, TransformError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TransformError::InputRequired);
    }
    transform_with(link_type.definition(), raw)
}

/// Same as [`transform`] for an untyped tag coming straight off the wire.
pub fn transform_tag(tag: &str, raw: &str) -> Result<String, TransformError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TransformError::InputRequired);
    }
    let def = lookup(tag).ok_or(TransformError::InvalidLinkType)?;
    transform_with(def, raw)
}

/// Whether `url` is a well-formed URL accepted by `link_type`'s pattern.
pub fn matches_link_type(link_type: LinkType, url: &str) -> bool {
    let url = url.trim();
    is_well_formed_url(url) && link_type.definition().matches_pattern(url)
}

fn transform_with(def: &LinkTypeDefinition, raw: &str) -> Result<String, TransformError> {
    if is_well_formed_url(raw) {
        return if def.matches_pattern(raw) {
            Ok(raw.to_string())
        } else {
            Err(TransformError::UrlMismatch {
                expected: def.display_name.to_lowercase(),
            })
        };
    }

    match def.input_kind {
        InputKind::Username { base_url } => {
            if !is_username_like(raw) {
                return Err(TransformError::InvalidUsername);
            }
            Ok(format!("{}/{}", base_url, normalize_username(raw)))
        }
        InputKind::Email { protocol } => {
            if !is_email_like(raw) {
                return Err(TransformError::InvalidEmail);
            }
            Ok(format!("{}{}", protocol, raw))
        }
        InputKind::Phone { protocol } => {
            if !is_phone_like(raw) {
                return Err(TransformError::InvalidPhone);
            }
            Ok(format!("{}{}", protocol, normalize_phone(raw)))
        }
        InputKind::Domain => {
            if !is_domain_like(raw) {
                return Err(TransformError::InvalidDomain);
            }
            let url = format!("https://{}", raw);
            // `%zz.com` passes the shape check but is not a valid host.
            if !is_well_formed_url(&url) {
                return Err(TransformError::InvalidDomain);
            }
            Ok(url)
        }
    }
}
