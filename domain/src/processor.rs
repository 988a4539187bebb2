//! Turns an inbound [`LinkInput`] into a [`ProcessedLink`].
//!
//! Processing is a pure function of its input: it keeps no state between
//! calls and reports every business-level problem as data on the result.

use crate::policy::{effective_active, is_complete};
use crate::transform::transform;
use crate::{LinkInput, LinkMeta, ProcessedLink, ValidationErrors};

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 160;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title must be 160 characters or fewer";

/// Title check, independent of the fallback applied to the stored title.
pub fn validate_title(title: Option<&str>) -> Option<&'static str> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        Some(TITLE_REQUIRED)
    } else if title.chars().count() > MAX_TITLE_LEN {
        Some(TITLE_TOO_LONG)
    } else {
        None
    }
}

pub fn process_link(input: &LinkInput) -> ProcessedLink {
    let raw_input = input.raw_input.trim();
    let transformed = transform(input.link_type, raw_input);

    let title_error = validate_title(input.title.as_deref());
    let final_title = match input.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => input.link_type.display_name().to_string(),
    };

    let complete = is_complete(input.link_type, &final_title, raw_input);
    let is_active = effective_active(input.is_active.unwrap_or(true), complete);

    let (url, raw_error) = match transformed {
        Ok(url) => (Some(url), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let errors = ValidationErrors {
        title: title_error.map(str::to_string),
        raw_input: raw_error,
    };

    ProcessedLink {
        title: final_title,
        url,
        is_incomplete: !complete,
        link_type: input.link_type,
        order_index: input.order_index,
        is_active,
        meta: LinkMeta {
            raw_input: raw_input.to_string(),
            validation_errors: (!errors.is_empty()).then_some(errors),
        },
    }
}

pub fn process_links(inputs: &[LinkInput]) -> Vec<ProcessedLink> {
    inputs.iter().map(process_link).collect()
}

/// True when the input would produce a complete link.
pub fn validate_link(input: &LinkInput) -> bool {
    !process_link(input).is_incomplete
}
