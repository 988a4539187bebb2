//! Edits on already stored links: partial updates and reordering.
//!
//! Updates never feed a stored record back through the processor as if it were
//! fresh input. The stored `url` is derived data; the editable source is
//! `meta.raw_input`, and that is what gets re-processed.

use serde::{Deserialize, Serialize};

use crate::processor::process_link;
use crate::{CoreError, LinkId, LinkInput, ProcessedLink, StoredLink};

/// Partial update of a link. The link type cannot be changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub raw_input: Option<String>,
    #[serde(default)]
    pub order_index: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.raw_input.is_none()
            && self.order_index.is_none()
            && self.is_active.is_none()
    }
}

/// Rebuild the editable input a stored link was produced from.
pub fn input_from_stored(link: &ProcessedLink) -> LinkInput {
    LinkInput {
        link_type: link.link_type,
        title: Some(link.title.clone()),
        raw_input: link.meta.raw_input.clone(),
        order_index: link.order_index,
        is_active: Some(link.is_active),
    }
}

/// Overlay `patch` on the stored link's source fields and process again.
pub fn apply_patch(stored: &ProcessedLink, patch: &LinkPatch) -> ProcessedLink {
    let mut input = input_from_stored(stored);
    if let Some(title) = &patch.title {
        input.title = Some(title.clone());
    }
    if let Some(raw) = &patch.raw_input {
        input.raw_input = raw.clone();
    }
    if patch.order_index.is_some() {
        input.order_index = patch.order_index;
    }
    if patch.is_active.is_some() {
        input.is_active = patch.is_active;
    }
    process_link(&input)
}

/// Order index for a link appended to a card link holding `existing` links.
pub fn next_order_index(existing: usize) -> u32 {
    u32::try_from(existing).unwrap_or(u32::MAX)
}

/// Swap the order of exactly two links of `links`.
pub fn swap_order(links: &mut [StoredLink], ids: &[LinkId]) -> Result<(), CoreError> {
    let [a, b] = ids else {
        return Err(CoreError::InvalidReorder(
            "Exactly two ids are required".into(),
        ));
    };
    let pos_a = links.iter().position(|l| &l.id == a);
    let pos_b = links.iter().position(|l| &l.id == b);
    let (Some(i), Some(j)) = (pos_a, pos_b) else {
        return Err(CoreError::InvalidReorder("Invalid link ids".into()));
    };
    let order_a = links[i].link.order_index;
    links[i].link.order_index = links[j].link.order_index;
    links[j].link.order_index = order_a;
    Ok(())
}

/// Sort ascending by order index; ties keep their current relative order.
pub fn sort_by_order(links: &mut [StoredLink]) {
    links.sort_by_key(StoredLink::order_index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardLinkId, LinkType};

    fn stored(id: &str, order: u32, raw: &str) -> StoredLink {
        let link = process_link(
            &LinkInput::new(LinkType::CustomLink, raw)
                .with_title(format!("Link {}", id))
                .with_order(order),
        );
        StoredLink {
            id: LinkId::new(id).unwrap(),
            card_link_id: CardLinkId::new("card").unwrap(),
            link,
        }
    }

    #[test]
    fn patch_reprocesses_from_raw_input_not_url() {
        let link = process_link(&LinkInput::new(LinkType::Instagram, "@john").with_title("IG"));
        assert_eq!(link.url.as_deref(), Some("https://instagram.com/john"));

        let patched = apply_patch(
            &link,
            &LinkPatch {
                title: Some("Insta".into()),
                ..LinkPatch::default()
            },
        );
        assert_eq!(patched.title, "Insta");
        assert_eq!(patched.meta.raw_input, "@john");
        assert_eq!(patched.url.as_deref(), Some("https://instagram.com/john"));
    }

    #[test]
    fn fixing_raw_input_completes_link() {
        let broken = process_link(&LinkInput::new(LinkType::Email, "john@").with_title("Mail"));
        assert!(broken.is_incomplete);
        assert!(!broken.is_active);

        let fixed = apply_patch(
            &broken,
            &LinkPatch {
                raw_input: Some("john@example.com".into()),
                is_active: Some(true),
                ..LinkPatch::default()
            },
        );
        assert!(!fixed.is_incomplete);
        assert!(fixed.is_active);
        assert_eq!(fixed.url.as_deref(), Some("mailto:john@example.com"));
        assert!(fixed.meta.validation_errors.is_none());
    }

    #[test]
    fn clearing_raw_input_deactivates() {
        let link = process_link(&LinkInput::new(LinkType::Phone, "+15551234567").with_title("Call"));
        assert!(link.is_active);
        let cleared = apply_patch(
            &link,
            &LinkPatch {
                raw_input: Some(String::new()),
                ..LinkPatch::default()
            },
        );
        assert!(cleared.is_incomplete);
        assert!(!cleared.is_active);
        assert!(cleared.url.is_none());
    }

    #[test]
    fn empty_patch_is_stable() {
        let link = process_link(&LinkInput::new(LinkType::CustomLink, "example.com").with_title("Site"));
        let patch = LinkPatch::default();
        assert!(patch.is_empty());
        assert_eq!(apply_patch(&link, &patch), link);
    }

    #[test]
    fn swap_exchanges_order_indexes() {
        let mut links = vec![stored("a", 0, "a.com"), stored("b", 1, "b.com"), stored("c", 2, "c.com")];
        let ids = [LinkId::new("a").unwrap(), LinkId::new("c").unwrap()];
        swap_order(&mut links, &ids).unwrap();
        sort_by_order(&mut links);
        let order: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn swap_requires_two_known_ids() {
        let mut links = vec![stored("a", 0, "a.com"), stored("b", 1, "b.com")];
        let one = [LinkId::new("a").unwrap()];
        let err = swap_order(&mut links, &one).unwrap_err();
        assert_eq!(err.to_string(), "Exactly two ids are required");

        let unknown = [LinkId::new("a").unwrap(), LinkId::new("zzz").unwrap()];
        let err = swap_order(&mut links, &unknown).unwrap_err();
        assert_eq!(err.to_string(), "Invalid link ids");
        assert_eq!(links[0].order_index(), 0);
    }

    #[test]
    fn next_order_appends() {
        assert_eq!(next_order_index(0), 0);
        assert_eq!(next_order_index(3), 3);
    }
}
