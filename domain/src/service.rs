use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::editing::{apply_patch, next_order_index, sort_by_order, swap_order, LinkPatch};
use crate::processor::process_link;
use crate::{CardLinkId, CoreError, LinkId, LinkInput, LinkRepository, StoredLink};

/// Application service for the links of a card link.
///
/// Every operation is scoped to one card link: a link id that belongs to a
/// different card link is reported as `NotFound`. Checking that the caller
/// owns the card link is left to the auth layer in front of this service.
pub struct LinkService<R: LinkRepository> {
    repo: R,
    next_id: AtomicU64,
}

impl<R: LinkRepository> LinkService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            next_id: AtomicU64::new(1),
        }
    }

    fn reserve_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Process and store a new link at the end of the card link's list.
    /// The requested order index is ignored on create.
    pub fn create(&self, card: &CardLinkId, input: &LinkInput) -> Result<StoredLink, CoreError> {
        let mut link = process_link(input);
        link.order_index = Some(next_order_index(self.repo.count(card)?));

        // Retry on the unlikely event of an id already taken by a caller-made link.
        for _ in 0..100 {
            let id = LinkId::new(format!("link-{}", self.reserve_id()))?;
            if self.repo.get(card, &id)?.is_some() {
                continue;
            }
            let stored = StoredLink {
                id,
                card_link_id: card.clone(),
                link,
            };
            self.repo.put(stored.clone())?;
            info!(
                card = card.as_str(),
                link = stored.id.as_str(),
                link_type = %stored.link.link_type,
                incomplete = stored.link.is_incomplete,
                "link created"
            );
            return Ok(stored);
        }
        Err(CoreError::Repository("failed to allocate link id".into()))
    }

    /// Apply a partial update and re-process the link from its raw input.
    pub fn update(
        &self,
        card: &CardLinkId,
        id: &LinkId,
        patch: &LinkPatch,
    ) -> Result<StoredLink, CoreError> {
        let mut stored = self.repo.get(card, id)?.ok_or(CoreError::NotFound)?;
        if patch.is_empty() {
            debug!(card = card.as_str(), link = id.as_str(), "empty patch, nothing to do");
            return Ok(stored);
        }
        stored.link = apply_patch(&stored.link, patch);
        self.repo.update(&stored)?;
        info!(
            card = card.as_str(),
            link = id.as_str(),
            incomplete = stored.link.is_incomplete,
            active = stored.link.is_active,
            "link updated"
        );
        Ok(stored)
    }

    /// Swap two links and return the full, reordered list.
    pub fn reorder(&self, card: &CardLinkId, ids: &[LinkId]) -> Result<Vec<StoredLink>, CoreError> {
        let mut links = self.repo.list(card)?;
        swap_order(&mut links, ids)?;
        let swapped: Vec<StoredLink> = links
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect();
        self.repo.save_all(&swapped)?;
        sort_by_order(&mut links);
        debug!(card = card.as_str(), "links reordered");
        Ok(links)
    }

    pub fn get(&self, card: &CardLinkId, id: &LinkId) -> Result<StoredLink, CoreError> {
        self.repo.get(card, id)?.ok_or(CoreError::NotFound)
    }

    /// All links of the card link, as the editor sees them.
    pub fn list(&self, card: &CardLinkId) -> Result<Vec<StoredLink>, CoreError> {
        self.repo.list(card)
    }

    /// Links rendered on the public page: active and complete, in order.
    pub fn public_links(&self, card: &CardLinkId) -> Result<Vec<StoredLink>, CoreError> {
        Ok(self
            .repo
            .list(card)?
            .into_iter()
            .filter(|l| l.link.is_public())
            .collect())
    }
}
