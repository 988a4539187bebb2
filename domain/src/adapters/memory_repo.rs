use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::editing::sort_by_order;
use crate::{CardLinkId, CoreError, LinkId, LinkRepository, StoredLink};

type Key = (CardLinkId, LinkId);

/// Simple in-memory link repository for tests and demos. All operations go
/// through a single mutex guarding the map.
pub struct InMemoryLinkRepo {
    inner: Mutex<BTreeMap<Key, StoredLink>>,
}

impl InMemoryLinkRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }

    fn key(link: &StoredLink) -> Key {
        (link.card_link_id.clone(), link.id.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<Key, StoredLink>>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }
}

impl Default for InMemoryLinkRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRepository for InMemoryLinkRepo {
    fn get(&self, card: &CardLinkId, id: &LinkId) -> Result<Option<StoredLink>, CoreError> {
        let map = self.lock()?;
        Ok(map.get(&(card.clone(), id.clone())).cloned())
    }

    fn put(&self, link: StoredLink) -> Result<(), CoreError> {
        let mut map = self.lock()?;
        let key = Self::key(&link);
        if map.contains_key(&key) {
            return Err(CoreError::AlreadyExists);
        }
        map.insert(key, link);
        Ok(())
    }

    fn update(&self, link: &StoredLink) -> Result<(), CoreError> {
        let mut map = self.lock()?;
        let key = Self::key(link);
        if !map.contains_key(&key) {
            return Err(CoreError::NotFound);
        }
        map.insert(key, link.clone());
        Ok(())
    }

    fn list(&self, card: &CardLinkId) -> Result<Vec<StoredLink>, CoreError> {
        let map = self.lock()?;
        let mut links: Vec<StoredLink> = map
            .values()
            .filter(|l| &l.card_link_id == card)
            .cloned()
            .collect();
        sort_by_order(&mut links);
        Ok(links)
    }

    fn count(&self, card: &CardLinkId) -> Result<usize, CoreError> {
        let map = self.lock()?;
        Ok(map.keys().filter(|(c, _)| c == card).count())
    }

    fn save_all(&self, links: &[StoredLink]) -> Result<(), CoreError> {
        let mut map = self.lock()?;
        if links.iter().any(|l| !map.contains_key(&Self::key(l))) {
            return Err(CoreError::NotFound);
        }
        for link in links {
            map.insert(Self::key(link), link.clone());
        }
        Ok(())
    }
}
