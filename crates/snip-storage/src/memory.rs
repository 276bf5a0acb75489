use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use snip_core::repository::{NewShortLink, ReadRepository, Repository, Result, ShortLink};
use snip_core::{ListRange, ShortCode, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage entry for a short link.
#[derive(Debug, Clone)]
struct StoredLink {
    source: String,
    code: ShortCode,
}

impl StoredLink {
    fn into_link(self, id: u64) -> ShortLink {
        ShortLink {
            id,
            source: self.source,
            code: self.code,
        }
    }
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// Ids come from an atomic counter that behaves like a database sequence:
/// it starts at 1, never goes backwards and never reuses a value, even
/// after deletes.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<u64, StoredLink>,
    sequence: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, id: u64) -> Result<Option<ShortLink>> {
        Ok(self
            .storage
            .get(&id)
            .map(|entry| entry.value().clone().into_link(id)))
    }

    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        Ok(self
            .storage
            .iter()
            .filter(|entry| entry.value().code == *code)
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone().into_link(*entry.key())))
    }

    async fn list(&self, range: ListRange) -> Result<Vec<ShortLink>> {
        let mut links: Vec<ShortLink> = self
            .storage
            .iter()
            .map(|entry| entry.value().clone().into_link(*entry.key()))
            .collect();
        links.sort_unstable_by_key(|link| link.id);

        let start = usize::try_from(range.start()).unwrap_or(usize::MAX);
        let count = usize::try_from(range.count()).unwrap_or(usize::MAX);

        Ok(links.into_iter().skip(start).take(count).collect())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn last_id(&self) -> Result<Option<u64>> {
        match self.sequence.load(Ordering::SeqCst) {
            0 => Ok(None),
            id => Ok(Some(id)),
        }
    }

    async fn next_id(&self) -> Result<u64> {
        let previous = self
            .sequence
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map_err(|_| StorageError::Operation("id sequence exhausted".to_string()))?;
        Ok(previous + 1)
    }

    async fn insert(&self, link: &ShortLink) -> Result<()> {
        match self.storage.entry(link.id) {
            Entry::Occupied(_) => Err(StorageError::Conflict(format!("id {}", link.id))),
            Entry::Vacant(slot) => {
                slot.insert(StoredLink {
                    source: link.source.clone(),
                    code: link.code.clone(),
                });
                Ok(())
            }
        }
    }

    async fn insert_generated(&self, link: NewShortLink) -> Result<ShortLink> {
        let id = self.next_id().await?;
        let link = link.with_id(id);
        self.insert(&link).await?;
        Ok(link)
    }

    async fn update(&self, link: &ShortLink) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(&link.id) else {
            return Ok(false);
        };

        entry.source = link.source.clone();
        entry.code = link.code.clone();
        Ok(true)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.storage.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(source: &str, code: &str) -> NewShortLink {
        NewShortLink {
            source: source.to_string(),
            code: ShortCode::new_unchecked(code),
        }
    }

    #[tokio::test]
    async fn insert_generated_and_get() {
        let repo = InMemoryRepository::new();

        let link = repo
            .insert_generated(new_link("https://example.com", "aaaaaaaaaa"))
            .await
            .unwrap();
        assert_eq!(link.id, 1);

        let got = repo.get(1).await.unwrap().unwrap();
        assert_eq!(got, link);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(repo.get(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn last_id_tracks_sequence() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.last_id().await.unwrap(), None);

        assert_eq!(repo.next_id().await.unwrap(), 1);
        assert_eq!(repo.next_id().await.unwrap(), 2);
        assert_eq!(repo.last_id().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryRepository::new();
        let first = repo
            .insert_generated(new_link("https://one.example", "aaaaaaaaaa"))
            .await
            .unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo
            .insert_generated(new_link("https://two.example", "aaaaaaaaab"))
            .await
            .unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn insert_conflict_on_taken_id() {
        let repo = InMemoryRepository::new();
        let link = new_link("https://example.com", "aaaaaaaaaa").with_id(5);

        repo.insert(&link).await.unwrap();
        let err = repo.insert(&link).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn get_by_code_prefers_lowest_id() {
        let repo = InMemoryRepository::new();
        repo.insert(&new_link("https://late.example", "dup").with_id(9))
            .await
            .unwrap();
        repo.insert(&new_link("https://early.example", "dup").with_id(3))
            .await
            .unwrap();

        let got = repo
            .get_by_code(&ShortCode::new_unchecked("dup"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.id, 3);

        assert!(repo
            .get_by_code(&ShortCode::new_unchecked("DUP"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_existing_and_missing() {
        let repo = InMemoryRepository::new();
        let link = repo
            .insert_generated(new_link("https://old.example", "aaaaaaaaaa"))
            .await
            .unwrap();

        let changed = ShortLink {
            source: "https://new.example".to_string(),
            ..link.clone()
        };
        assert!(repo.update(&changed).await.unwrap());
        assert_eq!(repo.get(link.id).await.unwrap().unwrap(), changed);

        let missing = ShortLink { id: 99, ..changed };
        assert!(!repo.update(&missing).await.unwrap());
    }

    #[tokio::test]
    async fn delete_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_ordered_and_sliced() {
        let repo = InMemoryRepository::new();
        for id in [4u64, 1, 3, 2, 5] {
            repo.insert(&new_link(&format!("https://{id}.example"), "c").with_id(id))
                .await
                .unwrap();
        }

        let ids = |links: Vec<ShortLink>| links.into_iter().map(|l| l.id).collect::<Vec<_>>();

        let all = repo.list(ListRange::new(0, 10)).await.unwrap();
        assert_eq!(ids(all), vec![1, 2, 3, 4, 5]);

        let page = repo.list(ListRange::new(1, 2)).await.unwrap();
        assert_eq!(ids(page), vec![2, 3]);

        let past_end = repo.list(ListRange::new(10, 5)).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn concurrent_generated_inserts_get_distinct_ids() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_generated(new_link(&format!("https://example{i}.com"), "c"))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(repo.len(), 10);
    }
}
