use crate::error::StorageError;
use crate::range::ListRange;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    /// Storage assigned identifier, starting at 1.
    pub id: u64,
    /// The original URL.
    pub source: String,
    /// The public short code.
    pub code: ShortCode,
}

/// A short link whose id has not been assigned yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub source: String,
    pub code: ShortCode,
}

impl NewShortLink {
    /// Attaches a storage assigned id.
    pub fn with_id(self, id: u64) -> ShortLink {
        ShortLink {
            id,
            source: self.source,
            code: self.code,
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record with the given id.
    /// Returns `None` if no row matches.
    async fn get(&self, id: u64) -> Result<Option<ShortLink>>;

    /// Retrieves the record with exactly the given code.
    /// When several rows share a code, the one with the lowest id is returned.
    async fn get_by_code(&self, code: &ShortCode) -> Result<Option<ShortLink>>;

    /// Returns the records in `range`, ordered by ascending id.
    async fn list(&self, range: ListRange) -> Result<Vec<ShortLink>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Returns the most recently generated id, independent of any insert in
    /// progress. Returns `None` if the id sequence was never advanced.
    async fn last_id(&self) -> Result<Option<u64>>;

    /// Atomically reserves the next id. Reserved ids are never handed out
    /// twice, even if the caller never inserts a row with them.
    async fn next_id(&self) -> Result<u64>;

    /// Inserts a record with an explicit, previously reserved id.
    /// Returns `Err(Conflict)` if the id is already taken.
    async fn insert(&self, link: &ShortLink) -> Result<()>;

    /// Inserts a record and lets storage assign its id.
    async fn insert_generated(&self, link: NewShortLink) -> Result<ShortLink>;

    /// Overwrites source and code of the record with `link.id`.
    /// Returns `true` if a row was updated.
    async fn update(&self, link: &ShortLink) -> Result<bool>;

    /// Deletes the record with the given id.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, id: u64) -> Result<bool>;
}
