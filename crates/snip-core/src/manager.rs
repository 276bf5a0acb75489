use crate::error::LinkError;
use crate::range::ListRange;
use crate::repository::ShortLink;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, LinkError>;

/// Owns the life cycle of short links.
///
/// Implementations decide which identifier is encoded into the short
/// code of a new or updated record.
#[async_trait]
pub trait LinkManager: Send + Sync + 'static {
    /// Stores `source` under a freshly computed short code.
    async fn create(&self, source: String) -> Result<ShortLink>;

    /// Returns the record with the given id, or `NotFound`.
    async fn get(&self, id: u64) -> Result<ShortLink>;

    /// Returns the record with exactly the given code, or `NotFound`.
    async fn get_by_code(&self, code: &ShortCode) -> Result<ShortLink>;

    /// Replaces the source of an existing record and recomputes its code.
    async fn update(&self, id: u64, source: String) -> Result<ShortLink>;

    /// Removes the record with the given id.
    async fn delete(&self, id: u64) -> Result<()>;

    /// Returns a page of records ordered by ascending id.
    async fn list(&self, range: ListRange) -> Result<Vec<ShortLink>>;
}
