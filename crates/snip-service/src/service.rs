use crate::strategy::IdStrategy;
use async_trait::async_trait;
use snip_core::{
    LinkError, LinkManager, ListRange, NewShortLink, Repository, ShortCode, ShortLink,
};
use snip_encoder::{Encoder, EncoderError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Reference identifier used before any id has been generated.
const INITIAL_REFERENCE: u64 = 0;

/// A concrete implementation of the `LinkManager` trait.
///
/// This service wraps a `Repository` and an `Encoder` to handle:
/// - source validation
/// - choosing the reference identifier for new and updated records
/// - mapping "no rows" outcomes to `LinkError::NotFound`
///
/// Storage ids start at 1 while the encoder domain starts at 0, so the
/// reference identifier of a record is `id - 1`. The first record ever
/// stored is therefore encoded from 0.
#[derive(Debug)]
pub struct LinkService<R> {
    repository: Arc<R>,
    encoder: Encoder,
    strategy: IdStrategy,
    sequence_guard: Mutex<()>,
}

impl<R: Repository> LinkService<R> {
    /// Creates a new `LinkService` using [`IdStrategy::Reserve`].
    pub fn new(repository: R, encoder: Encoder) -> Self {
        Self::with_shared(Arc::new(repository), encoder)
    }

    /// Creates a new `LinkService` over a repository shared with other owners.
    pub fn with_shared(repository: Arc<R>, encoder: Encoder) -> Self {
        Self {
            repository,
            encoder,
            strategy: IdStrategy::default(),
            sequence_guard: Mutex::new(()),
        }
    }

    /// Switches the identifier acquisition strategy.
    pub fn with_strategy(mut self, strategy: IdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn validate_source(source: &str) -> Result<(), LinkError> {
        if source.is_empty() {
            return Err(LinkError::InvalidInput(
                "source cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The encoder input for the record with storage id `id`.
    fn reference_for(id: u64) -> Option<u64> {
        id.checked_sub(1)
    }

    fn encode(&self, reference: u64) -> Result<ShortCode, LinkError> {
        self.encoder
            .encode(reference)
            .map_err(|e| LinkError::Encoding(e.to_string()))
    }

    async fn create_reserved(&self, source: String) -> Result<ShortLink, LinkError> {
        let id = self.repository.next_id().await?;
        let reference = Self::reference_for(id).ok_or_else(|| {
            LinkError::Encoding(format!("storage reserved invalid id {}", id))
        })?;

        let link = ShortLink {
            id,
            source,
            code: self.encode(reference)?,
        };
        self.repository.insert(&link).await?;

        Ok(link)
    }

    async fn create_sequenced(&self, source: String) -> Result<ShortLink, LinkError> {
        // Probe and insert must not interleave with another create from this process.
        let _guard = self.sequence_guard.lock().await;

        let reference = match self.repository.last_id().await {
            Ok(Some(last)) => last,
            Ok(None) => {
                debug!("no id generated yet, using initial reference");
                INITIAL_REFERENCE
            }
            Err(e) => {
                warn!(error = %e, "failed to read last generated id, using initial reference");
                INITIAL_REFERENCE
            }
        };

        let link = NewShortLink {
            source,
            code: self.encode(reference)?,
        };

        Ok(self.repository.insert_generated(link).await?)
    }
}

#[async_trait]
impl<R: Repository> LinkManager for LinkService<R> {
    async fn create(&self, source: String) -> Result<ShortLink, LinkError> {
        Self::validate_source(&source)?;

        let link = match self.strategy {
            IdStrategy::Reserve => self.create_reserved(source).await?,
            IdStrategy::Sequence => self.create_sequenced(source).await?,
        };

        debug!(id = link.id, code = %link.code, strategy = %self.strategy, "created short link");
        Ok(link)
    }

    async fn get(&self, id: u64) -> Result<ShortLink, LinkError> {
        trace!(id, "fetching short link by id");
        self.repository.get(id).await?.ok_or(LinkError::NotFound)
    }

    async fn get_by_code(&self, code: &ShortCode) -> Result<ShortLink, LinkError> {
        trace!(code = %code, "fetching short link by code");
        self.repository
            .get_by_code(code)
            .await?
            .ok_or(LinkError::NotFound)
    }

    async fn update(&self, id: u64, source: String) -> Result<ShortLink, LinkError> {
        Self::validate_source(&source)?;

        let reference = Self::reference_for(id).ok_or(LinkError::NotFound)?;
        let code = match self.encoder.encode(reference) {
            Ok(code) => code,
            // No stored record can carry an id the encoder cannot represent.
            Err(EncoderError::OutOfRange { .. }) => {
                debug!(id, "id is outside the encodable range");
                return Err(LinkError::NotFound);
            }
            Err(e) => return Err(LinkError::Encoding(e.to_string())),
        };
        let link = ShortLink { id, source, code };

        if !self.repository.update(&link).await? {
            debug!(id, "update matched no rows");
            return Err(LinkError::NotFound);
        }

        debug!(id, code = %link.code, "updated short link");
        Ok(link)
    }

    async fn delete(&self, id: u64) -> Result<(), LinkError> {
        if !self.repository.delete(id).await? {
            debug!(id, "delete matched no rows");
            return Err(LinkError::NotFound);
        }

        debug!(id, "deleted short link");
        Ok(())
    }

    async fn list(&self, range: ListRange) -> Result<Vec<ShortLink>, LinkError> {
        trace!(start = range.start(), count = range.count(), "listing short links");
        Ok(self.repository.list(range).await?)
    }
}
