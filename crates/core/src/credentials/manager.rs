//! Credential pool manager with hydration-gated persistence.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::store::{KvStore, StoreError};

use super::{CredentialError, CredentialPool, CredentialRecord, CredentialUpdate, Provider};

struct Inner {
    translation: CredentialPool,
    speech_synthesis: CredentialPool,
    hydrated: bool,
}

impl Inner {
    fn pool(&self, provider: Provider) -> &CredentialPool {
        match provider {
            Provider::Translation => &self.translation,
            Provider::SpeechSynthesis => &self.speech_synthesis,
        }
    }

    fn pool_mut(&mut self, provider: Provider) -> &mut CredentialPool {
        match provider {
            Provider::Translation => &mut self.translation,
            Provider::SpeechSynthesis => &mut self.speech_synthesis,
        }
    }
}

/// Owns all credential pools and their persistence.
///
/// Pools live in memory; every mutation after hydration writes the affected
/// pool back to the store in full. Mutations before [`hydrate`] complete in
/// memory but are never written, so a half-started process cannot overwrite
/// a previously persisted pool with an empty one.
///
/// [`hydrate`]: CredentialManager::hydrate
pub struct CredentialManager {
    store: Arc<dyn KvStore>,
    inner: RwLock<Inner>,
}

impl CredentialManager {
    /// Create a manager with empty pools. Call [`hydrate`] before serving.
    ///
    /// [`hydrate`]: CredentialManager::hydrate
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            inner: RwLock::new(Inner {
                translation: CredentialPool::new(),
                speech_synthesis: CredentialPool::new(),
                hydrated: false,
            }),
        }
    }

    /// One-time load of all pools from storage, enabling write-back.
    ///
    /// Replaces whatever is in memory with the stored pools. A corrupt pool
    /// document is logged and replaced with an empty pool without affecting
    /// the other pool's load; a storage read failure aborts hydration.
    pub async fn hydrate(&self) -> Result<(), CredentialError> {
        let mut inner = self.inner.write().await;
        if inner.hydrated {
            return Ok(());
        }

        for provider in Provider::ALL {
            let pool = match self.store.get(provider.storage_key())? {
                Some(json) => match serde_json::from_str::<Vec<CredentialRecord>>(&json) {
                    Ok(records) => {
                        debug!(
                            provider = %provider,
                            count = records.len(),
                            "Loaded credential pool"
                        );
                        CredentialPool::from_records(records)
                    }
                    Err(e) => {
                        warn!(
                            provider = %provider,
                            error = %e,
                            "Stored credential pool is corrupt, starting empty"
                        );
                        CredentialPool::new()
                    }
                },
                None => CredentialPool::new(),
            };
            metrics::CREDENTIAL_POOL_SIZE
                .with_label_values(&[provider.as_str()])
                .set(pool.len() as i64);
            *inner.pool_mut(provider) = pool;
        }

        inner.hydrated = true;
        Ok(())
    }

    /// All records in the provider's pool, in pool order.
    pub async fn list(&self, provider: Provider) -> Vec<CredentialRecord> {
        let inner = self.inner.read().await;
        inner.pool(provider).records().to_vec()
    }

    /// Append a fresh record (enabled, empty secret) and return it.
    pub async fn add(
        &self,
        provider: Provider,
        display_name: &str,
    ) -> Result<CredentialRecord, CredentialError> {
        let mut inner = self.inner.write().await;
        let record = inner.pool_mut(provider).add(display_name);
        info!(provider = %provider, id = %record.id, "Added credential");
        self.persist(&inner, provider)?;
        Ok(record)
    }

    /// Merge partial fields into the record with the given id.
    pub async fn update(
        &self,
        provider: Provider,
        id: &str,
        update: CredentialUpdate,
    ) -> Result<CredentialRecord, CredentialError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .pool_mut(provider)
            .update(id, update)
            .ok_or_else(|| CredentialError::NotFound(id.to_string()))?;
        self.persist(&inner, provider)?;
        Ok(record)
    }

    /// Remove the record with the given id. Removing an unknown id is a no-op.
    pub async fn remove(&self, provider: Provider, id: &str) -> Result<(), CredentialError> {
        let mut inner = self.inner.write().await;
        if inner.pool_mut(provider).remove(id) {
            info!(provider = %provider, id = %id, "Removed credential");
            self.persist(&inner, provider)?;
        }
        Ok(())
    }

    /// Fixed-priority selection: the first enabled record in pool order.
    pub async fn select_active(
        &self,
        provider: Provider,
    ) -> Result<CredentialRecord, CredentialError> {
        let inner = self.inner.read().await;
        match inner.pool(provider).select_active() {
            Some(record) => {
                metrics::CREDENTIAL_SELECTIONS
                    .with_label_values(&[provider.as_str(), "selected"])
                    .inc();
                Ok(record.clone())
            }
            None => {
                metrics::CREDENTIAL_SELECTIONS
                    .with_label_values(&[provider.as_str(), "none"])
                    .inc();
                Err(CredentialError::NoCredential(provider))
            }
        }
    }

    /// Record a successful use of a credential.
    ///
    /// The record may have been removed while the call it served was in
    /// flight; that case is a silent no-op. A persistence failure here must
    /// not fail the pipeline operation that just succeeded, so it is only
    /// logged.
    pub async fn mark_used(&self, provider: Provider, id: &str) {
        let mut inner = self.inner.write().await;
        if !inner.pool_mut(provider).mark_used(id, Utc::now()) {
            return;
        }
        if let Err(e) = self.persist(&inner, provider) {
            warn!(
                provider = %provider,
                id = %id,
                error = %e,
                "Failed to persist credential usage"
            );
        }
    }

    fn persist(&self, inner: &Inner, provider: Provider) -> Result<(), CredentialError> {
        metrics::CREDENTIAL_POOL_SIZE
            .with_label_values(&[provider.as_str()])
            .set(inner.pool(provider).len() as i64);

        if !inner.hydrated {
            debug!(provider = %provider, "Skipping persistence before hydration");
            return Ok(());
        }

        let json = serde_json::to_string(inner.pool(provider).records())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(provider.storage_key(), &json)?;
        Ok(())
    }
}
