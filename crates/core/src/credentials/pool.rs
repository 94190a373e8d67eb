//! A single provider's ordered credential pool.

use chrono::{DateTime, Utc};

use super::{CredentialRecord, CredentialUpdate};

/// Ordered sequence of credential records for one provider.
///
/// Order is insertion order and is significant: selection returns the first
/// enabled record, so earlier records have strictly higher priority.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    records: Vec<CredentialRecord>,
}

impl CredentialPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a pool from its persisted records, preserving order.
    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    /// All records in pool order.
    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    /// Number of records, enabled or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the pool has no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a fresh record and return it.
    pub fn add(&mut self, display_name: &str) -> CredentialRecord {
        let record = CredentialRecord::new(display_name);
        self.records.push(record.clone());
        record
    }

    /// Merge `update` into the record with the given id.
    ///
    /// Returns the updated record, or `None` if no record matches.
    pub fn update(&mut self, id: &str, update: CredentialUpdate) -> Option<CredentialRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        if let Some(display_name) = update.display_name {
            record.display_name = display_name;
        }
        if let Some(secret) = update.secret {
            record.secret = secret;
        }
        if let Some(enabled) = update.enabled {
            record.enabled = enabled;
        }
        Some(record.clone())
    }

    /// Remove the record with the given id, preserving the order of the rest.
    ///
    /// Returns `true` if a record was removed. Removing an unknown id is a
    /// no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Fixed-priority selection: the first enabled record in pool order.
    ///
    /// `last_used_at` does not affect selection; repeated calls keep
    /// returning the same record until it is disabled or removed.
    pub fn select_active(&self) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.enabled)
    }

    /// Record a successful use of the credential with the given id.
    ///
    /// Returns `true` if the record still exists.
    pub fn mark_used(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.last_used_at = Some(at);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_in_order() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        let b = pool.add("B");

        let ids: Vec<_> = pool.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_select_active_returns_first_enabled() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        pool.add("B");

        assert_eq!(pool.select_active().unwrap().id, a.id);
    }

    #[test]
    fn test_select_active_skips_disabled() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        let b = pool.add("B");

        pool.update(
            &a.id,
            CredentialUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(pool.select_active().unwrap().id, b.id);
    }

    #[test]
    fn test_select_active_ignores_last_used_at() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        let b = pool.add("B");

        // A was used recently, B never. Selection must still prefer A.
        pool.mark_used(&a.id, Utc::now());
        assert_eq!(pool.select_active().unwrap().id, a.id);
        assert!(pool
            .records()
            .iter()
            .find(|r| r.id == b.id)
            .unwrap()
            .last_used_at
            .is_none());
    }

    #[test]
    fn test_select_active_empty_pool() {
        let pool = CredentialPool::new();
        assert!(pool.select_active().is_none());
    }

    #[test]
    fn test_update_unknown_id() {
        let mut pool = CredentialPool::new();
        pool.add("A");

        let result = pool.update("no-such-id", CredentialUpdate::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");

        let updated = pool
            .update(
                &a.id,
                CredentialUpdate {
                    secret: Some("s3cret".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.display_name, "A");
        assert_eq!(updated.secret, "s3cret");
        assert!(updated.enabled);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        let b = pool.add("B");
        let c = pool.add("C");

        assert!(pool.remove(&b.id));

        let ids: Vec<_> = pool.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");

        assert!(pool.remove(&a.id));
        assert!(!pool.remove(&a.id));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_mark_used_on_removed_record() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        pool.remove(&a.id);

        assert!(!pool.mark_used(&a.id, Utc::now()));
    }

    #[test]
    fn test_disable_then_remove_scenario() {
        let mut pool = CredentialPool::new();
        let a = pool.add("A");
        let b = pool.add("B");

        assert_eq!(pool.select_active().unwrap().id, a.id);

        pool.update(
            &a.id,
            CredentialUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(pool.select_active().unwrap().id, b.id);

        pool.remove(&b.id);
        assert!(pool.select_active().is_none());
    }
}
