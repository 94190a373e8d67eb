//! Credential pool lifecycle integration tests.
//!
//! These tests cover pool CRUD, fixed-priority selection, persistence
//! round-trips and the hydration gate.

use std::sync::Arc;

use overdub_core::{
    testing::MockKvStore, CredentialError, CredentialManager, CredentialUpdate, KvStore, Provider,
    SqliteKvStore, StoreError,
};

fn sqlite_manager() -> (Arc<SqliteKvStore>, CredentialManager) {
    let store = Arc::new(SqliteKvStore::in_memory().expect("Failed to create store"));
    let manager = CredentialManager::new(store.clone());
    (store, manager)
}

fn mock_manager() -> (Arc<MockKvStore>, CredentialManager) {
    let store = Arc::new(MockKvStore::new());
    let manager = CredentialManager::new(store.clone());
    (store, manager)
}

// =============================================================================
// Selection Tests
// =============================================================================

#[tokio::test]
async fn test_priority_follows_pool_order_as_records_change() {
    let (_store, manager) = sqlite_manager();
    manager.hydrate().await.unwrap();

    let a = manager.add(Provider::Translation, "Key A").await.unwrap();
    let b = manager.add(Provider::Translation, "Key B").await.unwrap();

    // Both enabled: the earlier record wins
    assert_eq!(manager.select_active(Provider::Translation).await.unwrap().id, a.id);

    // Disabling the first promotes the second
    manager
        .update(
            Provider::Translation,
            &a.id,
            CredentialUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(manager.select_active(Provider::Translation).await.unwrap().id, b.id);

    // Removing the second leaves nothing selectable
    manager.remove(Provider::Translation, &b.id).await.unwrap();
    assert!(matches!(
        manager.select_active(Provider::Translation).await,
        Err(CredentialError::NoCredential(Provider::Translation))
    ));

    // Re-enabling the first restores selection
    manager
        .update(
            Provider::Translation,
            &a.id,
            CredentialUpdate {
                enabled: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(manager.select_active(Provider::Translation).await.unwrap().id, a.id);
}

#[tokio::test]
async fn test_selection_ignores_usage_history() {
    let (_store, manager) = sqlite_manager();
    manager.hydrate().await.unwrap();

    let a = manager.add(Provider::Translation, "Key A").await.unwrap();
    let _b = manager.add(Provider::Translation, "Key B").await.unwrap();

    // Heavy use of the first key does not rotate selection away from it
    for _ in 0..3 {
        manager.mark_used(Provider::Translation, &a.id).await;
    }
    assert_eq!(manager.select_active(Provider::Translation).await.unwrap().id, a.id);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[tokio::test]
async fn test_pool_round_trips_through_storage() {
    let store = Arc::new(SqliteKvStore::in_memory().unwrap());

    let manager = CredentialManager::new(store.clone());
    manager.hydrate().await.unwrap();
    let a = manager.add(Provider::Translation, "Key A").await.unwrap();
    let b = manager.add(Provider::Translation, "Key B").await.unwrap();
    manager
        .update(
            Provider::Translation,
            &b.id,
            CredentialUpdate {
                secret: Some("b-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    drop(manager);

    let restarted = CredentialManager::new(store);
    restarted.hydrate().await.unwrap();
    let records = restarted.list(Provider::Translation).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, a.id);
    assert_eq!(records[1].id, b.id);
    assert_eq!(records[1].secret, "b-secret");
    assert_eq!(
        restarted.select_active(Provider::Translation).await.unwrap().id,
        a.id
    );
}

#[tokio::test]
async fn test_stored_document_shape() {
    let (store, manager) = sqlite_manager();
    manager.hydrate().await.unwrap();

    let record = manager.add(Provider::Translation, "Main Key").await.unwrap();

    let stored = store.get("credentials/translation").unwrap().unwrap();
    assert!(stored.starts_with('['));
    assert!(stored.contains("\"displayName\":\"Main Key\""));
    assert!(stored.contains("\"enabled\":true"));
    // Never-used records carry no timestamp at all
    assert!(!stored.contains("lastUsedAt"));

    manager.mark_used(Provider::Translation, &record.id).await;
    let stored = store.get("credentials/translation").unwrap().unwrap();
    assert!(stored.contains("lastUsedAt"));
}

#[tokio::test]
async fn test_last_used_at_round_trips() {
    let store = Arc::new(SqliteKvStore::in_memory().unwrap());

    let manager = CredentialManager::new(store.clone());
    manager.hydrate().await.unwrap();
    let record = manager.add(Provider::SpeechSynthesis, "Voice Key").await.unwrap();
    manager.mark_used(Provider::SpeechSynthesis, &record.id).await;
    drop(manager);

    let restarted = CredentialManager::new(store);
    restarted.hydrate().await.unwrap();
    let records = restarted.list(Provider::SpeechSynthesis).await;
    assert!(records[0].last_used_at.is_some());
}

#[tokio::test]
async fn test_unparseable_stored_timestamp_loads_as_never_used() {
    let (store, manager) = sqlite_manager();
    store
        .set(
            "credentials/translation",
            r#"[{"id":"a1","displayName":"Key A","secret":"s","enabled":true,"lastUsedAt":"last tuesday"}]"#,
        )
        .unwrap();

    manager.hydrate().await.unwrap();

    let records = manager.list(Provider::Translation).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
    assert_eq!(records[0].secret, "s");
    assert!(records[0].last_used_at.is_none());
}

#[tokio::test]
async fn test_unknown_fields_in_stored_pool_are_ignored() {
    let (store, manager) = sqlite_manager();
    store
        .set(
            "credentials/translation",
            r#"[{"id":"a1","displayName":"Key A","secret":"s","enabled":true,"quotaRemaining":42}]"#,
        )
        .unwrap();

    manager.hydrate().await.unwrap();

    let records = manager.list(Provider::Translation).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
}

// =============================================================================
// Hydration Gate Tests
// =============================================================================

#[tokio::test]
async fn test_hydration_reads_without_writing_back() {
    let (store, manager) = mock_manager();
    store.seed(
        "credentials/translation",
        r#"[{"id":"a1","displayName":"Key A","secret":"s","enabled":true}]"#,
    );

    manager.hydrate().await.unwrap();

    assert_eq!(store.set_count(), 0, "Hydration must not write");
    assert_eq!(manager.list(Provider::Translation).await.len(), 1);

    manager.add(Provider::Translation, "Key B").await.unwrap();
    assert_eq!(store.set_count(), 1);
}

#[tokio::test]
async fn test_mutations_before_hydration_are_memory_only() {
    let (store, manager) = mock_manager();
    store.seed(
        "credentials/translation",
        r#"[{"id":"stored","displayName":"Stored","secret":"","enabled":true}]"#,
    );

    // No hydrate yet: the mutation lands in memory but never in the store
    manager.add(Provider::Translation, "Premature").await.unwrap();
    assert_eq!(store.set_count(), 0);

    // Hydration then replaces the premature record with stored state
    manager.hydrate().await.unwrap();
    let records = manager.list(Provider::Translation).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "stored");
}

#[tokio::test]
async fn test_hydrate_is_idempotent() {
    let (store, manager) = mock_manager();
    store.seed(
        "credentials/translation",
        r#"[{"id":"a1","displayName":"Key A","secret":"s","enabled":true}]"#,
    );

    manager.hydrate().await.unwrap();
    manager.add(Provider::Translation, "Key B").await.unwrap();

    // A second hydrate must not reload and wipe the in-memory addition
    manager.hydrate().await.unwrap();
    assert_eq!(manager.list(Provider::Translation).await.len(), 2);
}

#[tokio::test]
async fn test_hydration_read_failure_aborts() {
    let (store, manager) = mock_manager();
    store.fail_next_get(StoreError::Database("disk error".to_string()));

    let result = manager.hydrate().await;
    assert!(matches!(result, Err(CredentialError::Storage(_))));
}

// =============================================================================
// CRUD Edge Cases
// =============================================================================

#[tokio::test]
async fn test_update_merges_only_provided_fields() {
    let (_store, manager) = sqlite_manager();
    manager.hydrate().await.unwrap();
    let record = manager.add(Provider::Translation, "Original Name").await.unwrap();
    manager
        .update(
            Provider::Translation,
            &record.id,
            CredentialUpdate {
                secret: Some("the-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = manager
        .update(
            Provider::Translation,
            &record.id,
            CredentialUpdate {
                display_name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.secret, "the-secret");
    assert!(updated.enabled);
}

#[tokio::test]
async fn test_remove_unknown_id_is_silent_and_writes_nothing() {
    let (store, manager) = mock_manager();
    manager.hydrate().await.unwrap();
    manager.add(Provider::Translation, "Key A").await.unwrap();
    let writes_before = store.set_count();

    manager.remove(Provider::Translation, "no-such-id").await.unwrap();

    assert_eq!(manager.list(Provider::Translation).await.len(), 1);
    assert_eq!(store.set_count(), writes_before);
}

#[tokio::test]
async fn test_pools_are_isolated_per_provider() {
    let (_store, manager) = sqlite_manager();
    manager.hydrate().await.unwrap();

    let t = manager.add(Provider::Translation, "Translate Key").await.unwrap();
    manager.add(Provider::SpeechSynthesis, "Voice Key").await.unwrap();

    manager.remove(Provider::SpeechSynthesis, &t.id).await.unwrap();

    // Removing a translation id from the speech pool touches neither record
    assert_eq!(manager.list(Provider::Translation).await.len(), 1);
    assert_eq!(manager.list(Provider::SpeechSynthesis).await.len(), 1);
}

#[tokio::test]
async fn test_storage_write_failure_surfaces_to_caller() {
    let (store, manager) = mock_manager();
    manager.hydrate().await.unwrap();
    store.fail_next_set(StoreError::Database("disk full".to_string()));

    let result = manager.add(Provider::Translation, "Key A").await;
    assert!(matches!(result, Err(CredentialError::Storage(_))));
}
