//! History persistence tests
//!
//! Tests for the dual write and read-back path including:
//! - Remote plus local write on every save
//! - FIFO eviction of the local rolling window
//! - Automatic cache invalidation after writes
//! - Local fallback and reconciliation of unsynced entries
//! - Deletion across both replicas

mod common;

use common::*;
use pretty_assertions::assert_eq;
use shared::{CalculatorType, HistoryId, SyncStatus};

use farm_calc_client::services::{
    ListingSource, LocalStore, LocalWrite, RemoteDelete, RemoteWrite, SaveStatus,
};

fn local_rows(app: &TestApp, calculator_type: CalculatorType) -> Vec<serde_json::Value> {
    match app.store.read(&calculator_type.storage_key()).unwrap() {
        Some(raw) => serde_json::from_str(&raw).unwrap(),
        None => Vec::new(),
    }
}

// ============================================================================
// Saving
// ============================================================================

/// A successful save lands in both replicas and links them by remote id
#[tokio::test]
async fn test_dual_write_saves_remotely_and_locally() {
    let (app, mock) = online_app().await;

    let outcome = app.ctx.calculator.calculate_and_save(wheat_fertilizer()).await.unwrap();

    assert_eq!(outcome.save.status(), SaveStatus::Saved);
    assert_eq!(outcome.save.remote, RemoteWrite::Saved { id: "1".to_string() });
    assert!(matches!(outcome.save.local, LocalWrite::Appended { evicted: 0, .. }));
    assert_eq!(mock.row_count("fertilizer"), 1);

    let rows = local_rows(&app, CalculatorType::Fertilizer);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["remote_id"], "1");
    assert_eq!(rows[0]["calculator_type"], "fertilizer");
}

/// Without a token the remote is never contacted and the save is local-only
#[tokio::test]
async fn test_missing_token_skips_remote() {
    let (base_url, mock) = spawn_mock().await;
    let app = build_app(&base_url, None);

    let outcome = app.ctx.calculator.calculate_and_save(wheat_profit()).await.unwrap();

    assert_eq!(outcome.save.status(), SaveStatus::LocalOnly);
    assert!(matches!(
        &outcome.save.remote,
        RemoteWrite::Failed { code, .. } if code == "MISSING_CREDENTIALS"
    ));
    assert!(mock.requests().is_empty());
    assert_eq!(local_rows(&app, CalculatorType::Profit).len(), 1);
}

/// The local window never exceeds ten entries and drops the oldest first
#[tokio::test]
async fn test_local_window_evicts_oldest() {
    let app = offline_app();

    let mut evicted = 0;
    for acres in 1..=12 {
        let outcome = app
            .ctx
            .calculator
            .calculate_and_save(profit_with_area(acres))
            .await
            .unwrap();
        if let LocalWrite::Appended { evicted: n, .. } = outcome.save.local {
            evicted += n;
        }
    }
    assert_eq!(evicted, 2);

    let rows = local_rows(&app, CalculatorType::Profit);
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["input_data"]["area"]["value"], "3");
    assert_eq!(rows[9]["input_data"]["area"]["value"], "12");

    let listing = app.ctx.history().list(CalculatorType::Profit).await;
    assert_eq!(listing.source, ListingSource::LocalFallback);
    assert_eq!(listing.entries.len(), 10);
    assert!(listing.entries.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

// ============================================================================
// Listing
// ============================================================================

/// A save is visible to the next list without an explicit refresh
#[tokio::test]
async fn test_list_reflects_save_automatically() {
    let (app, mock) = online_app().await;
    let history = app.ctx.history();

    assert!(history.list(CalculatorType::Pesticide).await.entries.is_empty());
    assert_eq!(
        history.list(CalculatorType::Pesticide).await.source,
        ListingSource::Cache
    );
    assert_eq!(mock.requests(), vec!["GET pesticide".to_string()]);

    app.ctx.calculator.calculate_and_save(rice_aphids()).await.unwrap();

    let listing = history.list(CalculatorType::Pesticide).await;
    assert_eq!(listing.source, ListingSource::Remote);
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].id, HistoryId::Remote("1".to_string()));
    assert_eq!(listing.entries[0].sync, SyncStatus::Synced);
}

/// Reads degrade silently to the local window when the remote errors
#[tokio::test]
async fn test_list_falls_back_to_local_history() {
    let (app, mock) = online_app().await;
    app.ctx.calculator.calculate_and_save(wheat_profit()).await.unwrap();

    mock.with(|m| m.failing_lists = 2);
    let listing = app.ctx.history().list(CalculatorType::Profit).await;

    assert_eq!(listing.source, ListingSource::LocalFallback);
    assert_eq!(listing.entries.len(), 1);
    // The local copy reached the remote, so it keeps the remote identity.
    assert_eq!(listing.entries[0].id, HistoryId::Remote("1".to_string()));
    assert_eq!(listing.entries[0].sync, SyncStatus::Synced);
}

/// Entries saved while offline show up as unsynced next to remote ones
#[tokio::test]
async fn test_unsynced_entries_merge_with_remote() {
    let (app, mock) = online_app().await;

    mock.with(|m| m.fail_saves = true);
    let offline = app.ctx.calculator.calculate_and_save(profit_with_area(3)).await.unwrap();
    assert_eq!(offline.save.status(), SaveStatus::LocalOnly);

    mock.with(|m| m.fail_saves = false);
    app.ctx.calculator.calculate_and_save(profit_with_area(4)).await.unwrap();

    let listing = app.ctx.history().list(CalculatorType::Profit).await;
    assert_eq!(listing.source, ListingSource::Remote);
    assert_eq!(listing.entries.len(), 2);

    let synced: Vec<_> = listing.entries.iter().filter(|e| e.sync == SyncStatus::Synced).collect();
    let unsynced: Vec<_> = listing.entries.iter().filter(|e| e.sync == SyncStatus::Unsynced).collect();
    assert_eq!(synced.len(), 1);
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].record, offline.record);
    assert!(matches!(unsynced[0].id, HistoryId::Local(_)));
}

// ============================================================================
// Deleting
// ============================================================================

/// Deleting a remote entry removes it remotely and its local copy by content
#[tokio::test]
async fn test_delete_remote_entry() {
    let (app, mock) = online_app().await;
    app.ctx.calculator.calculate_and_save(wheat_fertilizer()).await.unwrap();
    let listing = app.ctx.history().list(CalculatorType::Fertilizer).await;
    let id = listing.entries[0].id.clone();

    let outcome = app.ctx.history().delete(CalculatorType::Fertilizer, &id).await;

    assert_eq!(outcome.remote, RemoteDelete::Deleted);
    assert_eq!(outcome.local_removed, Ok(1));
    assert_eq!(mock.row_count("fertilizer"), 0);
    assert!(local_rows(&app, CalculatorType::Fertilizer).is_empty());
    assert!(app.ctx.history().list(CalculatorType::Fertilizer).await.entries.is_empty());
}

/// Local-only entries never cause a remote call and still invalidate
#[tokio::test]
async fn test_delete_local_entry() {
    let (app, mock) = online_app().await;
    mock.with(|m| m.fail_saves = true);
    app.ctx.calculator.calculate_and_save(wheat_profit()).await.unwrap();

    let listing = app.ctx.history().list(CalculatorType::Profit).await;
    let id = listing.entries[0].id.clone();
    assert!(!id.is_remote());

    let outcome = app.ctx.history().delete(CalculatorType::Profit, &id).await;
    assert_eq!(outcome.remote, RemoteDelete::NotApplicable);
    assert_eq!(outcome.local_removed, Ok(1));
    assert!(!mock.requests().iter().any(|r| r.starts_with("DELETE")));

    let after = app.ctx.history().list(CalculatorType::Profit).await;
    assert_eq!(after.source, ListingSource::Remote);
    assert!(after.entries.is_empty());
}

/// Deleting one of two identical offline entries keeps the other
#[tokio::test]
async fn test_delete_keeps_identical_twin() {
    let app = offline_app();
    app.ctx.calculator.calculate_and_save(wheat_profit()).await.unwrap();
    app.ctx.calculator.calculate_and_save(wheat_profit()).await.unwrap();

    let listing = app.ctx.history().list(CalculatorType::Profit).await;
    assert_eq!(listing.entries.len(), 2);

    let outcome = app
        .ctx
        .history()
        .delete(CalculatorType::Profit, &listing.entries[0].id)
        .await;
    assert_eq!(outcome.remote, RemoteDelete::NotApplicable);
    assert_eq!(outcome.local_removed, Ok(1));
    assert_eq!(local_rows(&app, CalculatorType::Profit).len(), 1);

    let after = app.ctx.history().list(CalculatorType::Profit).await;
    assert_eq!(after.entries.len(), 1);
    assert_eq!(after.entries[0].id, listing.entries[1].id);
}

/// A failed remote delete still removes the local copy
#[tokio::test]
async fn test_delete_with_remote_down() {
    let app = offline_app();
    let outcome = app
        .ctx
        .history()
        .delete(CalculatorType::Profit, &HistoryId::Remote("77".to_string()))
        .await;

    assert!(matches!(outcome.remote, RemoteDelete::Failed { .. }));
    assert_eq!(outcome.local_removed, Ok(0));
}
