use client::stores::ItemStore;
use common::item::{CreateItemRequest, ItemListQuery, UpdateItemRequest};
use common::{ItemStatus, Pagination};

use crate::stub::StubServer;

#[tokio::test]
async fn fetch_items_replaces_items_and_pagination() {
    let server = StubServer::spawn().await;
    server.seed_item("Tripod");
    server.seed_item("Canon R6");
    let store = ItemStore::new(server.authed_api());

    let page = store
        .fetch_items(&ItemListQuery {
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();

    let state = store.state();
    assert_eq!(state.items, page.items);
    assert_eq!(state.pagination, Pagination::new(2, 1, 1));
    assert!(!state.loading);
}

#[tokio::test]
async fn failed_fetch_still_lowers_the_loading_flag() {
    let server = StubServer::spawn().await;
    let store = ItemStore::new(server.authed_api());

    let err = store
        .fetch_items(&ItemListQuery {
            search: Some("boom".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    let state = store.state();
    assert!(!state.loading);
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn create_update_delete_reconcile_the_page() {
    let server = StubServer::spawn().await;
    server.seed_item("Tripod");
    let store = ItemStore::new(server.authed_api());
    store.fetch_items(&ItemListQuery::default()).await.unwrap();

    let created = store
        .create_item(&CreateItemRequest {
            name: "Canon R6".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let state = store.state();
    assert_eq!(state.items[0], created);
    assert_eq!(state.pagination.total, 2);

    store.fetch_item(created.id).await.unwrap();
    let updated = store
        .update_item(
            created.id,
            &UpdateItemRequest {
                status: Some(ItemStatus::Sold),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let state = store.state();
    assert_eq!(updated.status, ItemStatus::Sold);
    assert_eq!(state.items[0], updated);
    assert_eq!(state.current_item, Some(updated.clone()));

    store.delete_item(created.id).await.unwrap();
    let state = store.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Tripod");
    assert_eq!(state.pagination.total, 1);
    assert_eq!(state.current_item, None);
}

#[tokio::test]
async fn stats_are_passed_through() {
    let server = StubServer::spawn().await;
    let store = ItemStore::new(server.authed_api());

    let stats = store.get_stats().await.unwrap();

    assert_eq!(stats.stats.len(), 1);
    assert_eq!(stats.stats[0].count, 2);
    assert_eq!(stats.total_additional_costs.to_string(), "12.25");
}

#[tokio::test]
async fn missing_item_clears_nothing_and_reports_not_found() {
    let server = StubServer::spawn().await;
    server.seed_item("Tripod");
    let store = ItemStore::new(server.authed_api());
    store.fetch_items(&ItemListQuery::default()).await.unwrap();

    let err = store.fetch_item(uuid::Uuid::new_v4()).await.unwrap_err();

    assert_eq!(err.code(), Some("NOT_FOUND"));
    let state = store.state();
    assert_eq!(state.items.len(), 1);
    assert!(state.current_item.is_none());
    assert!(!state.loading);
}
