use client::stores::CategoryStore;
use common::category::{CreateCategoryRequest, UpdateCategoryRequest};

use crate::stub::StubServer;

fn create(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.into(),
        description: None,
        color: None,
    }
}

#[tokio::test]
async fn create_update_delete_reconcile_the_list() {
    let server = StubServer::spawn().await;
    let store = CategoryStore::new(server.authed_api());

    let cameras = store.create_category(&create("Cameras")).await.unwrap();
    let audio = store.create_category(&create("Audio")).await.unwrap();
    assert_eq!(cameras.color.as_deref(), Some("#3B82F6"));
    assert_eq!(store.state().categories, [cameras.clone(), audio.clone()]);

    let renamed = store
        .update_category(
            cameras.id,
            &UpdateCategoryRequest {
                name: Some("Bodies".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<String> = store.state().categories.into_iter().map(|c| c.name).collect();
    assert_eq!(renamed.name, "Bodies");
    assert_eq!(names, ["Bodies", "Audio"]);

    store.delete_category(audio.id).await.unwrap();
    assert_eq!(store.state().categories, [renamed]);
    assert_eq!(server.category_count(), 1);
}

#[tokio::test]
async fn fetch_replaces_the_list_and_lowers_the_loading_flag() {
    let server = StubServer::spawn().await;
    let writer = CategoryStore::new(server.authed_api());
    writer.create_category(&create("Cameras")).await.unwrap();

    let store = CategoryStore::new(server.authed_api());
    let fetched = store.fetch_categories().await.unwrap();

    let state = store.state();
    assert_eq!(fetched.len(), 1);
    assert_eq!(state.categories, fetched);
    assert!(!state.loading);
}

#[tokio::test]
async fn failed_delete_keeps_the_local_list() {
    let server = StubServer::spawn().await;
    let store = CategoryStore::new(server.authed_api());
    let cameras = store.create_category(&create("Cameras")).await.unwrap();

    let err = store.delete_category(uuid::Uuid::new_v4()).await.unwrap_err();

    assert_eq!(err.code(), Some("NOT_FOUND"));
    assert_eq!(store.state().categories, [cameras]);
}
