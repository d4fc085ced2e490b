use client::stores::CostStore;
use common::cost::{CreateCostRequest, UpdateCostRequest};
use rust_decimal::Decimal;

use crate::stub::StubServer;

fn descriptions(store: &CostStore) -> Vec<String> {
    store
        .state()
        .costs
        .into_iter()
        .map(|c| c.description)
        .collect()
}

#[tokio::test]
async fn costs_stay_newest_first_through_every_mutation() {
    let server = StubServer::spawn().await;
    let item = server.seed_item("Bike");
    let tune_up = server.seed_cost(item, "Tune-up", "2024-01-10T00:00:00Z");
    server.seed_cost(item, "Tyres", "2024-06-01T00:00:00Z");
    let store = CostStore::new(server.authed_api());

    store.fetch_costs(item).await.unwrap();
    assert_eq!(descriptions(&store), ["Tyres", "Tune-up"]);
    assert_eq!(store.state().item_id, Some(item));

    let chain = store
        .create_cost(&CreateCostRequest {
            item_id: item,
            description: "Chain".into(),
            amount: Decimal::new(1999, 2),
            date: Some("2024-03-15T00:00:00Z".parse().unwrap()),
            cost_type: Some("parts".into()),
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(chain.amount, Decimal::new(1999, 2));
    assert_eq!(descriptions(&store), ["Tyres", "Chain", "Tune-up"]);

    store
        .update_cost(
            tune_up,
            &UpdateCostRequest {
                date: Some("2024-12-01T00:00:00Z".parse().unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(descriptions(&store), ["Tune-up", "Tyres", "Chain"]);

    store.delete_cost(chain.id).await.unwrap();
    assert_eq!(descriptions(&store), ["Tune-up", "Tyres"]);
    assert!(!store.state().loading);
}

#[tokio::test]
async fn costs_for_another_item_do_not_leak_into_the_list() {
    let server = StubServer::spawn().await;
    let bike = server.seed_item("Bike");
    let camera = server.seed_item("Camera");
    let store = CostStore::new(server.authed_api());
    store.fetch_costs(bike).await.unwrap();

    store
        .create_cost(&CreateCostRequest {
            item_id: camera,
            description: "Strap".into(),
            amount: Decimal::new(15, 0),
            date: None,
            cost_type: None,
            notes: None,
        })
        .await
        .unwrap();

    assert!(store.state().costs.is_empty());
}

#[tokio::test]
async fn missing_item_is_reported() {
    let server = StubServer::spawn().await;
    let store = CostStore::new(server.authed_api());

    let err = store
        .create_cost(&CreateCostRequest {
            item_id: uuid::Uuid::new_v4(),
            description: "Ghost".into(),
            amount: Decimal::ONE,
            date: None,
            cost_type: None,
            notes: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("NOT_FOUND"));
}
