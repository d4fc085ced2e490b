use common::Pagination;
use common::item::{
    CreateItemRequest, ItemListQuery, ItemListResponse, ItemResponse, ItemStatsResponse,
    UpdateItemRequest,
};
use tokio::sync::watch;
use uuid::Uuid;

use super::{Loading, replace_by, track};
use crate::api::ApiClient;
use crate::error::Result;

/// Page size the server falls back to when none is requested.
const DEFAULT_LIMIT: u64 = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct ItemState {
    /// The page last fetched by [`ItemStore::fetch_items`].
    pub items: Vec<ItemResponse>,
    /// The item last fetched by [`ItemStore::fetch_item`].
    pub current_item: Option<ItemResponse>,
    pub pagination: Pagination,
    pub loading: bool,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_item: None,
            pagination: Pagination::new(0, 1, DEFAULT_LIMIT),
            loading: false,
        }
    }
}

impl Loading for ItemState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

impl ItemState {
    fn set_total(&mut self, total: u64) {
        let p = &self.pagination;
        self.pagination = Pagination::new(total, p.page, p.limit);
    }
}

pub struct ItemStore {
    api: ApiClient,
    state: watch::Sender<ItemState>,
}

impl ItemStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: watch::Sender::new(ItemState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ItemState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ItemState {
        self.state.borrow().clone()
    }

    /// Fetch one page; replaces both the item list and the pagination.
    pub async fn fetch_items(&self, filters: &ItemListQuery) -> Result<ItemListResponse> {
        let page: ItemListResponse =
            track(&self.state, self.api.get_with_query("/items", filters)).await?;
        self.state.send_modify(|s| {
            s.items = page.items.clone();
            s.pagination = page.pagination.clone();
        });
        Ok(page)
    }

    pub async fn fetch_item(&self, id: Uuid) -> Result<ItemResponse> {
        let item: ItemResponse = track(&self.state, self.api.get(&format!("/items/{id}"))).await?;
        self.state
            .send_modify(|s| s.current_item = Some(item.clone()));
        Ok(item)
    }

    /// New items sort first under the default newest-first order.
    pub async fn create_item(&self, payload: &CreateItemRequest) -> Result<ItemResponse> {
        let created: ItemResponse = self.api.post("/items", payload).await?;
        self.state.send_modify(|s| {
            s.items.insert(0, created.clone());
            let total = s.pagination.total + 1;
            s.set_total(total);
        });
        Ok(created)
    }

    pub async fn update_item(&self, id: Uuid, payload: &UpdateItemRequest) -> Result<ItemResponse> {
        let updated: ItemResponse = self.api.put(&format!("/items/{id}"), payload).await?;
        self.state.send_modify(|s| {
            replace_by(&mut s.items, updated.clone(), |i| i.id);
            if s.current_item.as_ref().is_some_and(|c| c.id == id) {
                s.current_item = Some(updated.clone());
            }
        });
        Ok(updated)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<()> {
        self.api.delete(&format!("/items/{id}")).await?;
        self.state.send_modify(|s| {
            let before = s.items.len();
            s.items.retain(|i| i.id != id);
            if s.items.len() < before {
                let total = s.pagination.total.saturating_sub(1);
                s.set_total(total);
            }
            if s.current_item.as_ref().is_some_and(|c| c.id == id) {
                s.current_item = None;
            }
        });
        Ok(())
    }

    /// Stats are not cached.
    pub async fn get_stats(&self) -> Result<ItemStatsResponse> {
        self.api.get("/items/stats/summary").await
    }
}
