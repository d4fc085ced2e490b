use common::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use tokio::sync::watch;
use uuid::Uuid;

use super::{Loading, replace_by, track};
use crate::api::ApiClient;
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryState {
    pub categories: Vec<CategoryResponse>,
    pub loading: bool,
}

impl Loading for CategoryState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

pub struct CategoryStore {
    api: ApiClient,
    state: watch::Sender<CategoryState>,
}

impl CategoryStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: watch::Sender::new(CategoryState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CategoryState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CategoryState {
        self.state.borrow().clone()
    }

    pub async fn fetch_categories(&self) -> Result<Vec<CategoryResponse>> {
        let categories: Vec<CategoryResponse> =
            track(&self.state, self.api.get("/categories")).await?;
        self.state
            .send_modify(|s| s.categories = categories.clone());
        Ok(categories)
    }

    pub async fn create_category(
        &self,
        payload: &CreateCategoryRequest,
    ) -> Result<CategoryResponse> {
        let created: CategoryResponse = self.api.post("/categories", payload).await?;
        self.state
            .send_modify(|s| s.categories.push(created.clone()));
        Ok(created)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &UpdateCategoryRequest,
    ) -> Result<CategoryResponse> {
        let updated: CategoryResponse =
            self.api.put(&format!("/categories/{id}"), payload).await?;
        self.state.send_modify(|s| {
            replace_by(&mut s.categories, updated.clone(), |c| c.id);
        });
        Ok(updated)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        self.api.delete(&format!("/categories/{id}")).await?;
        self.state.send_modify(|s| s.categories.retain(|c| c.id != id));
        Ok(())
    }
}
