use common::cost::{CostResponse, CreateCostRequest, UpdateCostRequest};
use tokio::sync::watch;
use uuid::Uuid;

use super::{Loading, replace_by, track};
use crate::api::ApiClient;
use crate::error::Result;

/// Costs of one item, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostState {
    pub item_id: Option<Uuid>,
    pub costs: Vec<CostResponse>,
    pub loading: bool,
}

impl Loading for CostState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

impl CostState {
    /// Insert keeping `date` descending; equal dates keep insertion order.
    fn insert_sorted(&mut self, cost: CostResponse) {
        let at = self
            .costs
            .iter()
            .position(|c| c.date < cost.date)
            .unwrap_or(self.costs.len());
        self.costs.insert(at, cost);
    }
}

pub struct CostStore {
    api: ApiClient,
    state: watch::Sender<CostState>,
}

impl CostStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: watch::Sender::new(CostState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CostState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CostState {
        self.state.borrow().clone()
    }

    pub async fn fetch_costs(&self, item_id: Uuid) -> Result<Vec<CostResponse>> {
        let costs: Vec<CostResponse> =
            track(&self.state, self.api.get(&format!("/costs/item/{item_id}"))).await?;
        self.state.send_modify(|s| {
            s.item_id = Some(item_id);
            s.costs = costs.clone();
        });
        Ok(costs)
    }

    /// The local list only changes if it holds the costs of the same item.
    pub async fn create_cost(&self, payload: &CreateCostRequest) -> Result<CostResponse> {
        let created: CostResponse = self.api.post("/costs", payload).await?;
        self.state.send_modify(|s| {
            if s.item_id == Some(created.item_id) {
                s.insert_sorted(created.clone());
            }
        });
        Ok(created)
    }

    pub async fn update_cost(&self, id: Uuid, payload: &UpdateCostRequest) -> Result<CostResponse> {
        let updated: CostResponse = self.api.put(&format!("/costs/{id}"), payload).await?;
        self.state.send_modify(|s| {
            if replace_by(&mut s.costs, updated.clone(), |c| c.id) {
                // The date may have moved.
                s.costs.sort_by(|a, b| b.date.cmp(&a.date));
            }
        });
        Ok(updated)
    }

    pub async fn delete_cost(&self, id: Uuid) -> Result<()> {
        self.api.delete(&format!("/costs/{id}")).await?;
        self.state.send_modify(|s| s.costs.retain(|c| c.id != id));
        Ok(())
    }
}
