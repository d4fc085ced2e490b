//! Reactive caches of server resources.
//!
//! Each store owns a `watch::Sender` holding its state; call `subscribe()` to
//! observe changes. Mutations go to the server first and are reconciled into
//! the local collection only when the request succeeds.

pub mod auth;
pub mod categories;
pub mod costs;
pub mod items;

use std::future::Future;

use tokio::sync::watch;

pub use auth::{AuthState, AuthStore};
pub use categories::{CategoryState, CategoryStore};
pub use costs::{CostState, CostStore};
pub use items::{ItemState, ItemStore};

use crate::error::Result;

/// State with a `loading` flag raised around fetches.
trait Loading {
    fn set_loading(&mut self, loading: bool);
}

/// Run `fut` with the loading flag raised, lowering it again whatever the outcome.
async fn track<S, T, F>(state: &watch::Sender<S>, fut: F) -> Result<T>
where
    S: Loading,
    F: Future<Output = Result<T>>,
{
    state.send_modify(|s| s.set_loading(true));
    let res = fut.await;
    state.send_modify(|s| s.set_loading(false));
    res
}

/// Replace the element with the same key; returns whether one was found.
fn replace_by<T, K: PartialEq>(list: &mut [T], value: T, key: impl Fn(&T) -> K) -> bool {
    let k = key(&value);
    match list.iter_mut().find(|existing| key(existing) == k) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}
