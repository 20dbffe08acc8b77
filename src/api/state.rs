use std::sync::Arc;

use crate::calculate::SortKey;
use crate::storage::LeagueStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LeagueStore>,
    pub default_sort: SortKey,
}

impl AppState {
    pub fn new(store: LeagueStore, default_sort: SortKey) -> Self {
        Self {
            store: Arc::new(store),
            default_sort,
        }
    }
}
