use std::sync::Arc;

use crate::database::store::MatchStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        AppState { store }
    }
}
