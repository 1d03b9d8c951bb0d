//! Shared state for the API layer.

use std::sync::Arc;

use crate::db::PatientStore;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<PatientStore>,
}

impl ApiContext {
    pub fn new(store: PatientStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
