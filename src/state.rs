use secrecy::Secret;
use std::sync::Arc;

use crate::store::Store;

/// Process-wide dependencies shared by the schema and the HTTP handlers.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_secret: Secret<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt_secret: Secret<String>) -> Self {
        Self { store, jwt_secret }
    }
}
