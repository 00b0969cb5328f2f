use crate::backend::GameBackend;
use crate::catalog::Catalog;
use crate::gate::AccessGate;
use crate::models::StatsSummary;
use crate::notify::Notices;
use crate::storage::SessionStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Client-side copy of everything the pages render.
#[derive(Debug, Default)]
pub struct Store {
    pub catalog: Catalog,
    pub stats: StatsSummary,
    pub notices: Notices,
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn GameBackend>,
    pub store: Arc<Mutex<Store>>,
    pub gate: Arc<Mutex<AccessGate>>,
}

impl AppState {
    /// Restores the admin flag from `session`; the catalog starts empty
    /// until [`crate::actions::load_catalog`] runs.
    pub async fn new(backend: Arc<dyn GameBackend>, session: Arc<dyn SessionStore>) -> Self {
        let gate = AccessGate::restore(session).await;
        Self {
            backend,
            store: Arc::new(Mutex::new(Store::default())),
            gate: Arc::new(Mutex::new(gate)),
        }
    }

    pub async fn is_admin(&self) -> bool {
        self.gate.lock().await.is_admin()
    }
}
