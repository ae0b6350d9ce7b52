use std::sync::Arc;

use clinic_store::ClinicStore;
use mockable::Clock;

use crate::auth::OperatorAuth;

/// Estado compartilhado entre os handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClinicStore>,
    /// Relógio usado para o intervalo de "hoje"
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub auth: Option<Arc<OperatorAuth>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self {
            store,
            clock: Arc::new(mockable::DefaultClock),
            auth: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_auth(mut self, auth: OperatorAuth) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }
}
