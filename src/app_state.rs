use crate::{
    config::Config,
    services::{CheckoutService, HttpPaymentApi, PendingPaymentReconciler},
    store::FilePaymentStore,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<PendingPaymentReconciler>,
    pub checkout_service: Arc<CheckoutService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(FilePaymentStore::new(&config.storage.path));
        let api = Arc::new(HttpPaymentApi::new(&config.api));

        // Initialize services
        let reconciler = Arc::new(PendingPaymentReconciler::new(
            store,
            api.clone(),
            &config.reconcile,
        ));
        let checkout_service = Arc::new(CheckoutService::new(api, reconciler.clone()));

        Self {
            reconciler,
            checkout_service,
            config: Arc::new(config),
        }
    }
}
