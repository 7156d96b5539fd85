//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, SubscriptionCache, SubscriptionService};

/// Handles to the services every request may need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub subscription_cache: Arc<SubscriptionCache>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        subscription_service: Arc<SubscriptionService>,
        subscription_cache: Arc<SubscriptionCache>,
    ) -> Self {
        Self {
            auth_service,
            subscription_service,
            subscription_cache,
        }
    }
}
