use crate::gateway::{Gateway, GatewayError};
use common_types::DashboardStats;

#[derive(Clone)]
pub struct DashboardApi {
    gateway: Gateway,
}

impl DashboardApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn stats(&self) -> Result<DashboardStats, GatewayError> {
        self.gateway.get("dashboard/stats").await
    }
}
