use crate::gateway::{Gateway, GatewayError};
use common_types::{ConfirmationReport, PaymentHash, PaymentHashRequest, PaymentRecord};

#[derive(Clone)]
pub struct PaymentsApi {
    gateway: Gateway,
}

impl PaymentsApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn history(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        self.gateway.get("payments/history").await
    }

    /// Signed order details for the hosted checkout page.
    pub async fn hash(&self, reservation_id: i64) -> Result<PaymentHash, GatewayError> {
        self.gateway
            .post("payments/hash", &PaymentHashRequest { reservation_id })
            .await
    }

    pub async fn confirmation_report(&self, order_id: &str) -> Result<ConfirmationReport, GatewayError> {
        self.gateway
            .get(&format!("payments/confirmation-report/{order_id}"))
            .await
    }
}
