use crate::api::{ApiError, Resource};
use crate::gateway::{ApiRequest, Gateway, GatewayError};
use crate::validation;
use chrono::Local;
use common_types::{
    ApprovalDecision, CreateReservation, Reservation, ReservationApproval, ReservationStatus,
};
use serde_json::json;

#[derive(Clone)]
pub struct ReservationsApi {
    reservations: Resource<Reservation>,
}

impl ReservationsApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            reservations: Resource::new(gateway, "reservations"),
        }
    }

    fn gateway(&self) -> &Gateway {
        self.reservations.gateway()
    }

    pub async fn list(&self) -> Result<Vec<Reservation>, GatewayError> {
        self.reservations.list().await
    }

    pub async fn by_status(&self, status: ReservationStatus) -> Result<Vec<Reservation>, GatewayError> {
        let status = serde_json::to_value(status)?;
        let status = status.as_str().unwrap_or_default().to_owned();
        self.reservations.list_where(&[("status", status)]).await
    }

    /// Reservations of the logged-in customer.
    pub async fn mine(&self) -> Result<Vec<Reservation>, GatewayError> {
        self.gateway().get("reservations/me").await
    }

    pub async fn get(&self, id: i64) -> Result<Reservation, GatewayError> {
        self.reservations.get(id).await
    }

    /// Books a session. Date and time rules are checked before anything is sent.
    pub async fn create(&self, reservation: &CreateReservation) -> Result<Reservation, ApiError> {
        let today = Local::now().date_naive();
        validation::check_reservation(reservation, today, self.gateway().notifier().as_ref())?;
        Ok(self.reservations.create(reservation).await?)
    }

    pub async fn cancel(&self, id: i64) -> Result<Reservation, GatewayError> {
        let request = ApiRequest::patch(self.reservations.item_path(id))
            .json(&json!({ "status": ReservationStatus::Cancelled }))?;
        self.gateway().send(request).await
    }

    pub async fn approve(&self, id: i64, note: Option<String>) -> Result<ReservationApproval, GatewayError> {
        self.decide(id, ApprovalDecision::Approved, note).await
    }

    pub async fn reject(&self, id: i64, note: Option<String>) -> Result<ReservationApproval, GatewayError> {
        self.decide(id, ApprovalDecision::Rejected, note).await
    }

    async fn decide(
        &self,
        reservation_id: i64,
        decision: ApprovalDecision,
        note: Option<String>,
    ) -> Result<ReservationApproval, GatewayError> {
        self.gateway()
            .post(
                "reservation-approvals",
                &ReservationApproval {
                    reservation_id,
                    decision,
                    note,
                },
            )
            .await
    }

    /// Reservations waiting for a staff decision.
    pub async fn pending_approvals(&self) -> Result<Vec<Reservation>, GatewayError> {
        self.gateway().get("reservation-approvals/pending").await
    }
}
