use crate::api::Resource;
use crate::gateway::{Gateway, GatewayError};
use common_types::{AssignStaffRequest, Event, EventStaff};

#[derive(Clone)]
pub struct EventsApi {
    events: Resource<Event>,
    staff: Resource<EventStaff>,
}

impl EventsApi {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            events: Resource::new(gateway.clone(), "events"),
            staff: Resource::new(gateway, "event-staff"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Event>, GatewayError> {
        self.events.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Event, GatewayError> {
        self.events.get(id).await
    }

    /// Staff assigned to an event.
    pub async fn staff(&self, event_id: i64) -> Result<Vec<EventStaff>, GatewayError> {
        self.staff
            .list_where(&[("event_id", event_id.to_string())])
            .await
    }

    pub async fn assign_staff(&self, assignment: &AssignStaffRequest) -> Result<EventStaff, GatewayError> {
        self.staff.create(assignment).await
    }

    pub async fn unassign_staff(&self, assignment_id: i64) -> Result<(), GatewayError> {
        self.staff.delete(assignment_id).await
    }
}
