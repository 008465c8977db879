use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A bookable photography package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_hours: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct PackageInput {
    #[validate(length(min = 1, message = "Package name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    pub duration_hours: Option<u32>,
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: i64,
    pub package_id: i64,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

/// Booking form. Field presence is checked by `Validate`; the date/time
/// range rules live with the reservation client.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateReservation {
    pub package_id: i64,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReservationApproval {
    pub reservation_id: i64,
    pub decision: ApprovalDecision,
    pub note: Option<String>,
}

/// A confirmed session, created once a reservation is approved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub reservation_id: i64,
    pub name: String,
    pub event_date: NaiveDate,
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holiday {
    pub id: i64,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HolidayInput {
    pub date: NaiveDate,
    pub reason: Option<String>,
}

/// Availability of one day in the booking calendar.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub available: bool,
    #[serde(default)]
    pub reservations: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserNotification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_reservations: u64,
    pub pending_approvals: u64,
    pub upcoming_events: u64,
    pub total_revenue: f64,
}
