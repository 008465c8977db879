use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: i64,
    pub reservation_id: i64,
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentHashRequest {
    pub reservation_id: i64,
}

/// Everything the hosted checkout needs, signed by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentHash {
    pub order_id: String,
    pub amount: f64,
    /// Empty when the backend leaves the currency to the client's configuration.
    #[serde(default)]
    pub currency: String,
    pub hash: String,
    pub items: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfirmationReport {
    pub order_id: String,
    pub reservation_id: i64,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub customer_name: Option<String>,
    pub package_name: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}
