use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoleInput {
    pub name: String,
}

/// A role a staff member can fill, e.g. "photographer" or "editor".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaffRole {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StaffRoleInput {
    pub user_id: i64,
    pub role_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventStaff {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub role_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssignStaffRequest {
    pub event_id: i64,
    pub user_id: i64,
    pub role_id: Option<i64>,
}
