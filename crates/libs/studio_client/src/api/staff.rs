use crate::api::Resource;
use crate::gateway::{Gateway, GatewayError};
use common_types::{Role, RoleInput, StaffRole, StaffRoleInput};

#[derive(Clone)]
pub struct RolesApi {
    roles: Resource<Role>,
}

impl RolesApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            roles: Resource::new(gateway, "roles"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Role>, GatewayError> {
        self.roles.list().await
    }

    pub async fn create(&self, name: &str) -> Result<Role, GatewayError> {
        self.roles
            .create(&RoleInput {
                name: name.to_owned(),
            })
            .await
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Role, GatewayError> {
        self.roles
            .update(
                id,
                &RoleInput {
                    name: name.to_owned(),
                },
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.roles.delete(id).await
    }
}

#[derive(Clone)]
pub struct StaffRolesApi {
    staff_roles: Resource<StaffRole>,
}

impl StaffRolesApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            staff_roles: Resource::new(gateway, "staff-roles"),
        }
    }

    pub async fn list(&self) -> Result<Vec<StaffRole>, GatewayError> {
        self.staff_roles.list().await
    }

    pub async fn for_user(&self, user_id: i64) -> Result<Vec<StaffRole>, GatewayError> {
        self.staff_roles
            .list_where(&[("user_id", user_id.to_string())])
            .await
    }

    pub async fn grant(&self, user_id: i64, role_id: i64) -> Result<StaffRole, GatewayError> {
        self.staff_roles
            .create(&StaffRoleInput { user_id, role_id })
            .await
    }

    pub async fn revoke(&self, id: i64) -> Result<(), GatewayError> {
        self.staff_roles.delete(id).await
    }
}
