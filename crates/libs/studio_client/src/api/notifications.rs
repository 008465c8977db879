use crate::api::Resource;
use crate::gateway::{ApiRequest, Gateway, GatewayError};
use common_types::UserNotification;

/// The user's in-app notification inbox.
#[derive(Clone)]
pub struct NotificationsApi {
    notifications: Resource<UserNotification>,
}

impl NotificationsApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            notifications: Resource::new(gateway, "notifications"),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserNotification>, GatewayError> {
        self.notifications.list().await
    }

    pub async fn unread(&self) -> Result<Vec<UserNotification>, GatewayError> {
        let all = self.notifications.list().await?;
        Ok(all.into_iter().filter(|n| !n.is_read).collect())
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), GatewayError> {
        let request = ApiRequest::patch(format!("notifications/{id}/read")).quiet();
        let _: serde_json::Value = self.notifications.gateway().send(request).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.notifications.delete(id).await
    }
}
