use crate::gateway::{ApiRequest, Gateway, GatewayError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Plain REST collection at `path`: list, fetch, create, update, delete.
pub struct Resource<T> {
    gateway: Gateway,
    path: &'static str,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            path: self.path,
            _item: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Resource<T> {
    #[must_use]
    pub const fn new(gateway: Gateway, path: &'static str) -> Self {
        Self {
            gateway,
            path,
            _item: PhantomData,
        }
    }

    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{id}", self.path)
    }

    pub async fn list(&self) -> Result<Vec<T>, GatewayError> {
        self.gateway.get(self.path).await
    }

    /// Lists with filters, e.g. `[("event_id", "4")]`.
    pub async fn list_where(&self, filters: &[(&str, String)]) -> Result<Vec<T>, GatewayError> {
        let request = filters
            .iter()
            .fold(ApiRequest::get(self.path), |request, (key, value)| {
                request.query(*key, value)
            });
        self.gateway.send(request).await
    }

    pub async fn get(&self, id: i64) -> Result<T, GatewayError> {
        self.gateway.get(&self.item_path(id)).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, GatewayError> {
        self.gateway.post(self.path, body).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<T, GatewayError> {
        self.gateway.put(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.gateway.delete(&self.item_path(id)).await?;
        Ok(())
    }
}
