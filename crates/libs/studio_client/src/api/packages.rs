use crate::api::{ApiError, Resource};
use crate::gateway::{Gateway, GatewayError};
use crate::validation;
use common_types::{Package, PackageInput};

#[derive(Clone)]
pub struct PackagesApi {
    packages: Resource<Package>,
}

impl PackagesApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            packages: Resource::new(gateway, "packages"),
        }
    }

    pub async fn list(&self) -> Result<Vec<Package>, GatewayError> {
        self.packages.list().await
    }

    /// Packages customers can currently book.
    pub async fn active(&self) -> Result<Vec<Package>, GatewayError> {
        let packages = self.packages.list().await?;
        Ok(packages.into_iter().filter(|p| p.is_active).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Package, GatewayError> {
        self.packages.get(id).await
    }

    pub async fn create(&self, input: &PackageInput) -> Result<Package, ApiError> {
        validation::check(input, self.packages.gateway().notifier().as_ref())?;
        Ok(self.packages.create(input).await?)
    }

    pub async fn update(&self, id: i64, input: &PackageInput) -> Result<Package, ApiError> {
        validation::check(input, self.packages.gateway().notifier().as_ref())?;
        Ok(self.packages.update(id, input).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.packages.delete(id).await
    }
}
