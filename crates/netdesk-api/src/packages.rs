// Package endpoints
//
// CRUD plus the two read-only analytics views (`stats`, `router-revenue`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    ItemResponse, ListResponse, PackageCreate, PackageResponse, PackageStatsResponse,
    PackageUpdate, RouterRevenueResponse,
};

impl ApiClient {
    /// List packages, optionally restricted to one type (`HOTSPOT` / `PPPOE`).
    ///
    /// `GET /packages?type=`
    pub async fn list_packages(
        &self,
        package_type: Option<&str>,
    ) -> Result<Vec<PackageResponse>, Error> {
        let params: Vec<(&str, String)> = package_type
            .map(|t| vec![("type", t.to_owned())])
            .unwrap_or_default();
        let resp: ListResponse<PackageResponse> =
            self.get(self.url(&["packages"]), &params).await?;
        Ok(resp.into_vec())
    }

    /// `GET /packages/{id}`
    pub async fn get_package(&self, id: &str) -> Result<PackageResponse, Error> {
        let resp: ItemResponse<PackageResponse> =
            self.get(self.url(&["packages", id]), &[]).await?;
        Ok(resp.into_inner())
    }

    /// `POST /packages`
    pub async fn create_package(&self, body: &PackageCreate) -> Result<PackageResponse, Error> {
        debug!(name = %body.name, package_type = %body.package_type, "creating package");
        let resp: ItemResponse<PackageResponse> = self.post(self.url(&["packages"]), body).await?;
        Ok(resp.into_inner())
    }

    /// `PUT /packages/{id}` with a partial body.
    pub async fn update_package(
        &self,
        id: &str,
        body: &PackageUpdate,
    ) -> Result<PackageResponse, Error> {
        debug!(id, "updating package");
        let resp: ItemResponse<PackageResponse> =
            self.put(self.url(&["packages", id]), body).await?;
        Ok(resp.into_inner())
    }

    /// `DELETE /packages/{id}`
    pub async fn delete_package(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting package");
        self.delete(self.url(&["packages", id])).await
    }

    /// `GET /packages/{id}/stats`
    pub async fn get_package_stats(&self, id: &str) -> Result<PackageStatsResponse, Error> {
        let resp: ItemResponse<PackageStatsResponse> =
            self.get(self.url(&["packages", id, "stats"]), &[]).await?;
        Ok(resp.into_inner())
    }

    /// `GET /packages/{id}/router-revenue`
    pub async fn get_router_revenue(&self, id: &str) -> Result<Vec<RouterRevenueResponse>, Error> {
        let resp: ListResponse<RouterRevenueResponse> = self
            .get(self.url(&["packages", id, "router-revenue"]), &[])
            .await?;
        Ok(resp.into_vec())
    }
}
