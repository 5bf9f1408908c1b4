// ── Service seams ──
//
// The console and form talk to these traits, not to HTTP. `Controller`
// implements them over netdesk-api; tests use in-memory fakes.

use std::future::Future;

use crate::error::CoreError;
use crate::form::PackagePayload;
use crate::model::{
    EntityId, Package, PackagePatch, PackageStats, PackageType, Router, RouterRevenue,
};

/// Package CRUD and analytics.
pub trait PackageService: Send + Sync {
    fn list_packages(
        &self,
        filter: Option<PackageType>,
    ) -> impl Future<Output = Result<Vec<Package>, CoreError>> + Send;

    fn get_package(
        &self,
        id: &EntityId,
    ) -> impl Future<Output = Result<Package, CoreError>> + Send;

    fn create_package(
        &self,
        payload: &PackagePayload,
    ) -> impl Future<Output = Result<Package, CoreError>> + Send;

    fn update_package(
        &self,
        id: &EntityId,
        patch: &PackagePatch,
    ) -> impl Future<Output = Result<Package, CoreError>> + Send;

    fn delete_package(&self, id: &EntityId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn package_stats(
        &self,
        id: &EntityId,
    ) -> impl Future<Output = Result<PackageStats, CoreError>> + Send;

    fn router_revenue(
        &self,
        id: &EntityId,
    ) -> impl Future<Output = Result<Vec<RouterRevenue>, CoreError>> + Send;
}

/// Source of routers offered by the package form.
pub trait RouterDirectory: Send + Sync {
    fn list_routers(&self) -> impl Future<Output = Result<Vec<Router>, CoreError>> + Send;
}
