// ── Controller ──
//
// HTTP-backed implementation of the service traits. Owns one
// `ApiClient` and translates between wire and domain types.

use std::sync::Arc;

use netdesk_api::transport::{TlsMode, TransportConfig};
use netdesk_api::types::{PackageCreate, PackageUpdate};
use netdesk_api::ApiClient;
use tracing::{debug, info};

use crate::config::{AuthCredentials, ConsoleConfig, TlsVerification};
use crate::convert::packages_from_list;
use crate::error::CoreError;
use crate::form::PackagePayload;
use crate::model::{
    EntityId, Package, PackagePatch, PackageStats, PackageType, Router, RouterRevenue,
};
use crate::service::{PackageService, RouterDirectory};

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ConsoleConfig,
    api: ApiClient,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("url", &self.inner.config.url.as_str())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Build the HTTP client. Does not touch the network.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let api = match &config.auth {
            AuthCredentials::BearerToken(token) => {
                ApiClient::from_token(config.url.as_str(), token, &transport)?
            }
            AuthCredentials::None => ApiClient::from_transport(config.url.as_str(), &transport)?,
        };
        debug!(url = %api.base_url(), "controller ready");
        Ok(Self {
            inner: Arc::new(ControllerInner { config, api }),
        })
    }

    /// Wrap an existing client (tests, custom transports).
    pub fn with_client(config: ConsoleConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(ControllerInner { config, api }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}

fn build_transport(config: &ConsoleConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

// ── Service impls ───────────────────────────────────────────────────

impl PackageService for Controller {
    async fn list_packages(&self, filter: Option<PackageType>) -> Result<Vec<Package>, CoreError> {
        let filter = filter.map(|t| t.to_string());
        let raw = self.inner.api.list_packages(filter.as_deref()).await?;
        Ok(packages_from_list(raw))
    }

    async fn get_package(&self, id: &EntityId) -> Result<Package, CoreError> {
        let raw = self
            .inner
            .api
            .get_package(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "Package", id))?;
        Package::try_from(raw)
    }

    async fn create_package(&self, payload: &PackagePayload) -> Result<Package, CoreError> {
        let body = PackageCreate::from(payload);
        let raw = self.inner.api.create_package(&body).await?;
        let created = Package::try_from(raw)?;
        info!(id = %created.id, name = %created.name, "package created");
        Ok(created)
    }

    async fn update_package(
        &self,
        id: &EntityId,
        patch: &PackagePatch,
    ) -> Result<Package, CoreError> {
        let body = PackageUpdate::from(patch);
        let raw = self
            .inner
            .api
            .update_package(&id.to_string(), &body)
            .await
            .map_err(|e| not_found_as(e, "Package", id))?;
        let updated = Package::try_from(raw)?;
        info!(id = %updated.id, "package updated");
        Ok(updated)
    }

    async fn delete_package(&self, id: &EntityId) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_package(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "Package", id))?;
        info!(%id, "package deleted");
        Ok(())
    }

    async fn package_stats(&self, id: &EntityId) -> Result<PackageStats, CoreError> {
        let raw = self
            .inner
            .api
            .get_package_stats(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "Package", id))?;
        Ok(raw.into())
    }

    async fn router_revenue(&self, id: &EntityId) -> Result<Vec<RouterRevenue>, CoreError> {
        let raw = self
            .inner
            .api
            .get_router_revenue(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "Package", id))?;
        Ok(raw.into_iter().map(RouterRevenue::from).collect())
    }
}

impl RouterDirectory for Controller {
    async fn list_routers(&self) -> Result<Vec<Router>, CoreError> {
        let raw = self
            .inner
            .api
            .list_routers(self.inner.config.router_page_size)
            .await?;
        Ok(raw.into_iter().map(Router::from).collect())
    }
}

/// A bare 404 on an id-addressed endpoint names the missing entity.
fn not_found_as(err: netdesk_api::Error, entity_type: &str, id: &EntityId) -> CoreError {
    if err.is_not_found() && err.api_message().is_none() {
        CoreError::NotFound {
            entity_type: entity_type.into(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}
