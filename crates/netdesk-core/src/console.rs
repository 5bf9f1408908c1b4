// ── Package console ──
//
// List/detail orchestration. Holds the canonical package snapshot,
// applies the local business guards before destructive calls, owns the
// package form and re-fetches after every successful mutation.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::future::try_join3;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::form::{FormSession, PackageFormController};
use crate::gate::PermissionGate;
use crate::model::{
    EntityId, Package, PackageDetails, PackagePatch, PackageStats, PackageType, RouterRevenue,
};
use crate::permission::{Permission, PermissionSet};
use crate::service::{PackageService, RouterDirectory};
use crate::session::Session;

/// Which view to show after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    List,
    Detail(EntityId),
}

/// The fetched package list and the filter it was fetched with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub filter: Option<PackageType>,
    pub packages: Vec<Package>,
}

/// Actions offered on a package's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PackageAction {
    Edit,
    ToggleStatus,
    Delete,
    ViewStats,
}

impl PackageAction {
    pub fn required_permission(self) -> Permission {
        match self {
            Self::Edit | Self::ToggleStatus => Permission::PackagesEdit,
            Self::Delete => Permission::PackagesDelete,
            Self::ViewStats => Permission::PackagesStats,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::ToggleStatus => "toggle",
            Self::Delete => "delete",
            Self::ViewStats => "stats",
        }
    }
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gate-filtered actions for the detail view.
pub fn actions_for(granted: &PermissionSet) -> Vec<PackageAction> {
    PackageAction::iter()
        .filter_map(|action| {
            PermissionGate::new(action.required_permission()).render_opt(granted, || action)
        })
        .collect()
}

/// Proof that the user was asked before deleting. Only obtainable from
/// [`PackageConsole::request_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: EntityId,
    name: String,
}

impl DeleteConfirmation {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn prompt(&self) -> String {
        format!("Delete package '{}'? This cannot be undone.", self.name)
    }
}

fn users_assigned(count: u32) -> String {
    if count == 1 {
        "1 user is assigned to it".to_owned()
    } else {
        format!("{count} users are assigned to it")
    }
}

// ── Console ─────────────────────────────────────────────────────────

pub struct PackageConsole<B> {
    backend: B,
    session: Session,
    snapshot: ArcSwap<Listing>,
    form: PackageFormController,
}

impl<B> fmt::Debug for PackageConsole<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageConsole")
            .field("packages", &self.snapshot.load().packages.len())
            .field("form", self.form.state())
            .finish_non_exhaustive()
    }
}

impl<B: PackageService + RouterDirectory> PackageConsole<B> {
    pub fn new(backend: B, session: Session) -> Self {
        Self {
            backend,
            session,
            snapshot: ArcSwap::from_pointee(Listing::default()),
            form: PackageFormController::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn permissions(&self) -> Arc<PermissionSet> {
        self.session.permissions()
    }

    /// Refuse with `PermissionDenied` unless the session holds `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), CoreError> {
        if PermissionGate::new(permission).allows(&self.session.permissions()) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied { permission })
        }
    }

    // ── List ────────────────────────────────────────────────────────

    /// Re-fetch the package list and replace the snapshot.
    pub async fn refresh(&self, filter: Option<PackageType>) -> Result<Arc<Listing>, CoreError> {
        self.require(Permission::PackagesView)?;
        let packages = self.backend.list_packages(filter).await?;
        debug!(count = packages.len(), ?filter, "package list refreshed");
        let listing = Arc::new(Listing { filter, packages });
        self.snapshot.store(Arc::clone(&listing));
        Ok(listing)
    }

    /// The current snapshot. Never blocks.
    pub fn packages(&self) -> Arc<Listing> {
        self.snapshot.load_full()
    }

    pub fn find(&self, id: &EntityId) -> Option<Package> {
        self.snapshot
            .load()
            .packages
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Refresh after a successful mutation. The mutation already went
    /// through, so a failed re-fetch is logged rather than returned.
    async fn refresh_after_mutation(&self) {
        let filter = self.snapshot.load().filter;
        if let Err(e) = self.refresh(filter).await {
            warn!(error = %e, "package list refresh failed after mutation");
        }
    }

    // ── Detail ──────────────────────────────────────────────────────

    /// Package plus, when permitted, its stats and per-router revenue,
    /// fetched concurrently.
    pub async fn details(&self, id: &EntityId) -> Result<PackageDetails, CoreError> {
        self.require(Permission::PackagesView)?;
        let with_stats = self.session.permissions().can(Permission::PackagesStats);

        if !with_stats {
            let package = self.backend.get_package(id).await?;
            return Ok(PackageDetails {
                package,
                stats: None,
                router_revenue: None,
            });
        }

        let (package, stats, revenue) = try_join3(
            self.backend.get_package(id),
            self.backend.package_stats(id),
            self.backend.router_revenue(id),
        )
        .await?;
        Ok(PackageDetails {
            package,
            stats: Some(stats),
            router_revenue: Some(revenue),
        })
    }

    /// One package, fresh from the server.
    pub async fn package(&self, id: &EntityId) -> Result<Package, CoreError> {
        self.require(Permission::PackagesView)?;
        self.backend.get_package(id).await
    }

    pub async fn stats(&self, id: &EntityId) -> Result<PackageStats, CoreError> {
        self.require(Permission::PackagesStats)?;
        self.backend.package_stats(id).await
    }

    pub async fn router_revenue(&self, id: &EntityId) -> Result<Vec<RouterRevenue>, CoreError> {
        self.require(Permission::PackagesStats)?;
        self.backend.router_revenue(id).await
    }

    // ── Status ──────────────────────────────────────────────────────

    /// Flip `is_active`. Deactivating a package that still has customers
    /// is refused without contacting the server.
    pub async fn toggle_status(&self, package: &Package) -> Result<Package, CoreError> {
        self.require(Permission::PackagesEdit)?;
        if !package.can_disable() {
            return Err(CoreError::Rejected {
                message: format!(
                    "Cannot deactivate '{}': {}",
                    package.name,
                    users_assigned(package.customer_count)
                ),
            });
        }

        let target = !package.is_active;
        let updated = self
            .backend
            .update_package(&package.id, &PackagePatch::status(target))
            .await?;
        info!(id = %package.id, is_active = target, "package status changed");
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    // ── Delete ──────────────────────────────────────────────────────

    /// First step of deletion: guard, then hand back a confirmation the
    /// caller must present to the user.
    pub fn request_delete(&self, package: &Package) -> Result<DeleteConfirmation, CoreError> {
        self.require(Permission::PackagesDelete)?;
        if !package.can_delete() {
            return Err(CoreError::Rejected {
                message: format!(
                    "Cannot delete '{}': {}",
                    package.name,
                    users_assigned(package.customer_count)
                ),
            });
        }
        Ok(DeleteConfirmation {
            id: package.id.clone(),
            name: package.name.clone(),
        })
    }

    /// Second step: the user said yes.
    pub async fn confirm_delete(
        &self,
        confirmation: DeleteConfirmation,
    ) -> Result<Navigation, CoreError> {
        self.require(Permission::PackagesDelete)?;
        self.backend.delete_package(&confirmation.id).await?;
        info!(id = %confirmation.id, "package deleted");
        self.refresh_after_mutation().await;
        Ok(Navigation::List)
    }

    // ── Form ────────────────────────────────────────────────────────

    pub fn form(&self) -> &PackageFormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PackageFormController {
        &mut self.form
    }

    pub async fn open_create(&mut self, kind: PackageType) -> Result<FormSession, CoreError> {
        self.require(Permission::PackagesCreate)?;
        let session = self.form.open_create(kind);
        self.load_routers(session).await;
        Ok(session)
    }

    pub async fn open_edit(&mut self, package: &Package) -> Result<FormSession, CoreError> {
        self.require(Permission::PackagesEdit)?;
        let session = self.form.open_edit(package);
        self.load_routers(session).await;
        Ok(session)
    }

    /// Fetch routers for the form, never cached. Sessions without
    /// `routers:view` get an empty selection list.
    async fn load_routers(&mut self, session: FormSession) {
        if !self.form.needs_routers() {
            return;
        }
        let result = if self.session.permissions().can(Permission::RoutersView) {
            self.backend.list_routers().await
        } else {
            Ok(Vec::new())
        };
        self.form.apply_routers(session, result);
    }

    /// Submit the open form and refresh the list on success. The grant
    /// for the form's mode is checked again, since the permission set
    /// may have been replaced while the form was open.
    pub async fn submit_form(&mut self) -> Result<Package, CoreError> {
        if let Some(open) = self.form.form() {
            self.require(if open.is_edit() {
                Permission::PackagesEdit
            } else {
                Permission::PackagesCreate
            })?;
        }
        let package = self.form.submit(&self.backend).await?;
        self.refresh_after_mutation().await;
        Ok(package)
    }
}
