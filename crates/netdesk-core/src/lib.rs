// netdesk-core: Permission gating, the package form state machine, and
// list/detail orchestration between netdesk-api and the CLI.

pub mod config;
pub mod console;
pub mod controller;
pub mod convert;
pub mod error;
pub mod form;
pub mod gate;
pub mod model;
pub mod permission;
pub mod service;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ConsoleConfig, DEFAULT_ROUTER_PAGE_SIZE, TlsVerification};
pub use console::{
    DeleteConfirmation, Listing, Navigation, PackageAction, PackageConsole, actions_for,
};
pub use controller::Controller;
pub use error::{CoreError, GENERIC_FAILURE};
pub use form::{
    Field, FieldIssue, FormSession, FormState, PackageDraft, PackageFormController,
    PackagePayload, RouterOptions, ValidationErrors,
};
pub use gate::{PermissionGate, Render, RequirePermission, with_permission};
pub use permission::{Permission, PermissionRequest, PermissionSet, UnknownPermission};
pub use service::{PackageService, RouterDirectory};
pub use session::Session;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DataLimit, DataLimitUnit, EntityId, Package, PackageDetails, PackagePatch, PackageStats,
    PackageType, Router, RouterRevenue, SessionTime, SessionTimeUnit,
};
