// ── Domain model ──
//
// Canonical representations of packages and routers. Wire types from
// netdesk-api are converted into these in `crate::convert`.

pub mod entity_id;
pub mod package;
pub mod router;
pub mod units;

// ── Re-exports ──────────────────────────────────────────────────────

pub use entity_id::EntityId;
pub use package::{
    Package, PackageDetails, PackagePatch, PackageStats, PackageType, RouterRevenue,
};
pub use router::Router;
pub use units::{DataLimit, DataLimitUnit, SessionTime, SessionTimeUnit};
