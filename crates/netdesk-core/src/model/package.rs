// ── Package domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::entity_id::EntityId;
use super::units::{DataLimit, SessionTime};

/// Service tier kind. Fixed at creation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PackageType {
    Hotspot,
    Pppoe,
}

impl PackageType {
    /// Human label for tables and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hotspot => "Hotspot",
            Self::Pppoe => "PPPoE",
        }
    }
}

/// A service tier as held by the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: EntityId,
    pub package_type: PackageType,
    pub name: String,
    pub price: f64,
    /// Mbps.
    pub download_speed: u32,
    /// Mbps.
    pub upload_speed: u32,
    /// Hotspot only.
    pub session_time_minutes: Option<u32>,
    /// Hotspot only; `None` is unlimited.
    pub data_limit_bytes: Option<u64>,
    /// Empty means every router of the matching kind.
    pub router_ids: Vec<EntityId>,
    pub is_active: bool,
    pub customer_count: u32,
    pub voucher_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Package {
    /// Active packages with assigned customers cannot be switched off.
    pub fn can_disable(&self) -> bool {
        !self.is_active || self.customer_count == 0
    }

    pub fn can_delete(&self) -> bool {
        self.customer_count == 0
    }

    pub fn is_hotspot(&self) -> bool {
        self.package_type == PackageType::Hotspot
    }
}

/// Client counts and revenue for one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageStats {
    pub total_clients: u64,
    pub active_clients: u64,
    pub expired_clients: u64,
    pub suspended_clients: u64,
    pub revenue: f64,
}

/// Revenue a package earned through one router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterRevenue {
    pub router_id: EntityId,
    pub router_name: String,
    pub revenue: f64,
}

/// Everything the detail view shows for one package. Analytics are
/// `None` when the session may not see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub package: Package,
    pub stats: Option<PackageStats>,
    pub router_revenue: Option<Vec<RouterRevenue>>,
}

/// Partial update of an existing package. `None` leaves a field untouched.
///
/// `data_limit` is doubly optional: `Some(None)` removes an existing limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackagePatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub download_speed: Option<u32>,
    pub upload_speed: Option<u32>,
    pub session_time: Option<SessionTime>,
    pub data_limit: Option<Option<DataLimit>>,
    pub router_ids: Option<Vec<EntityId>>,
    pub is_active: Option<bool>,
}

impl PackagePatch {
    /// Patch that flips only the active flag.
    pub fn status(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn package(is_active: bool, customer_count: u32) -> Package {
        Package {
            id: EntityId::from("1"),
            package_type: PackageType::Pppoe,
            name: "Home 20".into(),
            price: 1500.0,
            download_speed: 20,
            upload_speed: 10,
            session_time_minutes: None,
            data_limit_bytes: None,
            router_ids: Vec::new(),
            is_active,
            customer_count,
            voucher_count: 0,
            created_at: None,
        }
    }

    #[test]
    fn package_type_string_forms() {
        assert_eq!(PackageType::Hotspot.to_string(), "HOTSPOT");
        assert_eq!("pppoe".parse::<PackageType>().unwrap(), PackageType::Pppoe);
        assert_eq!(PackageType::Pppoe.label(), "PPPoE");
    }

    #[test]
    fn guards_follow_customer_count() {
        assert!(!package(true, 5).can_disable());
        assert!(package(false, 5).can_disable());
        assert!(package(true, 0).can_disable());
        assert!(!package(true, 5).can_delete());
        assert!(package(false, 0).can_delete());
    }

    #[test]
    fn status_patch_only_sets_flag() {
        let patch = PackagePatch::status(false);
        assert_eq!(patch.is_active, Some(false));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(PackagePatch::default().is_empty());
    }
}
