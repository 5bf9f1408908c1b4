// ── API-to-domain conversions ──
//
// Wire types use strings for ids, enums and timestamps. These impls
// parse them into the domain model, and turn form payloads back into
// request bodies.

use chrono::{DateTime, Utc};
use netdesk_api::types::{
    PackageCreate, PackageResponse, PackageStatsResponse, PackageUpdate, RouterResponse,
    RouterRevenueResponse,
};
use tracing::warn;

use crate::error::CoreError;
use crate::form::PackagePayload;
use crate::model::{
    EntityId, Package, PackagePatch, PackageStats, PackageType, Router, RouterRevenue,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(value = raw, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

fn id_strings(ids: &[EntityId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

// ── Packages ────────────────────────────────────────────────────────

impl TryFrom<PackageResponse> for Package {
    type Error = CoreError;

    fn try_from(p: PackageResponse) -> Result<Self, Self::Error> {
        let package_type: PackageType = p.package_type.parse().map_err(|_| {
            CoreError::Internal(format!(
                "package {} has unknown type '{}'",
                p.id, p.package_type
            ))
        })?;

        Ok(Package {
            id: EntityId::from(p.id),
            package_type,
            name: p.name,
            price: p.price,
            download_speed: p.download_speed,
            upload_speed: p.upload_speed,
            session_time_minutes: p.session_time,
            data_limit_bytes: p.data_limit,
            router_ids: p.router_ids.into_iter().map(EntityId::from).collect(),
            is_active: p.is_active,
            customer_count: p.customer_count,
            voucher_count: p.voucher_count,
            created_at: parse_datetime(p.created_at.as_deref()),
        })
    }
}

/// Convert a list response, skipping packages of unknown type.
pub(crate) fn packages_from_list(list: Vec<PackageResponse>) -> Vec<Package> {
    list.into_iter()
        .filter_map(|p| match Package::try_from(p) {
            Ok(pkg) => Some(pkg),
            Err(e) => {
                warn!(error = %e, "skipping package");
                None
            }
        })
        .collect()
}

impl From<PackageStatsResponse> for PackageStats {
    fn from(s: PackageStatsResponse) -> Self {
        PackageStats {
            total_clients: s.total_clients,
            active_clients: s.active_clients,
            expired_clients: s.expired_clients,
            suspended_clients: s.suspended_clients,
            revenue: s.revenue,
        }
    }
}

impl From<RouterRevenueResponse> for RouterRevenue {
    fn from(r: RouterRevenueResponse) -> Self {
        RouterRevenue {
            router_id: EntityId::from(r.router_id),
            router_name: r.router_name,
            revenue: r.revenue,
        }
    }
}

// ── Routers ─────────────────────────────────────────────────────────

impl From<RouterResponse> for Router {
    fn from(r: RouterResponse) -> Self {
        Router {
            id: EntityId::from(r.id),
            name: r.name,
            ip_address: r.ip_address.as_deref().and_then(|ip| ip.parse().ok()),
        }
    }
}

// ── Request bodies ──────────────────────────────────────────────────

impl From<&PackagePayload> for PackageCreate {
    fn from(payload: &PackagePayload) -> Self {
        match payload {
            PackagePayload::Hotspot(p) => PackageCreate {
                package_type: PackageType::Hotspot.to_string(),
                name: p.name.clone(),
                price: p.price,
                download_speed: p.download_speed,
                upload_speed: p.upload_speed,
                session_time: Some(p.session_time),
                session_time_unit: Some(p.session_time_unit.to_string()),
                data_limit: p.data_limit,
                data_limit_unit: p.data_limit_unit.map(|u| u.to_string()),
                router_ids: id_strings(&p.router_ids),
            },
            PackagePayload::Pppoe(p) => PackageCreate {
                package_type: PackageType::Pppoe.to_string(),
                name: p.name.clone(),
                price: p.price,
                download_speed: p.download_speed,
                upload_speed: p.upload_speed,
                session_time: None,
                session_time_unit: None,
                data_limit: None,
                data_limit_unit: None,
                router_ids: Vec::new(),
            },
        }
    }
}

impl From<&PackagePatch> for PackageUpdate {
    fn from(patch: &PackagePatch) -> Self {
        let (data_limit, data_limit_unit) = match patch.data_limit {
            Some(Some(limit)) => (Some(Some(limit.value)), Some(limit.unit.to_string())),
            Some(None) => (Some(None), None),
            None => (None, None),
        };
        PackageUpdate {
            name: patch.name.clone(),
            price: patch.price,
            download_speed: patch.download_speed,
            upload_speed: patch.upload_speed,
            session_time: patch.session_time.map(|s| s.value),
            session_time_unit: patch.session_time.map(|s| s.unit.to_string()),
            data_limit,
            data_limit_unit,
            router_ids: patch.router_ids.as_deref().map(id_strings),
            is_active: patch.is_active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{DataLimit, DataLimitUnit, SessionTime, SessionTimeUnit};

    fn response(kind: &str) -> PackageResponse {
        PackageResponse {
            id: "7".into(),
            package_type: kind.into(),
            name: "1 Hour".into(),
            price: 50.0,
            download_speed: 8,
            upload_speed: 4,
            session_time: Some(60),
            data_limit: None,
            router_ids: vec!["2".into()],
            is_active: true,
            customer_count: 0,
            voucher_count: 3,
            created_at: Some("2024-06-15T10:30:00Z".into()),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn package_response_converts() {
        let pkg = Package::try_from(response("HOTSPOT")).unwrap();
        assert_eq!(pkg.id, EntityId::Numeric(7));
        assert_eq!(pkg.package_type, PackageType::Hotspot);
        assert_eq!(pkg.router_ids, vec![EntityId::Numeric(2)]);
        assert_eq!(
            pkg.created_at.unwrap().to_rfc3339(),
            "2024-06-15T10:30:00+00:00"
        );
    }

    #[test]
    fn unknown_type_is_skipped_in_lists() {
        let list = packages_from_list(vec![response("HOTSPOT"), response("DIALUP")]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn bad_router_ip_becomes_none() {
        let router = Router::from(RouterResponse {
            id: "r1".into(),
            name: "core".into(),
            ip_address: Some("not-an-ip".into()),
        });
        assert!(router.ip_address.is_none());
    }

    #[test]
    fn patch_to_update_body() {
        let patch = PackagePatch {
            session_time: Some(SessionTime::new(2, SessionTimeUnit::Days)),
            data_limit: Some(Some(DataLimit::new(5, DataLimitUnit::Gb))),
            router_ids: Some(vec![EntityId::from("3")]),
            ..PackagePatch::default()
        };
        let body = serde_json::to_value(PackageUpdate::from(&patch)).unwrap();
        assert_eq!(
            body,
            json!({
                "sessionTime": 2,
                "sessionTimeUnit": "DAYS",
                "dataLimit": 5,
                "dataLimitUnit": "GB",
                "routerIds": ["3"]
            })
        );
    }

    #[test]
    fn cleared_limit_is_null() {
        let patch = PackagePatch {
            data_limit: Some(None),
            ..PackagePatch::default()
        };
        let body = serde_json::to_value(PackageUpdate::from(&patch)).unwrap();
        assert_eq!(body, json!({ "dataLimit": null }));
    }
}
