//! Wire types for the package and router REST endpoints.
//!
//! All types match the JSON bodies exchanged with the API. Field names use
//! camelCase via `#[serde(rename_all = "camelCase")]`. Identifiers are kept
//! as strings here; the backend emits either numeric or string ids, and
//! both are accepted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── List envelope ────────────────────────────────────────────────────

/// List endpoints answer either with a bare array or with `{"data": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Single-item endpoints may also wrap their payload in `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemResponse<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemResponse<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Bare(item) | Self::Wrapped { data: item } => item,
        }
    }
}

// ── Packages ─────────────────────────────────────────────────────────

/// Package as returned by `GET /packages` and `GET /packages/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    /// `HOTSPOT` or `PPPOE`.
    #[serde(rename = "type")]
    pub package_type: String,
    pub name: String,
    #[serde(deserialize_with = "lenient::decimal")]
    pub price: f64,
    pub download_speed: u32,
    pub upload_speed: u32,
    /// Minutes. Hotspot only.
    #[serde(default)]
    pub session_time: Option<u32>,
    /// Bytes. Hotspot only; absent means unlimited.
    #[serde(default)]
    pub data_limit: Option<u64>,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub router_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub customer_count: u32,
    #[serde(default)]
    pub voucher_count: u32,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn default_true() -> bool {
    true
}

/// Body for `POST /packages`: a package minus `id`, `createdAt`, `isActive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCreate {
    #[serde(rename = "type")]
    pub package_type: String,
    pub name: String,
    pub price: f64,
    pub download_speed: u32,
    pub upload_speed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_time: Option<u32>,
    /// `MINUTES`, `HOURS` or `DAYS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_time_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<u64>,
    /// `MB` or `GB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit_unit: Option<String>,
    #[serde(default)]
    pub router_ids: Vec<String>,
}

/// Body for `PUT /packages/{id}`: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_time_unit: Option<String>,
    /// `Some(None)` is sent as `null` and removes an existing limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `GET /packages/{id}/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageStatsResponse {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub active_clients: u64,
    #[serde(default)]
    pub expired_clients: u64,
    #[serde(default)]
    pub suspended_clients: u64,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub revenue: f64,
}

/// One entry of `GET /packages/{id}/router-revenue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterRevenueResponse {
    #[serde(deserialize_with = "lenient::id")]
    pub router_id: String,
    pub router_name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub revenue: f64,
}

// ── Routers ──────────────────────────────────────────────────────────

/// Router overview from `GET /routers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterResponse {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

// ── Error body ───────────────────────────────────────────────────────

/// Error payload. Servers use either `message` or `error` for the text.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Lenient field decoders ───────────────────────────────────────────

mod lenient {
    use serde::{Deserialize, Deserializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Number(f64),
        Text(String),
    }

    pub(super) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(String::from)
    }

    pub(super) fn id_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let raw: Option<Vec<RawId>> = Option::deserialize(d)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Decimals arrive as JSON numbers or as strings like `"50.00"`.
    pub(super) fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match RawDecimal::deserialize(d)? {
            RawDecimal::Number(n) => Ok(n),
            RawDecimal::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| D::Error::custom(format!("invalid decimal {s:?}: {e}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn package_accepts_numeric_ids_and_string_prices() {
        let raw = json!({
            "id": 42,
            "type": "HOTSPOT",
            "name": "1 Hour",
            "price": "50.00",
            "downloadSpeed": 8,
            "uploadSpeed": 4,
            "sessionTime": 60,
            "routerIds": [1, "r-2"],
            "customerCount": 3,
            "branding": "gold"
        });
        let pkg: PackageResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(pkg.id, "42");
        assert!((pkg.price - 50.0).abs() < f64::EPSILON);
        assert_eq!(pkg.router_ids, vec!["1".to_owned(), "r-2".to_owned()]);
        assert!(pkg.is_active);
        assert_eq!(pkg.data_limit, None);
        assert_eq!(pkg.extra.get("branding"), Some(&json!("gold")));
    }

    #[test]
    fn package_tolerates_null_router_ids() {
        let raw = json!({
            "id": "p1",
            "type": "PPPOE",
            "name": "Home 20",
            "price": 1500,
            "downloadSpeed": 20,
            "uploadSpeed": 10,
            "routerIds": null,
            "isActive": false
        });
        let pkg: PackageResponse = serde_json::from_value(raw).unwrap();
        assert!(pkg.router_ids.is_empty());
        assert!(!pkg.is_active);
    }

    #[test]
    fn list_response_accepts_both_shapes() {
        let bare: ListResponse<RouterResponse> =
            serde_json::from_value(json!([{ "id": 1, "name": "core-1" }])).unwrap();
        let wrapped: ListResponse<RouterResponse> = serde_json::from_value(
            json!({ "data": [{ "id": 1, "name": "core-1", "ipAddress": "10.0.0.1" }] }),
        )
        .unwrap();
        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(
            wrapped.into_vec()[0].ip_address.as_deref(),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn create_body_omits_absent_hotspot_fields() {
        let body = PackageCreate {
            package_type: "PPPOE".into(),
            name: "Home 20".into(),
            price: 1500.0,
            download_speed: 20,
            upload_speed: 10,
            session_time: None,
            session_time_unit: None,
            data_limit: None,
            data_limit_unit: None,
            router_ids: Vec::new(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["type"], "PPPOE");
        assert!(value.get("sessionTime").is_none());
        assert!(value.get("dataLimit").is_none());
    }

    #[test]
    fn update_body_can_clear_data_limit() {
        let body = PackageUpdate {
            data_limit: Some(None),
            ..PackageUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "dataLimit": null })
        );
        assert_eq!(
            serde_json::to_value(PackageUpdate::default()).unwrap(),
            json!({})
        );
    }
}
