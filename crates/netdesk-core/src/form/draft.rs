// ── Drafts and payloads ──
//
// A draft holds raw text exactly as typed. Validation turns it into a
// typed payload in one pass and reports every bad field together.

use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;
use strum::{Display, EnumIter};

use crate::error::CoreError;
use crate::model::{
    DataLimit, DataLimitUnit, EntityId, Package, PackageType, SessionTime, SessionTimeUnit,
};

// ── Fields ──────────────────────────────────────────────────────────

/// Text inputs of the package form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Name,
    Price,
    DownloadSpeed,
    UploadSpeed,
    SessionTime,
    DataLimit,
}

impl Field {
    pub fn is_hotspot_only(self) -> bool {
        matches!(self, Self::SessionTime | Self::DataLimit)
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    Required,
    NotANumber,
    NotAnInteger,
    Negative,
    NotPositive,
    TooLarge,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "is required",
            Self::NotANumber => "must be a number",
            Self::NotAnInteger => "must be a whole number",
            Self::Negative => "must not be negative",
            Self::NotPositive => "must be greater than zero",
            Self::TooLarge => "is too large",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.issue)
    }
}

/// Every field error found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn issue_for(&self, field: Field) -> Option<FieldIssue> {
        self.0.iter().find(|e| e.field == field).map(|e| e.issue)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects field errors while parsing.
#[derive(Default)]
struct Checker(Vec<FieldError>);

impl Checker {
    fn check<T>(&mut self, field: Field, result: Result<T, FieldIssue>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(issue) => {
                self.0.push(FieldError { field, issue });
                None
            }
        }
    }

    fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.0)
    }
}

fn required(raw: &str) -> Result<&str, FieldIssue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldIssue::Required)
    } else {
        Ok(trimmed)
    }
}

fn parse_name(raw: &str) -> Result<String, FieldIssue> {
    required(raw).map(str::to_owned)
}

fn parse_price(raw: &str) -> Result<f64, FieldIssue> {
    let value: f64 = required(raw)?
        .parse()
        .map_err(|_| FieldIssue::NotANumber)?;
    if !value.is_finite() {
        return Err(FieldIssue::NotANumber);
    }
    if value < 0.0 {
        return Err(FieldIssue::Negative);
    }
    Ok(value)
}

/// Whole numbers only. A leading minus is reported as negative rather
/// than as a parse failure.
fn parse_count<T: std::str::FromStr>(raw: &str) -> Result<T, FieldIssue> {
    let trimmed = required(raw)?;
    if let Some(rest) = trimmed.strip_prefix('-') {
        return if rest.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty() {
            Err(FieldIssue::Negative)
        } else {
            Err(FieldIssue::NotAnInteger)
        };
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldIssue::NotAnInteger);
    }
    trimmed.parse().map_err(|_| FieldIssue::TooLarge)
}

fn parse_positive(raw: &str) -> Result<u32, FieldIssue> {
    match parse_count::<u32>(raw)? {
        0 => Err(FieldIssue::NotPositive),
        n => Ok(n),
    }
}

// ── Drafts ──────────────────────────────────────────────────────────

/// Raw Hotspot form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotspotDraft {
    pub name: String,
    pub price: String,
    pub download_speed: String,
    pub upload_speed: String,
    pub session_time: String,
    pub session_time_unit: SessionTimeUnit,
    /// The data-limit input only exists once this is switched on.
    pub data_limit_enabled: bool,
    pub data_limit: String,
    pub data_limit_unit: DataLimitUnit,
    pub router_ids: IndexSet<EntityId>,
}

/// Raw PPPoE form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PppoeDraft {
    pub name: String,
    pub price: String,
    pub download_speed: String,
    pub upload_speed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageDraft {
    Hotspot(HotspotDraft),
    Pppoe(PppoeDraft),
}

impl PackageDraft {
    /// Blank draft with default units.
    pub fn empty(kind: PackageType) -> Self {
        match kind {
            PackageType::Hotspot => Self::Hotspot(HotspotDraft::default()),
            PackageType::Pppoe => Self::Pppoe(PppoeDraft::default()),
        }
    }

    /// Pre-fill from a stored package. Stored minutes and bytes are
    /// expressed in the largest unit that divides them exactly.
    pub fn from_package(package: &Package) -> Self {
        let name = package.name.clone();
        let price = package.price.to_string();
        let download_speed = package.download_speed.to_string();
        let upload_speed = package.upload_speed.to_string();

        match package.package_type {
            PackageType::Pppoe => Self::Pppoe(PppoeDraft {
                name,
                price,
                download_speed,
                upload_speed,
            }),
            PackageType::Hotspot => {
                let session = package.session_time_minutes.map(SessionTime::from_minutes);
                let limit = package.data_limit_bytes.map(DataLimit::from_bytes);
                Self::Hotspot(HotspotDraft {
                    name,
                    price,
                    download_speed,
                    upload_speed,
                    session_time: session.map(|s| s.value.to_string()).unwrap_or_default(),
                    session_time_unit: session.map(|s| s.unit).unwrap_or_default(),
                    data_limit_enabled: limit.is_some(),
                    data_limit: limit.map(|l| l.value.to_string()).unwrap_or_default(),
                    data_limit_unit: limit.map(|l| l.unit).unwrap_or_default(),
                    router_ids: package.router_ids.iter().cloned().collect(),
                })
            }
        }
    }

    pub fn package_type(&self) -> PackageType {
        match self {
            Self::Hotspot(_) => PackageType::Hotspot,
            Self::Pppoe(_) => PackageType::Pppoe,
        }
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match (self, field) {
            (Self::Hotspot(d), Field::Name) => &d.name,
            (Self::Hotspot(d), Field::Price) => &d.price,
            (Self::Hotspot(d), Field::DownloadSpeed) => &d.download_speed,
            (Self::Hotspot(d), Field::UploadSpeed) => &d.upload_speed,
            (Self::Hotspot(d), Field::SessionTime) => &d.session_time,
            (Self::Hotspot(d), Field::DataLimit) => &d.data_limit,
            (Self::Pppoe(d), Field::Name) => &d.name,
            (Self::Pppoe(d), Field::Price) => &d.price,
            (Self::Pppoe(d), Field::DownloadSpeed) => &d.download_speed,
            (Self::Pppoe(d), Field::UploadSpeed) => &d.upload_speed,
            (Self::Pppoe(_), Field::SessionTime | Field::DataLimit) => return None,
        };
        Some(value)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), CoreError> {
        let slot = match (self, field) {
            (Self::Hotspot(d), Field::Name) => &mut d.name,
            (Self::Hotspot(d), Field::Price) => &mut d.price,
            (Self::Hotspot(d), Field::DownloadSpeed) => &mut d.download_speed,
            (Self::Hotspot(d), Field::UploadSpeed) => &mut d.upload_speed,
            (Self::Hotspot(d), Field::SessionTime) => &mut d.session_time,
            (Self::Hotspot(d), Field::DataLimit) => &mut d.data_limit,
            (Self::Pppoe(d), Field::Name) => &mut d.name,
            (Self::Pppoe(d), Field::Price) => &mut d.price,
            (Self::Pppoe(d), Field::DownloadSpeed) => &mut d.download_speed,
            (Self::Pppoe(d), Field::UploadSpeed) => &mut d.upload_speed,
            (Self::Pppoe(_), Field::SessionTime | Field::DataLimit) => {
                return Err(CoreError::InvalidState {
                    message: format!("{field} only applies to Hotspot packages"),
                });
            }
        };
        *slot = value.into();
        Ok(())
    }

    pub fn hotspot_mut(&mut self) -> Result<&mut HotspotDraft, CoreError> {
        match self {
            Self::Hotspot(d) => Ok(d),
            Self::Pppoe(_) => Err(CoreError::InvalidState {
                message: "option only applies to Hotspot packages".into(),
            }),
        }
    }

    /// Validate every field and build the submission payload.
    pub fn validate(&self) -> Result<PackagePayload, ValidationErrors> {
        match self {
            Self::Hotspot(d) => d.validate().map(PackagePayload::Hotspot),
            Self::Pppoe(d) => d.validate().map(PackagePayload::Pppoe),
        }
    }
}

impl HotspotDraft {
    fn validate(&self) -> Result<HotspotPayload, ValidationErrors> {
        let mut c = Checker::default();
        let name = c.check(Field::Name, parse_name(&self.name));
        let price = c.check(Field::Price, parse_price(&self.price));
        let download = c.check(Field::DownloadSpeed, parse_positive(&self.download_speed));
        let upload = c.check(Field::UploadSpeed, parse_positive(&self.upload_speed));
        let session = c.check(
            Field::SessionTime,
            parse_positive(&self.session_time).and_then(|v| {
                let st = SessionTime::new(v, self.session_time_unit);
                st.minutes().map(|_| st).ok_or(FieldIssue::TooLarge)
            }),
        );

        // Toggled on but left blank means "no limit".
        let limit = if self.data_limit_enabled && !self.data_limit.trim().is_empty() {
            c.check(
                Field::DataLimit,
                parse_count::<u64>(&self.data_limit).and_then(|v| {
                    let dl = DataLimit::new(v, self.data_limit_unit);
                    dl.bytes().map(|_| dl).ok_or(FieldIssue::TooLarge)
                }),
            )
            .map(Some)
        } else {
            Some(None)
        };

        match (name, price, download, upload, session, limit) {
            (
                Some(name),
                Some(price),
                Some(download_speed),
                Some(upload_speed),
                Some(session),
                Some(limit),
            ) => Ok(HotspotPayload {
                name,
                price,
                download_speed,
                upload_speed,
                session_time: session.value,
                session_time_unit: session.unit,
                data_limit: limit.map(|l| l.value),
                data_limit_unit: limit.map(|l| l.unit),
                router_ids: self.router_ids.iter().cloned().collect(),
            }),
            _ => Err(c.into_errors()),
        }
    }
}

impl PppoeDraft {
    fn validate(&self) -> Result<PppoePayload, ValidationErrors> {
        let mut c = Checker::default();
        let name = c.check(Field::Name, parse_name(&self.name));
        let price = c.check(Field::Price, parse_price(&self.price));
        let download = c.check(Field::DownloadSpeed, parse_positive(&self.download_speed));
        let upload = c.check(Field::UploadSpeed, parse_positive(&self.upload_speed));

        match (name, price, download, upload) {
            (Some(name), Some(price), Some(download_speed), Some(upload_speed)) => {
                Ok(PppoePayload {
                    name,
                    price,
                    download_speed,
                    upload_speed,
                })
            }
            _ => Err(c.into_errors()),
        }
    }
}

// ── Payloads ────────────────────────────────────────────────────────

/// Normalized, typed result of a valid draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PackagePayload {
    Hotspot(HotspotPayload),
    Pppoe(PppoePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotPayload {
    pub name: String,
    pub price: f64,
    pub download_speed: u32,
    pub upload_speed: u32,
    pub session_time: u32,
    pub session_time_unit: SessionTimeUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit_unit: Option<DataLimitUnit>,
    pub router_ids: Vec<EntityId>,
}

impl HotspotPayload {
    pub fn session(&self) -> SessionTime {
        SessionTime::new(self.session_time, self.session_time_unit)
    }

    pub fn limit(&self) -> Option<DataLimit> {
        self.data_limit
            .map(|v| DataLimit::new(v, self.data_limit_unit.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PppoePayload {
    pub name: String,
    pub price: f64,
    pub download_speed: u32,
    pub upload_speed: u32,
}

impl PackagePayload {
    pub fn package_type(&self) -> PackageType {
        match self {
            Self::Hotspot(_) => PackageType::Hotspot,
            Self::Pppoe(_) => PackageType::Pppoe,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Hotspot(p) => &p.name,
            Self::Pppoe(p) => &p.name,
        }
    }

    /// Session time in minutes, as the server will store it.
    pub fn session_minutes(&self) -> Option<u32> {
        match self {
            Self::Hotspot(p) => p.session().minutes(),
            Self::Pppoe(_) => None,
        }
    }

    /// Data limit in bytes, as the server will store it.
    pub fn data_limit_bytes(&self) -> Option<u64> {
        match self {
            Self::Hotspot(p) => p.limit().and_then(DataLimit::bytes),
            Self::Pppoe(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn filled_hotspot() -> HotspotDraft {
        HotspotDraft {
            name: "1 Hour".into(),
            price: "50".into(),
            download_speed: "8".into(),
            upload_speed: "4".into(),
            session_time: "1".into(),
            ..HotspotDraft::default()
        }
    }

    #[test]
    fn fresh_hotspot_defaults() {
        let PackageDraft::Hotspot(d) = PackageDraft::empty(PackageType::Hotspot) else {
            panic!("expected hotspot draft");
        };
        assert_eq!(d.session_time_unit, SessionTimeUnit::Hours);
        assert_eq!(d.data_limit_unit, DataLimitUnit::Mb);
        assert!(!d.data_limit_enabled);
        assert!(d.router_ids.is_empty());
    }

    #[test]
    fn empty_hotspot_reports_every_required_field() {
        let errors = PackageDraft::empty(PackageType::Hotspot)
            .validate()
            .unwrap_err();
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                Field::Name,
                Field::Price,
                Field::DownloadSpeed,
                Field::UploadSpeed,
                Field::SessionTime,
            ]
        );
        assert!(
            errors
                .errors()
                .iter()
                .all(|e| e.issue == FieldIssue::Required)
        );
    }

    #[test]
    fn hotspot_payload_shape() {
        let payload = PackageDraft::Hotspot(filled_hotspot()).validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["type"], json!("HOTSPOT"));
        assert_eq!(value["name"], json!("1 Hour"));
        assert_eq!(value["price"].as_f64(), Some(50.0));
        assert_eq!(value["downloadSpeed"], json!(8));
        assert_eq!(value["uploadSpeed"], json!(4));
        assert_eq!(value["sessionTime"], json!(1));
        assert_eq!(value["sessionTimeUnit"], json!("HOURS"));
        assert!(value.get("dataLimit").is_none());
        assert!(value.get("dataLimitUnit").is_none());
        assert_eq!(payload.session_minutes(), Some(60));
    }

    #[test]
    fn data_limit_requires_toggle() {
        let mut draft = filled_hotspot();
        draft.data_limit = "500".into();
        let payload = PackageDraft::Hotspot(draft.clone()).validate().unwrap();
        assert_eq!(payload.data_limit_bytes(), None);

        draft.data_limit_enabled = true;
        draft.data_limit_unit = DataLimitUnit::Gb;
        draft.data_limit = "2".into();
        let payload = PackageDraft::Hotspot(draft).validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["dataLimit"], json!(2));
        assert_eq!(value["dataLimitUnit"], json!("GB"));
        assert_eq!(payload.data_limit_bytes(), Some(2 * 1024 * 1024 * 1024));
    }

    #[test]
    fn shape_rules() {
        let draft = HotspotDraft {
            name: "   ".into(),
            price: "-1".into(),
            download_speed: "0".into(),
            upload_speed: "fast".into(),
            session_time: "1.5".into(),
            data_limit_enabled: true,
            data_limit: "-3".into(),
            ..HotspotDraft::default()
        };
        let errors = PackageDraft::Hotspot(draft).validate().unwrap_err();
        assert_eq!(errors.issue_for(Field::Name), Some(FieldIssue::Required));
        assert_eq!(errors.issue_for(Field::Price), Some(FieldIssue::Negative));
        assert_eq!(
            errors.issue_for(Field::DownloadSpeed),
            Some(FieldIssue::NotPositive)
        );
        assert_eq!(
            errors.issue_for(Field::UploadSpeed),
            Some(FieldIssue::NotAnInteger)
        );
        assert_eq!(
            errors.issue_for(Field::SessionTime),
            Some(FieldIssue::NotAnInteger)
        );
        assert_eq!(errors.issue_for(Field::DataLimit), Some(FieldIssue::Negative));
    }

    #[test]
    fn price_must_be_finite() {
        let draft = PppoeDraft {
            name: "Home".into(),
            price: "NaN".into(),
            download_speed: "20".into(),
            upload_speed: "10".into(),
        };
        let errors = PackageDraft::Pppoe(draft).validate().unwrap_err();
        assert_eq!(errors.issue_for(Field::Price), Some(FieldIssue::NotANumber));
    }

    #[test]
    fn pppoe_payload_has_no_hotspot_fields() {
        let draft = PppoeDraft {
            name: " Home 20 ".into(),
            price: "1500.50".into(),
            download_speed: "20".into(),
            upload_speed: "10".into(),
        };
        let payload = PackageDraft::Pppoe(draft).validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], json!("PPPOE"));
        assert_eq!(value["name"], json!("Home 20"));
        assert!(value.get("sessionTime").is_none());
        assert!(value.get("routerIds").is_none());
    }

    #[test]
    fn pppoe_rejects_hotspot_fields() {
        let mut draft = PackageDraft::empty(PackageType::Pppoe);
        assert!(draft.set_field(Field::SessionTime, "1").is_err());
        assert!(draft.hotspot_mut().is_err());
        draft.set_field(Field::Name, "Home").unwrap();
        assert_eq!(draft.field(Field::Name), Some("Home"));
        assert_eq!(draft.field(Field::DataLimit), None);
    }

    #[test]
    fn validation_message_lists_fields() {
        let errors = PackageDraft::empty(PackageType::Pppoe)
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.to_string(),
            "name is required; price is required; downloadSpeed is required; uploadSpeed is required"
        );
    }
}
