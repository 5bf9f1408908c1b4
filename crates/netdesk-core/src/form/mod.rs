// ── Package form controller ──
//
// State machine behind the create/edit dialog:
//
//   Closed ──open──▶ Open ──begin_submit──▶ Submitting ──ok──▶ Closed
//                     ▲                         │
//                     └─────────── err ─────────┘
//
// Every open starts a new `FormSession`. Router lists and submission
// results are tagged with the session they belong to; anything that
// arrives for an older session is dropped.

mod draft;

use tracing::{debug, warn};

pub use draft::{
    Field, FieldError, FieldIssue, HotspotDraft, HotspotPayload, PackageDraft, PackagePayload,
    PppoeDraft, PppoePayload, ValidationErrors,
};

use crate::error::CoreError;
use crate::model::{
    DataLimit, DataLimitUnit, EntityId, Package, PackagePatch, PackageType, Router,
    SessionTimeUnit,
};
use crate::service::PackageService;

/// Identifies one opening of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormSession(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit { original: Box<Package> },
}

/// Router choices offered by the multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOptions {
    /// PPPoE packages have no router restriction input.
    NotApplicable,
    Loading,
    Loaded(Vec<Router>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenForm {
    pub session: FormSession,
    pub mode: FormMode,
    pub draft: PackageDraft,
    pub routers: RouterOptions,
    /// Message from the last failed submission.
    pub error: Option<String>,
}

impl OpenForm {
    pub fn package_type(&self) -> PackageType {
        self.draft.package_type()
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormState {
    #[default]
    Closed,
    Open(OpenForm),
    Submitting(OpenForm),
}

/// What the caller must send to the package service.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    Create(PackagePayload),
    Update { id: EntityId, patch: PackagePatch },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub session: FormSession,
    pub request: SubmitRequest,
}

#[derive(Debug, Default)]
pub struct PackageFormController {
    state: FormState,
    sessions: u64,
}

impl PackageFormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FormState::Closed)
    }

    /// The open (or submitting) form, if any.
    pub fn form(&self) -> Option<&OpenForm> {
        match &self.state {
            FormState::Open(form) | FormState::Submitting(form) => Some(form),
            FormState::Closed => None,
        }
    }

    // ── Opening ─────────────────────────────────────────────────────

    pub fn open_create(&mut self, kind: PackageType) -> FormSession {
        self.open(FormMode::Create, PackageDraft::empty(kind))
    }

    pub fn open_edit(&mut self, package: &Package) -> FormSession {
        let draft = PackageDraft::from_package(package);
        self.open(
            FormMode::Edit {
                original: Box::new(package.clone()),
            },
            draft,
        )
    }

    fn open(&mut self, mode: FormMode, draft: PackageDraft) -> FormSession {
        self.sessions += 1;
        let session = FormSession(self.sessions);
        let routers = match draft.package_type() {
            PackageType::Hotspot => RouterOptions::Loading,
            PackageType::Pppoe => RouterOptions::NotApplicable,
        };
        debug!(session = session.0, package_type = %draft.package_type(), "package form opened");
        self.state = FormState::Open(OpenForm {
            session,
            mode,
            draft,
            routers,
            error: None,
        });
        session
    }

    /// Whether the open form wants a router list.
    pub fn needs_routers(&self) -> bool {
        matches!(
            self.form().map(|f| &f.routers),
            Some(RouterOptions::Loading)
        )
    }

    /// Deliver the router fetch started for `session`. Failures degrade
    /// to an empty list. Returns `false` when the result was dropped
    /// because another open has happened since.
    pub fn apply_routers(
        &mut self,
        session: FormSession,
        result: Result<Vec<Router>, CoreError>,
    ) -> bool {
        let form = match &mut self.state {
            FormState::Open(form) | FormState::Submitting(form) if form.session == session => form,
            _ => {
                debug!(session = session.0, "dropping stale router list");
                return false;
            }
        };
        if form.routers == RouterOptions::NotApplicable {
            return false;
        }
        let routers = result.unwrap_or_else(|e| {
            warn!(error = %e, "router list unavailable, offering none");
            Vec::new()
        });
        form.routers = RouterOptions::Loaded(routers);
        true
    }

    // ── Editing ─────────────────────────────────────────────────────

    fn editable(&mut self) -> Result<&mut OpenForm, CoreError> {
        match &mut self.state {
            FormState::Open(form) => Ok(form),
            FormState::Submitting(_) => Err(CoreError::InvalidState {
                message: "form is submitting".into(),
            }),
            FormState::Closed => Err(CoreError::InvalidState {
                message: "form is not open".into(),
            }),
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), CoreError> {
        self.editable()?.draft.set_field(field, value)
    }

    pub fn set_session_time_unit(&mut self, unit: SessionTimeUnit) -> Result<(), CoreError> {
        self.editable()?.draft.hotspot_mut()?.session_time_unit = unit;
        Ok(())
    }

    pub fn set_data_limit_unit(&mut self, unit: DataLimitUnit) -> Result<(), CoreError> {
        self.editable()?.draft.hotspot_mut()?.data_limit_unit = unit;
        Ok(())
    }

    /// Show or hide the data-limit input. Hiding it drops whatever was
    /// typed so it cannot leak into the payload.
    pub fn set_data_limit_enabled(&mut self, enabled: bool) -> Result<(), CoreError> {
        let draft = self.editable()?.draft.hotspot_mut()?;
        draft.data_limit_enabled = enabled;
        if !enabled {
            draft.data_limit.clear();
        }
        Ok(())
    }

    /// Add or remove a router from the selection. Returns whether it is
    /// selected afterwards.
    pub fn toggle_router(&mut self, id: EntityId) -> Result<bool, CoreError> {
        let ids = &mut self.editable()?.draft.hotspot_mut()?.router_ids;
        if ids.shift_remove(&id) {
            Ok(false)
        } else {
            ids.insert(id);
            Ok(true)
        }
    }

    pub fn set_routers(&mut self, ids: impl IntoIterator<Item = EntityId>) -> Result<(), CoreError> {
        self.editable()?.draft.hotspot_mut()?.router_ids = ids.into_iter().collect();
        Ok(())
    }

    pub fn validate(&self) -> Result<PackagePayload, CoreError> {
        let form = self.form().ok_or_else(|| CoreError::InvalidState {
            message: "form is not open".into(),
        })?;
        Ok(form.draft.validate()?)
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, FormState::Open(_)) && self.validate().is_ok()
    }

    // ── Submitting ──────────────────────────────────────────────────

    /// Validate and move to `Submitting`. On validation failure the form
    /// stays open and nothing should be sent.
    pub fn begin_submit(&mut self) -> Result<Submission, CoreError> {
        let form = self.editable()?;
        let payload = form.draft.validate()?;
        let request = match &form.mode {
            FormMode::Create => SubmitRequest::Create(payload),
            FormMode::Edit { original } => SubmitRequest::Update {
                id: original.id.clone(),
                patch: edit_patch(original, payload),
            },
        };
        let session = form.session;

        let state = std::mem::take(&mut self.state);
        if let FormState::Open(mut form) = state {
            form.error = None;
            self.state = FormState::Submitting(form);
        }
        Ok(Submission { session, request })
    }

    /// Deliver the service's answer. Success closes the form; failure
    /// reopens it with the draft intact and the error message recorded.
    pub fn finish_submit(
        &mut self,
        session: FormSession,
        result: Result<Package, CoreError>,
    ) -> Result<Package, CoreError> {
        let state = std::mem::take(&mut self.state);
        let form = match state {
            FormState::Submitting(form) if form.session == session => form,
            other => {
                self.state = other;
                return Err(CoreError::InvalidState {
                    message: "submission no longer belongs to the open form".into(),
                });
            }
        };

        match result {
            Ok(package) => {
                debug!(session = session.0, id = %package.id, "package form submitted");
                Ok(package)
            }
            Err(err) => {
                warn!(error = %err, "package submission failed");
                self.state = FormState::Open(OpenForm {
                    error: Some(err.user_message()),
                    ..form
                });
                Err(err)
            }
        }
    }

    /// Validate, send and settle in one step.
    pub async fn submit<S: PackageService>(&mut self, service: &S) -> Result<Package, CoreError> {
        let Submission { session, request } = self.begin_submit()?;
        let result = match request {
            SubmitRequest::Create(payload) => service.create_package(&payload).await,
            SubmitRequest::Update { id, patch } => service.update_package(&id, &patch).await,
        };
        self.finish_submit(session, result)
    }

    /// Close and discard the draft.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("package form cancelled");
        }
        self.state = FormState::Closed;
    }
}

/// Turn a validated edit into a partial update. The package type is
/// fixed and never sent. A data limit that still matches what was
/// pre-filled is left out, since the pre-fill may have rounded a byte
/// count that was not a whole number of megabytes.
fn edit_patch(original: &Package, payload: PackagePayload) -> PackagePatch {
    match payload {
        PackagePayload::Pppoe(p) => PackagePatch {
            name: Some(p.name),
            price: Some(p.price),
            download_speed: Some(p.download_speed),
            upload_speed: Some(p.upload_speed),
            ..PackagePatch::default()
        },
        PackagePayload::Hotspot(p) => {
            let data_limit = match (p.limit(), original.data_limit_bytes) {
                (Some(limit), Some(stored))
                    if limit == DataLimit::from_bytes(stored) || limit.bytes() == Some(stored) =>
                {
                    None
                }
                (Some(limit), _) => Some(Some(limit)),
                (None, Some(_)) => Some(None),
                (None, None) => None,
            };
            PackagePatch {
                session_time: Some(p.session()),
                data_limit,
                router_ids: Some(p.router_ids),
                name: Some(p.name),
                price: Some(p.price),
                download_speed: Some(p.download_speed),
                upload_speed: Some(p.upload_speed),
                is_active: None,
            }
        }
    }
}
