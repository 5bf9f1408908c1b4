// ── Permission gate ──
//
// Conditional rendering over a permission predicate. Both branches are
// closures, so only the selected one is ever built.

use crate::permission::{Permission, PermissionRequest, PermissionSet};

/// Chooses between primary and fallback content based on a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGate {
    request: PermissionRequest,
}

impl PermissionGate {
    pub fn new(request: impl Into<PermissionRequest>) -> Self {
        Self {
            request: request.into(),
        }
    }

    /// A gate without a predicate. Always shows the primary content.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn request(&self) -> &PermissionRequest {
        &self.request
    }

    pub fn allows(&self, granted: &PermissionSet) -> bool {
        self.request.evaluate(granted)
    }

    /// Build `content` when allowed, otherwise `fallback`.
    pub fn render<T>(
        &self,
        granted: &PermissionSet,
        content: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(granted) {
            content()
        } else {
            fallback()
        }
    }

    /// Like [`render`](Self::render) with the type's default as fallback.
    pub fn render_or_default<T: Default>(
        &self,
        granted: &PermissionSet,
        content: impl FnOnce() -> T,
    ) -> T {
        self.render(granted, content, T::default)
    }

    /// Render nothing (`None`) when denied.
    pub fn render_opt<T>(&self, granted: &PermissionSet, content: impl FnOnce() -> T) -> Option<T> {
        self.allows(granted).then(content)
    }
}

// ── Decorator ───────────────────────────────────────────────────────

/// A unit that produces displayable output.
pub trait Render {
    type Output;

    fn render(&self) -> Self::Output;
}

/// Wraps a renderable unit behind exactly one permission, with no
/// fallback: unauthorized sessions get nothing.
#[derive(Debug, Clone)]
pub struct RequirePermission<R> {
    permission: Permission,
    inner: R,
}

impl<R: Render> RequirePermission<R> {
    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn render(&self, granted: &PermissionSet) -> Option<R::Output> {
        PermissionGate::new(self.permission).render_opt(granted, || self.inner.render())
    }
}

pub fn with_permission<R: Render>(permission: Permission, inner: R) -> RequirePermission<R> {
    RequirePermission { permission, inner }
}
