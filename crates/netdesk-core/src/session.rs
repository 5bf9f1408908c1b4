// ── Session permissions ──
//
// Holds the granted permission set for the signed-in user. The set can
// be swapped (re-login, profile reload); subscribers see every change
// and gates re-evaluate on their next render.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::permission::PermissionSet;

#[derive(Debug, Clone)]
pub struct Session {
    permissions: Arc<watch::Sender<Arc<PermissionSet>>>,
}

impl Session {
    pub fn new(permissions: PermissionSet) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(permissions));
        Self {
            permissions: Arc::new(tx),
        }
    }

    /// Current snapshot.
    pub fn permissions(&self) -> Arc<PermissionSet> {
        Arc::clone(&self.permissions.borrow())
    }

    /// Swap the granted set. Returns `true` when it actually changed.
    pub fn replace(&self, permissions: PermissionSet) -> bool {
        let changed = self.permissions.send_if_modified(|current| {
            if **current == permissions {
                return false;
            }
            *current = Arc::new(permissions);
            true
        });
        if changed {
            debug!(granted = self.permissions.borrow().len(), "permission set replaced");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PermissionSet>> {
        self.permissions.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PermissionSet::all())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gate::PermissionGate;
    use crate::permission::Permission;

    #[test]
    fn replacement_reaches_subscribers() {
        let session = Session::new(PermissionSet::new([Permission::PackagesView]));
        let mut rx = session.subscribe();
        let gate = PermissionGate::new(Permission::PackagesDelete);

        assert!(!gate.allows(&session.permissions()));
        assert!(session.replace(PermissionSet::all()));
        assert!(rx.has_changed().unwrap());
        assert!(gate.allows(&rx.borrow_and_update()));
        assert!(gate.allows(&session.permissions()));
    }

    #[test]
    fn identical_replacement_is_silent() {
        let session = Session::default();
        let rx = session.subscribe();
        assert!(!session.replace(PermissionSet::all()));
        assert!(!rx.has_changed().unwrap());
    }
}
