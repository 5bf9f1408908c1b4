// ── Router domain type ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A network router packages can be restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub id: EntityId,
    pub name: String,
    pub ip_address: Option<IpAddr>,
}
