// ── Identity type ──
//
// The backend hands out UUIDs, integers or opaque strings depending on
// the resource. EntityId unifies them behind one ordered, hashable type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for packages and routers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Uuid(Uuid),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        if let Ok(n) = s.parse::<u64>() {
            // Only canonical decimal forms; "007" stays textual so it round-trips.
            if n.to_string() == s {
                return Self::Numeric(n);
            }
        }
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
        assert_eq!(EntityId::from("42").to_string(), "42");
    }

    #[test]
    fn keeps_leading_zero_ids_textual() {
        assert_eq!(EntityId::from("007"), EntityId::Text("007".into()));
    }

    #[test]
    fn parses_uuids() {
        let raw = "0b8a3c39-5f4b-4b4e-9a57-1f3d7f0b2c11";
        let id = EntityId::from(raw);
        assert!(matches!(id, EntityId::Uuid(_)));
        assert_eq!(id.to_string(), raw);
    }
}
