use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for owned object instances.
///
/// Used to key cached exact-solution functions so that a function installed
/// in a boundary-condition container can be found again later and refreshed
/// in place (without reallocating it) when boundary marker data changes.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct Uid(String);

impl Uid {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
