use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Server-assigned identifier of an author. Opaque to the client.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Guid(pub String);

impl Guid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Guid {
    fn from(s: &str) -> Self {
        Guid(s.to_string())
    }
}

impl From<String> for Guid {
    fn from(s: String) -> Self {
        Guid(s)
    }
}
