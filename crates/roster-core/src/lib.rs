pub mod id;
pub mod list;
pub mod snapshot;
pub mod sort;

use std::fmt;

pub use id::{IdToken, PersonaName};
pub use list::{EditRole, RosterColumn, TrustAction, TrustList};
use serde::{Deserialize, Serialize};
pub use snapshot::RosterSnapshot;
pub use sort::{SortOrder, SortState};

/// One entry of the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: PersonaName,
    /// Server supplied token, kept verbatim
    pub token: IdToken,
    /// Only meaningful in [`TrustList::Trusted`]
    pub subscribed: bool,
    /// Can be empty
    pub reason: String,
}

impl Persona {
    /// Build a persona with the token derived locally from the name
    pub fn new(name: impl Into<PersonaName>) -> Self {
        let name = name.into();
        Self {
            token: IdToken::encode(&name),
            name,
            subscribed: false,
            reason: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_subscribed(mut self, subscribed: bool) -> Self {
        self.subscribed = subscribed;
        self
    }
}

/// Global version of the whole roster, owned by the server
///
/// The client caches it as `Option<Revision>`, with `None` meaning "never
/// seen one", which orders below every real revision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    /// Is `self` strictly newer than the `cached` one
    pub fn is_newer_than(self, cached: Option<Revision>) -> bool {
        Some(self) > cached
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
