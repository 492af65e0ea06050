use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(display("Unknown {kind}: {value}"))]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
}

/// One side of the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustList {
    Trusted,
    Distrusted,
}

impl TrustList {
    pub const ALL: [TrustList; 2] = [TrustList::Trusted, TrustList::Distrusted];

    /// The `section` query parameter used to fetch the list
    pub fn section(self) -> &'static str {
        match self {
            TrustList::Trusted => "trustedUsers",
            TrustList::Distrusted => "distrustedUsers",
        }
    }

    pub fn columns(self) -> &'static [RosterColumn] {
        match self {
            TrustList::Trusted => &[
                RosterColumn::User,
                RosterColumn::Reason,
                RosterColumn::Subscribe,
            ],
            TrustList::Distrusted => &[RosterColumn::User, RosterColumn::Reason],
        }
    }

    pub fn has_column(self, column: RosterColumn) -> bool {
        self.columns().contains(&column)
    }

    /// The reason prompt offered on rows of this list
    ///
    /// Trusted rows can be moved to distrusted and vice versa.
    pub fn edit_role(self) -> EditRole {
        match self {
            TrustList::Trusted => EditRole::Distrust,
            TrustList::Distrusted => EditRole::Trust,
        }
    }
}

impl fmt::Display for TrustList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrustList::Trusted => "trusted",
            TrustList::Distrusted => "distrusted",
        })
    }
}

impl FromStr for TrustList {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trusted" | "trustedUsers" => Ok(TrustList::Trusted),
            "distrusted" | "distrustedUsers" => Ok(TrustList::Distrusted),
            _ => Err(UnknownVariantSnafu { kind: "list", value: s }.build()),
        }
    }
}

/// Table column, doubling as the server side sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RosterColumn {
    User,
    Reason,
    Subscribe,
}

impl RosterColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            RosterColumn::User => "User",
            RosterColumn::Reason => "Reason",
            RosterColumn::Subscribe => "Subscribe",
        }
    }
}

impl fmt::Display for RosterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RosterColumn {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RosterColumn::User,
            RosterColumn::Reason,
            RosterColumn::Subscribe,
        ]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownVariantSnafu { kind: "column", value: s }.build())
    }
}

/// Roster mutation, the `action` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustAction {
    Subscribe,
    Trust,
    Distrust,
    Neutral,
}

impl TrustAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TrustAction::Subscribe => "subscribe",
            TrustAction::Trust => "trust",
            TrustAction::Distrust => "distrust",
            TrustAction::Neutral => "neutral",
        }
    }

    pub fn takes_reason(self) -> bool {
        matches!(self, TrustAction::Trust | TrustAction::Distrust)
    }
}

impl fmt::Display for TrustAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustAction {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribe" => Ok(TrustAction::Subscribe),
            "trust" => Ok(TrustAction::Trust),
            "distrust" => Ok(TrustAction::Distrust),
            "neutral" => Ok(TrustAction::Neutral),
            _ => Err(UnknownVariantSnafu { kind: "action", value: s }.build()),
        }
    }
}

/// Which reason prompt an edit entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditRole {
    Trust,
    Distrust,
}

impl EditRole {
    pub fn action(self) -> TrustAction {
        match self {
            EditRole::Trust => TrustAction::Trust,
            EditRole::Distrust => TrustAction::Distrust,
        }
    }

    /// The list whose rows carry this prompt
    pub fn shown_in(self) -> TrustList {
        match self {
            EditRole::Trust => TrustList::Distrusted,
            EditRole::Distrust => TrustList::Trusted,
        }
    }

    /// Prefix of element ids: `trusted-link-<token>`, `trust-reason-<token>`
    pub fn dom_prefix(self) -> &'static str {
        match self {
            EditRole::Trust => "trusted",
            EditRole::Distrust => "distrusted",
        }
    }

    pub fn reason_dom_prefix(self) -> &'static str {
        match self {
            EditRole::Trust => "trust-reason",
            EditRole::Distrust => "distrust-reason",
        }
    }
}

impl fmt::Display for EditRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action().as_str())
    }
}
