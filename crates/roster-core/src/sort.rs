use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::RosterColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Order used when a list switches to a new key
    pub const DEFAULT: SortOrder = SortOrder::Ascending;

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }

    pub fn opposite(self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// The order the next click on a column header would request
    ///
    /// An unset order has no opposite.
    pub fn next(current: Option<SortOrder>) -> Option<SortOrder> {
        current.map(SortOrder::opposite)
    }

    /// Lenient parse, anything unknown counts as unset
    pub fn from_wire(s: &str) -> Option<SortOrder> {
        s.parse().ok()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown sort order: {value}"))]
pub struct SortOrderParseError {
    value: String,
}

impl FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            _ => SortOrderParseSnafu { value: s }.fail(),
        }
    }
}

/// Current sort of one list, forwarded to the server on every fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub key: RosterColumn,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: RosterColumn::User,
            order: SortOrder::DEFAULT,
        }
    }
}

impl SortState {
    /// Result of clicking the `key` column header
    ///
    /// Same key flips the order, a different key starts over from
    /// [`SortOrder::DEFAULT`].
    pub fn toggled(self, key: RosterColumn) -> SortState {
        if self.key == key {
            SortState {
                key,
                order: self.order.opposite(),
            }
        } else {
            SortState {
                key,
                order: SortOrder::DEFAULT,
            }
        }
    }

    pub fn next_order(self) -> SortOrder {
        self.order.opposite()
    }
}
