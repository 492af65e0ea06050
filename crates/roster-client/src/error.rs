pub use reqwest::StatusCode;
use roster_core::{EditRole, IdToken, RosterColumn, TrustList};
use snafu::Snafu;

/// Network or status failure talking to the trust endpoint
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransportError {
    #[snafu(display("HTTP request failed"))]
    Request { source: reqwest::Error },
    #[snafu(display("Server responded with {status}"))]
    Status { status: StatusCode },
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Malformed roster document
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    #[snafu(display("Not a revision: {text:?}"))]
    InvalidRevision { text: String },
    #[snafu(display("Persona #{index} has no <{field}>"))]
    MissingField { field: &'static str, index: usize },
    #[snafu(display("Invalid selector"))]
    Selector,
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FetchError {
    #[snafu(transparent)]
    Transport { source: TransportError },
    #[snafu(transparent)]
    Parse { source: ParseError },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SortError {
    #[snafu(display("The {list} list has no {column} column"))]
    UnsupportedColumn {
        list: TrustList,
        column: RosterColumn,
    },
}

pub type SortResult<T> = std::result::Result<T, SortError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EditError {
    #[snafu(display("No {role} reason prompt open for {token}"))]
    NotPrompting { token: IdToken, role: EditRole },
    #[snafu(display("Submitting failed"))]
    Submit { source: TransportError },
}

pub type EditResult<T> = std::result::Result<T, EditError>;
