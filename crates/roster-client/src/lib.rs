//! Client side of the trust roster
//!
//! A [`Roster`] keeps local snapshots of the trusted and distrusted lists in
//! sync with the trust endpoint. The [`RevisionPoller`] watches the
//! endpoint's revision counter and refetches both lists whenever it moves,
//! the [`SortController`] and [`PersonaEditor`] carry operator input back to
//! the endpoint.

pub mod api;
pub mod edit;
pub mod error;
pub mod html;
pub mod poller;
pub mod render;
mod roster;
pub mod sort;
pub mod store;
pub mod wire;

pub use api::{HttpTrustClient, TrustApi};
pub use edit::{EditState, EditTable, PersonaEditor};
pub use error::{EditError, FetchError, ParseError, SortError, TransportError};
pub use html::HtmlTableRenderer;
pub use poller::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, PollOutcome, RevisionGate, RevisionPoller};
pub use render::{RosterRenderer, RosterTable, Translate, Untranslated};
pub use roster::Roster;
pub use sort::{SortBoard, SortController};
pub use store::RosterStore;
