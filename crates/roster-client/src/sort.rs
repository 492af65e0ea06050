use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use roster_core::{RosterColumn, SortOrder, SortState, TrustList};
use roster_util_error::FmtCompact as _;
use snafu::ensure;
use tracing::{debug, info};

use crate::error::{SortResult, UnsupportedColumnSnafu};
use crate::store::RosterStore;

const LOG_TARGET: &str = "roster::sort";

/// Current [`SortState`] of each list
///
/// Shared between the [`SortController`] that changes it and the
/// [`RosterStore`] that sends it along with every fetch. Lives as long as
/// the process, nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct SortBoard {
    states: Arc<Mutex<BTreeMap<TrustList, SortState>>>,
}

impl SortBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, list: TrustList) -> SortState {
        self.states
            .lock()
            .expect("Locking failed")
            .get(&list)
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&self, list: TrustList, state: SortState) {
        self.states
            .lock()
            .expect("Locking failed")
            .insert(list, state);
    }

    /// Apply a header click, returning the new state
    pub fn toggle(&self, list: TrustList, key: RosterColumn) -> SortState {
        let mut states = self.states.lock().expect("Locking failed");
        let state = states.entry(list).or_default();
        *state = state.toggled(key);
        *state
    }
}

pub struct SortController {
    board: SortBoard,
    store: Arc<RosterStore>,
}

impl SortController {
    pub fn new(store: Arc<RosterStore>) -> Self {
        Self {
            board: store.sort_board().clone(),
            store,
        }
    }

    pub fn current(&self, list: TrustList) -> SortState {
        self.board.get(list)
    }

    /// Click on the `key` column header of `list`
    ///
    /// Flips the order when `key` is the current key, otherwise switches to
    /// `key` in [`SortOrder::DEFAULT`] order. The list is refetched either way;
    /// a failed refetch keeps the new sort state for the next refresh.
    pub async fn toggle(&self, list: TrustList, key: RosterColumn) -> SortResult<SortState> {
        ensure!(
            list.has_column(key),
            UnsupportedColumnSnafu { list, column: key }
        );
        let state = self.board.toggle(list, key);
        debug!(target: LOG_TARGET, %list, key = %state.key, order = %state.order, "Sort toggled");
        self.refresh(list).await;
        Ok(state)
    }

    /// Set both key and order directly
    pub async fn sort(
        &self,
        list: TrustList,
        key: RosterColumn,
        order: SortOrder,
    ) -> SortResult<SortState> {
        ensure!(
            list.has_column(key),
            UnsupportedColumnSnafu { list, column: key }
        );
        let state = SortState { key, order };
        self.board.set(list, state);
        self.refresh(list).await;
        Ok(state)
    }

    async fn refresh(&self, list: TrustList) {
        if let Err(err) = self.store.refresh(list).await {
            info!(target: LOG_TARGET, %list, err = %err.fmt_compact(), "Refresh after sort change failed");
        }
    }
}
