use std::sync::Arc;

use roster_core::{RosterSnapshot, TrustList};
use roster_util_error::FmtCompact as _;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::TrustApi;
use crate::edit::EditTable;
use crate::error::FetchResult;
use crate::render::{RosterRenderer, RosterTable, Translate};
use crate::sort::SortBoard;

const LOG_TARGET: &str = "roster::store";

/// Last successfully fetched snapshot of each list
///
/// A refresh replaces a list's snapshot whole, or leaves it alone when the
/// fetch fails. The two lists never affect each other.
pub struct RosterStore {
    api: Arc<dyn TrustApi>,
    sort: SortBoard,
    edits: EditTable,
    renderer: Arc<dyn RosterRenderer>,
    translate: Arc<dyn Translate>,

    trusted: watch::Sender<Arc<RosterSnapshot>>,
    distrusted: watch::Sender<Arc<RosterSnapshot>>,
}

impl RosterStore {
    pub fn new(
        api: Arc<dyn TrustApi>,
        sort: SortBoard,
        edits: EditTable,
        renderer: Arc<dyn RosterRenderer>,
        translate: Arc<dyn Translate>,
    ) -> Self {
        let (trusted, _) = watch::channel(Arc::new(RosterSnapshot::empty(TrustList::Trusted)));
        let (distrusted, _) =
            watch::channel(Arc::new(RosterSnapshot::empty(TrustList::Distrusted)));
        Self {
            api,
            sort,
            edits,
            renderer,
            translate,
            trusted,
            distrusted,
        }
    }

    fn snapshot_tx(&self, list: TrustList) -> &watch::Sender<Arc<RosterSnapshot>> {
        match list {
            TrustList::Trusted => &self.trusted,
            TrustList::Distrusted => &self.distrusted,
        }
    }

    pub fn sort_board(&self) -> &SortBoard {
        &self.sort
    }

    pub fn edits(&self) -> &EditTable {
        &self.edits
    }

    pub fn snapshot(&self, list: TrustList) -> Arc<RosterSnapshot> {
        self.snapshot_tx(list).borrow().clone()
    }

    /// Get notified about every successful refresh of `list`
    pub fn subscribe(&self, list: TrustList) -> watch::Receiver<Arc<RosterSnapshot>> {
        self.snapshot_tx(list).subscribe()
    }

    /// Refetch `list` with its current sort and render it
    ///
    /// Rows get rebuilt, so the list's open reason prompts are reset. On error
    /// neither the snapshot nor the edit state change and nothing is rendered.
    pub async fn refresh(&self, list: TrustList) -> FetchResult<()> {
        let sort = self.sort.get(list);
        let personas = self.api.fetch_list(list, sort).await?;

        let snapshot = Arc::new(RosterSnapshot::from_fetched(list, personas));
        let reset = self.edits.reset_role(list.edit_role());
        debug!(target: LOG_TARGET, %list, len = snapshot.len(), reset, "List refreshed");

        self.snapshot_tx(list).send_replace(snapshot.clone());
        self.render(&snapshot);
        Ok(())
    }

    /// Refresh both lists concurrently
    ///
    /// Failures are logged and otherwise ignored, the next trigger will try
    /// again. Returns whether both lists were refreshed.
    pub async fn refresh_all(&self) -> bool {
        let (trusted, distrusted) = tokio::join!(
            self.refresh(TrustList::Trusted),
            self.refresh(TrustList::Distrusted)
        );

        let mut all_ok = true;
        for (list, res) in [(TrustList::Trusted, trusted), (TrustList::Distrusted, distrusted)] {
            if let Err(err) = res {
                info!(target: LOG_TARGET, %list, err = %err.fmt_compact(), "Failed to refresh list");
                all_ok = false;
            }
        }
        all_ok
    }

    /// Render the current snapshot again, after an edit prompt changed
    pub fn render_current(&self, list: TrustList) {
        let snapshot = self.snapshot(list);
        self.render(&snapshot);
    }

    fn render(&self, snapshot: &RosterSnapshot) {
        let table = RosterTable::build(
            snapshot,
            self.sort.get(snapshot.list()),
            &self.edits,
            self.translate.as_ref(),
        );
        self.renderer.render(&table);
    }
}
