use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::TrustApi;
use crate::edit::{EditTable, PersonaEditor};
use crate::poller::{DEFAULT_POLL_INTERVAL, RevisionPoller};
use crate::render::{NoRender, RosterRenderer, Translate, Untranslated};
use crate::sort::{SortBoard, SortController};
use crate::store::RosterStore;

const LOG_TARGET: &str = "roster";

/// The trust roster, wired together
///
/// All parts share one [`RosterStore`], so a sort change or an edit is seen
/// by the next refresh no matter who triggers it.
pub struct Roster {
    api: Arc<dyn TrustApi>,
    store: Arc<RosterStore>,
    sort: SortController,
    editor: PersonaEditor,
    poll_interval: Duration,
}

#[bon::bon]
impl Roster {
    #[builder(finish_fn(name = "build"))]
    pub fn new(
        api: Arc<dyn TrustApi>,
        renderer: Option<Arc<dyn RosterRenderer>>,
        translate: Option<Arc<dyn Translate>>,
        #[builder(default = DEFAULT_POLL_INTERVAL)] poll_interval: Duration,
    ) -> Self {
        let renderer = renderer.unwrap_or_else(|| Arc::new(NoRender));
        let translate = translate.unwrap_or_else(|| Arc::new(Untranslated));

        let store = Arc::new(RosterStore::new(
            api.clone(),
            SortBoard::new(),
            EditTable::new(),
            renderer,
            translate,
        ));

        Self {
            sort: SortController::new(store.clone()),
            editor: PersonaEditor::new(api.clone(), store.clone()),
            api,
            store,
            poll_interval,
        }
    }
}

impl Roster {
    pub fn store(&self) -> &Arc<RosterStore> {
        &self.store
    }

    pub fn sort(&self) -> &SortController {
        &self.sort
    }

    pub fn editor(&self) -> &PersonaEditor {
        &self.editor
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// A fresh poller over this roster, for driving it by hand
    pub fn poller(&self) -> RevisionPoller {
        RevisionPoller::new(self.api.clone(), self.store.clone(), self.poll_interval)
    }

    /// Keep the roster in sync in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_poller(&self) -> JoinHandle<()> {
        debug!(target: LOG_TARGET, interval = ?self.poll_interval, "Starting revision poller");
        tokio::spawn(self.poller().run())
    }
}
