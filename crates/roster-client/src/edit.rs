//! Operator edits of roster entries
//!
//! Every `(token, role)` pair is its own little state machine:
//!
//! ```text
//!   Idle --mark--> Prompting --submit ok--> Idle
//!                  |   ^  |
//!                  |   |  +--submit failed (text kept)
//!                  +--cancel--> Idle
//! ```
//!
//! Marking neutral and subscribing never prompt.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use roster_core::{EditRole, IdToken, TrustAction};
use roster_util_error::FmtCompact as _;
use snafu::{OptionExt as _, ResultExt as _};
use tracing::{debug, info};

use crate::api::TrustApi;
use crate::error::{EditResult, NotPromptingSnafu, SubmitSnafu};
use crate::store::RosterStore;

const LOG_TARGET: &str = "roster::edit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Prompting { reason: String },
}

impl EditState {
    pub fn is_prompting(&self) -> bool {
        matches!(self, EditState::Prompting { .. })
    }
}

/// `(token, role) → EditState`, with `Idle` entries not stored
#[derive(Debug, Clone, Default)]
pub struct EditTable {
    prompts: Arc<Mutex<BTreeMap<(IdToken, EditRole), String>>>,
}

impl EditTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, token: &IdToken, role: EditRole) -> EditState {
        let prompts = self.prompts.lock().expect("Locking failed");
        match prompts.get(&(token.clone(), role)) {
            Some(reason) => EditState::Prompting {
                reason: reason.clone(),
            },
            None => EditState::Idle,
        }
    }

    /// Open the reason prompt
    ///
    /// Returns `false` if it was already open, in which case the text typed so
    /// far stays.
    pub fn begin(&self, token: &IdToken, role: EditRole) -> bool {
        let mut prompts = self.prompts.lock().expect("Locking failed");
        let key = (token.clone(), role);
        if prompts.contains_key(&key) {
            return false;
        }
        prompts.insert(key, String::new());
        true
    }

    pub fn set_reason(&self, token: &IdToken, role: EditRole, reason: &str) -> EditResult<()> {
        let mut prompts = self.prompts.lock().expect("Locking failed");
        let entry = prompts
            .get_mut(&(token.clone(), role))
            .context(NotPromptingSnafu {
                token: token.clone(),
                role,
            })?;
        reason.clone_into(entry);
        Ok(())
    }

    pub fn reason(&self, token: &IdToken, role: EditRole) -> Option<String> {
        self.prompts
            .lock()
            .expect("Locking failed")
            .get(&(token.clone(), role))
            .cloned()
    }

    /// Close the prompt, dropping its text. Returns whether one was open.
    pub fn close(&self, token: &IdToken, role: EditRole) -> bool {
        self.prompts
            .lock()
            .expect("Locking failed")
            .remove(&(token.clone(), role))
            .is_some()
    }

    /// Put a prompt back after a failed submit
    ///
    /// A prompt that got reopened in the meantime keeps its newer text.
    pub fn restore(&self, token: &IdToken, role: EditRole, reason: String) {
        self.prompts
            .lock()
            .expect("Locking failed")
            .entry((token.clone(), role))
            .or_insert(reason);
    }

    /// Back to `Idle` for every entry of `role`, when its rows get rebuilt
    pub fn reset_role(&self, role: EditRole) -> usize {
        let mut prompts = self.prompts.lock().expect("Locking failed");
        let before = prompts.len();
        prompts.retain(|(_, r), _| *r != role);
        before - prompts.len()
    }

    /// Open prompts of `role`
    pub fn prompting(&self, role: EditRole) -> Vec<(IdToken, String)> {
        self.prompts
            .lock()
            .expect("Locking failed")
            .iter()
            .filter(|((_, r), _)| *r == role)
            .map(|((token, _), reason)| (token.clone(), reason.clone()))
            .collect()
    }
}

/// Drives the [`EditTable`] and submits the resulting actions
pub struct PersonaEditor {
    api: Arc<dyn TrustApi>,
    store: Arc<RosterStore>,
    edits: EditTable,
}

impl PersonaEditor {
    pub fn new(api: Arc<dyn TrustApi>, store: Arc<RosterStore>) -> Self {
        let edits = store.edits().clone();
        Self { api, store, edits }
    }

    pub fn state(&self, token: &IdToken, role: EditRole) -> EditState {
        self.edits.state(token, role)
    }

    /// "Mark trusted" / "mark distrusted": open the reason prompt
    pub fn mark(&self, token: &IdToken, role: EditRole) {
        if self.edits.begin(token, role) {
            debug!(target: LOG_TARGET, %token, %role, "Reason prompt opened");
            self.store.render_current(role.shown_in());
        }
    }

    /// The operator typed into the prompt
    pub fn set_reason(&self, token: &IdToken, role: EditRole, reason: &str) -> EditResult<()> {
        self.edits.set_reason(token, role, reason)
    }

    /// Close the prompt without submitting anything
    pub fn cancel(&self, token: &IdToken, role: EditRole) {
        if self.edits.close(token, role) {
            debug!(target: LOG_TARGET, %token, %role, "Reason prompt cancelled");
            self.store.render_current(role.shown_in());
        }
    }

    /// Submit the open prompt with whatever reason it holds
    ///
    /// On failure the prompt stays open with its text, nothing is retried.
    pub async fn submit(&self, token: &IdToken, role: EditRole) -> EditResult<()> {
        let reason = self.edits.reason(token, role).context(NotPromptingSnafu {
            token: token.clone(),
            role,
        })?;

        match self.api.submit_action(role.action(), token, &reason).await {
            Ok(()) => {
                info!(target: LOG_TARGET, %token, action = %role.action(), "Action accepted");
                self.edits.close(token, role);
                self.store.refresh_all().await;
                Ok(())
            }
            Err(err) => {
                info!(target: LOG_TARGET, %token, action = %role.action(), err = %err.fmt_compact(), "Action failed");
                self.edits.restore(token, role, reason);
                self.store.render_current(role.shown_in());
                Err(err).context(SubmitSnafu)
            }
        }
    }

    /// "Mark neutral": submitted right away, no prompt
    pub async fn mark_neutral(&self, token: &IdToken) -> EditResult<()> {
        self.submit_immediate(TrustAction::Neutral, token).await
    }

    pub async fn subscribe(&self, token: &IdToken) -> EditResult<()> {
        self.submit_immediate(TrustAction::Subscribe, token).await
    }

    async fn submit_immediate(&self, action: TrustAction, token: &IdToken) -> EditResult<()> {
        self.api
            .submit_action(action, token, "")
            .await
            .inspect_err(|err| {
                info!(target: LOG_TARGET, %token, %action, err = %err.fmt_compact(), "Action failed");
            })
            .context(SubmitSnafu)?;

        info!(target: LOG_TARGET, %token, %action, "Action accepted");
        self.store.refresh_all().await;
        Ok(())
    }
}
