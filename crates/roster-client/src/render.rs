//! What the roster hands to whoever draws it
//!
//! The store builds a [`RosterTable`] per list after every successful fetch
//! (and when an edit prompt opens or closes) and passes it to a
//! [`RosterRenderer`]. Turning the table into markup, and translating the
//! labels, is the renderer's business.

use std::collections::BTreeMap;

use roster_core::{
    EditRole, IdToken, RosterColumn, RosterSnapshot, SortOrder, SortState, TrustList,
};

use crate::edit::{EditState, EditTable};

/// Display string lookup
pub trait Translate: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Returns keys unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Untranslated;

impl Translate for Untranslated {
    fn translate(&self, key: &str) -> String {
        key.to_owned()
    }
}

pub trait RosterRenderer: Send + Sync {
    fn render(&self, table: &RosterTable);
}

/// Renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRender;

impl RosterRenderer for NoRender {
    fn render(&self, _table: &RosterTable) {}
}

/// What clicking a column header does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCommand {
    pub list: TrustList,
    /// Column the list is currently sorted by
    pub key: RosterColumn,
    pub order: SortOrder,
    /// The order a click on `key` would request
    pub next_order: Option<SortOrder>,
}

impl SortCommand {
    pub fn new(list: TrustList, sort: SortState) -> Self {
        Self {
            list,
            key: sort.key,
            order: sort.order,
            next_order: SortOrder::next(Some(sort.order)),
        }
    }

    /// Order a click on `column` would request
    pub fn order_for(&self, column: RosterColumn) -> SortOrder {
        if column == self.key {
            self.next_order.unwrap_or(SortOrder::DEFAULT)
        } else {
            SortOrder::DEFAULT
        }
    }
}

/// An operator command available on a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    MarkTrusted,
    MarkDistrusted,
    MarkNeutral,
    Subscribe,
    /// An open reason prompt, with the text typed so far
    ReasonPrompt { role: EditRole, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub token: IdToken,
    pub cells: BTreeMap<RosterColumn, String>,
    pub affordances: Vec<Affordance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTable {
    pub list: TrustList,
    pub columns: Vec<RosterColumn>,
    pub rows: Vec<RosterRow>,
    pub sort: SortCommand,
}

impl RosterTable {
    /// One row per persona, in the server's order
    pub fn build(
        snapshot: &RosterSnapshot,
        sort: SortState,
        edits: &EditTable,
        translate: &dyn Translate,
    ) -> Self {
        let list = snapshot.list();
        let role = list.edit_role();

        let rows = snapshot
            .iter()
            .map(|persona| {
                let mut cells = BTreeMap::new();
                cells.insert(RosterColumn::User, persona.name.to_string());
                cells.insert(RosterColumn::Reason, persona.reason.clone());

                let move_affordance = match edits.state(&persona.token, role) {
                    EditState::Prompting { reason } => Affordance::ReasonPrompt { role, reason },
                    EditState::Idle => match role {
                        EditRole::Trust => Affordance::MarkTrusted,
                        EditRole::Distrust => Affordance::MarkDistrusted,
                    },
                };

                let mut affordances = match list {
                    TrustList::Trusted => vec![Affordance::MarkNeutral, move_affordance],
                    TrustList::Distrusted => vec![move_affordance, Affordance::MarkNeutral],
                };

                if list == TrustList::Trusted {
                    let label = if persona.subscribed {
                        "Subscribed"
                    } else {
                        affordances.push(Affordance::Subscribe);
                        "Subscribe"
                    };
                    cells.insert(RosterColumn::Subscribe, translate.translate(label));
                }

                RosterRow {
                    token: persona.token.clone(),
                    cells,
                    affordances,
                }
            })
            .collect();

        Self {
            list,
            columns: list.columns().to_vec(),
            rows,
            sort: SortCommand::new(list, sort),
        }
    }

    pub fn row(&self, token: &IdToken) -> Option<&RosterRow> {
        self.rows.iter().find(|r| &r.token == token)
    }
}
