use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use maud::{Markup, html};
use roster_core::{EditRole, IdToken, RosterColumn, TrustList};

use crate::render::{Affordance, RosterRenderer, RosterRow, RosterTable, Translate};

/// Renders roster tables to HTML and keeps the latest markup of each list
///
/// Commands are expressed as `data-action` / `data-persona` attributes for
/// the page script to bind, element ids follow the `trusted-link-<token>`,
/// `distrust-reason-<token>` scheme.
pub struct HtmlTableRenderer {
    translate: Arc<dyn Translate>,
    markup: Mutex<BTreeMap<TrustList, String>>,
}

impl HtmlTableRenderer {
    pub fn new(translate: Arc<dyn Translate>) -> Self {
        Self {
            translate,
            markup: Mutex::new(BTreeMap::new()),
        }
    }

    /// Markup of the last render of `list`
    pub fn markup(&self, list: TrustList) -> Option<String> {
        self.markup
            .lock()
            .expect("Locking failed")
            .get(&list)
            .cloned()
    }

    fn t(&self, key: &str) -> String {
        self.translate.translate(key)
    }

    pub fn table(&self, table: &RosterTable) -> Markup {
        html! {
            div id=(table.list.section()) {
                table ."m-rosterTable" {
                    thead {
                        tr {
                            @for column in &table.columns {
                                th {
                                    a href="#"
                                        data-sort-list=(table.list.to_string())
                                        data-sort-key=(column.as_str())
                                        data-sort-order=(table.sort.order_for(*column).as_str())
                                    { (self.t(column.as_str())) }
                                }
                            }
                        }
                    }
                    tbody {
                        @for row in &table.rows {
                            (self.row(table, row))
                        }
                    }
                }
            }
        }
    }

    fn row(&self, table: &RosterTable, row: &RosterRow) -> Markup {
        html! {
            tr data-persona=(row.token.as_str()) {
                @for column in &table.columns {
                    td {
                        @match column {
                            RosterColumn::User => {
                                (cell(row, *column))
                                @for affordance in &row.affordances {
                                    @if *affordance != Affordance::Subscribe {
                                        (self.affordance(&row.token, affordance))
                                    }
                                }
                            }
                            RosterColumn::Subscribe if row.affordances.contains(&Affordance::Subscribe) => {
                                (self.affordance(&row.token, &Affordance::Subscribe))
                            }
                            _ => { (cell(row, *column)) }
                        }
                    }
                }
            }
        }
    }

    fn affordance(&self, token: &IdToken, affordance: &Affordance) -> Markup {
        match affordance {
            Affordance::MarkTrusted => self.mark_block(token, EditRole::Trust, "Mark Trusted"),
            Affordance::MarkDistrusted => {
                self.mark_block(token, EditRole::Distrust, "Mark Distrusted")
            }
            Affordance::MarkNeutral => html! {
                a href="#" data-action="mark-neutral" data-persona=(token.as_str()) { (self.t("Mark Neutral")) }
            },
            Affordance::Subscribe => html! {
                a href="#" data-action="subscribe" data-persona=(token.as_str()) { (self.t("Subscribe")) }
            },
            Affordance::ReasonPrompt { role, reason } => html! {
                span id=(token.dom_id(&format!("{}-link", role.dom_prefix()))) {}
                span id=(token.dom_id(role.dom_prefix())) {
                    br;
                    (self.t("Enter Reason (Optional)"))
                    br;
                    textarea id=(token.dom_id(role.reason_dom_prefix())) { (reason) }
                    br;
                    a href="#" data-action=(format!("submit-{role}")) data-persona=(token.as_str()) { (self.t("Submit")) }
                    " "
                    a href="#" data-action=(format!("cancel-{role}")) data-persona=(token.as_str()) { (self.t("Cancel")) }
                    br;
                }
            },
        }
    }

    fn mark_block(&self, token: &IdToken, role: EditRole, label: &str) -> Markup {
        html! {
            span id=(token.dom_id(&format!("{}-link", role.dom_prefix()))) {
                a href="#" data-action=(format!("mark-{}", role.dom_prefix())) data-persona=(token.as_str()) {
                    (self.t(label))
                }
            }
            span id=(token.dom_id(role.dom_prefix())) {}
        }
    }
}

fn cell(row: &RosterRow, column: RosterColumn) -> &str {
    row.cells.get(&column).map(String::as_str).unwrap_or_default()
}

impl RosterRenderer for HtmlTableRenderer {
    fn render(&self, table: &RosterTable) {
        let markup = self.table(table).into_string();
        self.markup
            .lock()
            .expect("Locking failed")
            .insert(table.list, markup);
    }
}
