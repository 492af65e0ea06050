use std::io::{self, Write};

use roster_client::render::Affordance;
use roster_client::{RosterRenderer, RosterTable};
use roster_util_error::FmtCompact as _;
use tracing::debug;

use crate::LOG_TARGET;

/// Prints every rendered table to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn format(table: &RosterTable) -> String {
        let mut out = format!(
            "== {} ({} {}) ==\n",
            table.list, table.sort.key, table.sort.order
        );
        out.push_str(
            &table
                .columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join("\t"),
        );
        out.push('\n');

        for row in &table.rows {
            let cells = table
                .columns
                .iter()
                .map(|c| row.cells.get(c).map(String::as_str).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\t");
            out.push_str(&cells);

            for affordance in &row.affordances {
                if let Affordance::ReasonPrompt { role, reason } = affordance {
                    out.push_str(&format!("\t[{role}: {reason:?}]"));
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write `table` to `out`, returning whether it went through
    pub fn write_to(table: &RosterTable, out: &mut impl Write) -> bool {
        match out
            .write_all(Self::format(table).as_bytes())
            .and_then(|()| out.flush())
        {
            Ok(()) => true,
            Err(err) => {
                debug!(target: LOG_TARGET, list = %table.list, err = %err.fmt_compact(), "Failed to print table");
                false
            }
        }
    }
}

impl RosterRenderer for TextRenderer {
    fn render(&self, table: &RosterTable) {
        Self::write_to(table, &mut io::stdout().lock());
    }
}
