//! Per-phase normalizers, grouped by planning stage.
//!
//! Each normalizer takes the unwrapped reply object and the current pass and
//! returns the branch value for its phase. None of them can fail.

pub(super) mod analysis;
pub(super) mod delivery;
pub(super) mod direction;
pub(super) mod foundation;

use stratplan_model::{Document, ListRecord, Statement};
use tracing::debug;

use super::fields::{Fields, Item};
use super::identity::IdAssigner;

/// Text aliases accepted for simple statement items.
const STATEMENT_TEXT: &[&str] = &["statement", "description", "name", "title", "item", "value"];

/// State shared by every normalizer within one pass.
pub(super) struct Pass<'a> {
    pub(super) document: &'a Document,
    pub(super) ids: IdAssigner,
}

impl Pass<'_> {
    /// Build one record per item, dropping items `build` rejects. Ids follow
    /// output position, so they stay dense after drops.
    pub(super) fn records<'r, T, F>(&self, items: Vec<Item<'r>>, tag: &str, mut build: F) -> Vec<T>
    where
        T: ListRecord,
        F: FnMut(&Item<'r>) -> Option<T>,
    {
        let mut out: Vec<T> = Vec::with_capacity(items.len());
        for item in &items {
            match build(item) {
                Some(mut record) => {
                    record.set_id(self.ids.assign(tag, out.len()));
                    out.push(record);
                }
                None => debug!(tag, "dropping list item without content"),
            }
        }
        out
    }

    /// Give `records` fresh ids for this pass, in order.
    pub(super) fn reassign<T: ListRecord>(&self, records: &mut [T], tag: &str) {
        for (position, record) in records.iter_mut().enumerate() {
            record.set_id(self.ids.assign(tag, position));
        }
    }

    /// `current` carried into this pass under fresh ids.
    pub(super) fn carry<T: ListRecord + Clone>(&self, current: &[T], tag: &str) -> Vec<T> {
        let mut carried = current.to_vec();
        self.reassign(&mut carried, tag);
        carried
    }

    /// The list under `aliases`, or `current` under fresh ids when the reply
    /// carries none.
    pub(super) fn list_or<'r, T, F>(
        &self,
        reply: &Fields<'r>,
        aliases: &[&str],
        current: &[T],
        tag: &str,
        build: F,
    ) -> Vec<T>
    where
        T: ListRecord + Clone,
        F: FnMut(&Item<'r>) -> Option<T>,
    {
        match reply.items(aliases) {
            Some(items) => self.records(items, tag, build),
            None => {
                debug!(field = aliases[0], "no list in reply, keeping current");
                self.carry(current, tag)
            }
        }
    }

    /// Simple bilingual statements.
    pub(super) fn statements(&self, items: Vec<Item<'_>>, tag: &str) -> Vec<Statement> {
        self.records(items, tag, statement)
    }

    /// Statements under `aliases`, or `current` when absent.
    pub(super) fn statements_or(
        &self,
        reply: &Fields<'_>,
        aliases: &[&str],
        current: &[Statement],
        tag: &str,
    ) -> Vec<Statement> {
        self.list_or(reply, aliases, current, tag, statement)
    }
}

fn statement(item: &Item<'_>) -> Option<Statement> {
    let text = item.headline("text", STATEMENT_TEXT);
    (!text.is_empty()).then(|| Statement {
        id: String::new(),
        text,
    })
}

/// Overlay an optional incoming value on the current one.
pub(super) fn keep_or<T: Clone>(incoming: Option<T>, current: &T) -> T {
    incoming.unwrap_or_else(|| current.clone())
}
