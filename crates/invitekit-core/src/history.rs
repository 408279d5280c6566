//! Linear undo/redo log of element list snapshots.

use crate::elements::{Element, ElementId, ElementList};

/// Snapshot history with a cursor.
///
/// `entries[index]` is always the externally visible list. Recording after an
/// undo discards the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<ElementList>,
    index: usize,
    /// Maximum number of snapshots kept (None = unbounded).
    limit: Option<usize>,
}

impl History {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(initial: ElementList) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: None,
        }
    }

    /// Create a history that keeps at most `limit` snapshots.
    ///
    /// When full, the oldest snapshot is dropped first. A limit below 1 is
    /// treated as 1.
    pub fn with_limit(initial: ElementList, limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::new(initial)
        }
    }

    /// The current list.
    pub fn current(&self) -> &ElementList {
        &self.entries[self.index]
    }

    /// Record a new snapshot after the cursor.
    pub fn record(&mut self, list: ElementList) {
        self.entries.truncate(self.index + 1);
        self.entries.push(list);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                log::debug!("History limit {} reached, dropped {} snapshot(s)", limit, excess);
            }
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one snapshot.
    /// Returns true if undo was performed, false if already at the oldest.
    pub fn undo(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one snapshot.
    /// Returns true if redo was performed, false if already at the newest.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Update element `id` in place in every snapshot that contains it.
    ///
    /// Reserved for runtime-only data (such as decoded image handles) that
    /// does not take part in snapshot equality.
    pub(crate) fn patch_all(&mut self, id: &ElementId, mut f: impl FnMut(&mut Element)) {
        for list in &mut self.entries {
            for element in list.iter_mut().filter(|el| &el.id == id) {
                f(element);
            }
        }
    }
}
