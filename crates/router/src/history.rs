//! Browser-style history stack owned by the router.

use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub path: String,
    /// Optional state object associated with the entry.
    pub state: Option<Value>,
}

/// Always holds at least one entry: the current location exists from the
/// moment the shell opens, as in a browser.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                path: initial.into(),
                state: None,
            }],
            cursor: 0,
        }
    }

    /// Push a new entry, discarding any forward entries past the cursor.
    pub fn push(&mut self, path: &str, state: Option<Value>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            path: path.to_owned(),
            state,
        });
        self.cursor = self.entries.len() - 1;
    }

    /// Move the cursor back one entry. Returns whether it moved.
    pub fn back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor forward one entry. Returns whether it moved.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn current_path(&self) -> &str {
        &self.current().path
    }

    pub fn current_state(&self) -> Option<&Value> {
        self.current().state.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
