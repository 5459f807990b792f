//! Browser-style navigation history.
//!
//! Mirrors the `pushState`/`popstate` contract: the first entry is the
//! state the page was loaded with (possibly none), every internal link
//! click pushes an entry, and moving back or forward yields the state to
//! replay without pushing anything.

/// Navigation stack record pairing a page id with its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    id: String,
    url: String,
}

impl HistoryEntry {
    /// Creates entry for `id` with URL `?page=<id>`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let url = format!("?page={}", id);
        Self { id, url }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// State delivered when the history cursor moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopState {
    pub state: Option<HistoryEntry>,
}

/// Navigation stack with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Option<HistoryEntry>>,
    cursor: usize,
}

impl History {
    /// Creates history for a fresh load with no state.
    pub fn new() -> Self {
        Self::with_state(None)
    }

    /// Creates history whose current entry carries `state`, as after a
    /// reload of a pushed page.
    pub fn with_state(state: Option<HistoryEntry>) -> Self {
        Self {
            entries: vec![state],
            cursor: 0,
        }
    }

    /// State of the current entry.
    pub fn state(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor).and_then(Option::as_ref)
    }

    /// Pushes a new entry after the cursor, discarding forward entries.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Some(entry));
        self.cursor = self.entries.len() - 1;
    }

    /// Moves one entry back.
    ///
    /// # Returns
    ///
    /// The state to replay, or None when already at the first entry
    pub fn back(&mut self) -> Option<PopState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.pop_state())
    }

    /// Moves one entry forward.
    ///
    /// # Returns
    ///
    /// The state to replay, or None when already at the last entry
    pub fn forward(&mut self) -> Option<PopState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.pop_state())
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn pop_state(&self) -> PopState {
        PopState {
            state: self.state().cloned(),
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
