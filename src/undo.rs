//! Per-page stroke undo.
//!
//! The stack records *which page* last gained a stroke, not the stroke
//! itself. Undoing pops the newest page id and drops that page's last stroke.
//! There is no redo.

use crate::constants::MAX_UNDO_ENTRIES;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UndoController {
    stack: VecDeque<String>,
    limit: usize,
}

impl Default for UndoController {
    fn default() -> Self {
        Self::new(MAX_UNDO_ENTRIES)
    }
}

impl UndoController {
    /// A stack holding at most `limit` entries (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            stack: VecDeque::with_capacity(limit.min(MAX_UNDO_ENTRIES)),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the bound, dropping the oldest entries that no longer fit.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        while self.stack.len() > self.limit {
            self.stack.pop_front();
        }
    }

    /// Note a page write. Pushes `page_id` only if its stroke count grew,
    /// dropping the oldest entry when full. Returns whether it pushed.
    pub fn record(&mut self, page_id: &str, strokes_before: usize, strokes_after: usize) -> bool {
        if strokes_after <= strokes_before {
            return false;
        }
        if self.stack.len() >= self.limit {
            self.stack.pop_front();
        }
        self.stack.push_back(page_id.to_string());
        debug!(page_id, depth = self.stack.len(), "Recorded undo entry");
        true
    }

    /// Take the most recent page id.
    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop_back()
    }

    pub fn peek(&self) -> Option<&str> {
        self.stack.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop every entry for a page that no longer exists.
    pub fn forget_page(&mut self, page_id: &str) {
        self.stack.retain(|id| id != page_id);
    }
}
