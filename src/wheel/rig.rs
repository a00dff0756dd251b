//! Hidden override capture
//!
//! The host forwards raw key input here while capture is active. Every edit
//! re-matches the typed prefix against the entry list; the resulting index is
//! what gets handed to `SpinEngine::set_override`.

use serde::{Deserialize, Serialize};

use super::entries::EntryList;

/// Subtle marker the host may show (e.g. a dot in the window title)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigIndicator {
    None,
    /// Capture mode is on
    Capturing,
    /// A winner is locked in for the next spin
    Locked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigCapture {
    capturing: bool,
    buffer: String,
    matched: Option<usize>,
}

impl RigCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current match (the override to apply)
    pub fn matched(&self) -> Option<usize> {
        self.matched
    }

    /// Enter capture with an empty buffer, or leave it keeping the match
    pub fn toggle(&mut self) -> Option<usize> {
        if self.capturing {
            return self.confirm();
        }
        self.capturing = true;
        self.buffer.clear();
        log::debug!("Rig capture on");
        self.matched
    }

    /// Leave capture mode keeping the current match
    pub fn confirm(&mut self) -> Option<usize> {
        self.capturing = false;
        match self.matched {
            Some(i) => log::debug!("Rig locked on index {}", i),
            None => log::debug!("Rig cancelled, no match for \"{}\"", self.buffer),
        }
        self.matched
    }

    /// Leave capture mode and drop any match
    pub fn cancel(&mut self) {
        self.capturing = false;
        self.buffer.clear();
        self.matched = None;
    }

    /// Forget the match after the engine consumed it
    pub fn reset(&mut self) {
        self.cancel();
    }

    pub fn push_char(&mut self, c: char, entries: &EntryList) -> Option<usize> {
        if !self.capturing {
            return self.matched;
        }
        self.buffer.push(c);
        self.rematch(entries)
    }

    pub fn backspace(&mut self, entries: &EntryList) -> Option<usize> {
        if !self.capturing {
            return self.matched;
        }
        self.buffer.pop();
        self.rematch(entries)
    }

    /// Keep the match aligned with the list after `index` was removed
    pub fn note_entry_removed(&mut self, index: usize) {
        self.matched = match self.matched {
            Some(m) if m == index => None,
            Some(m) if m > index => Some(m - 1),
            other => other,
        };
    }

    pub fn indicator(&self) -> RigIndicator {
        if self.capturing {
            RigIndicator::Capturing
        } else if self.matched.is_some() {
            RigIndicator::Locked
        } else {
            RigIndicator::None
        }
    }

    fn rematch(&mut self, entries: &EntryList) -> Option<usize> {
        self.matched = entries.find_prefix(&self.buffer);
        self.matched
    }
}
