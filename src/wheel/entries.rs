//! Ordered entry list (the names on the wheel)
//!
//! Entries are identified by position; duplicates are allowed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryList {
    entries: Vec<String>,
}

impl EntryList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a trimmed entry; blank input is ignored
    ///
    /// Returns true if an entry was added.
    pub fn add_entry(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.entries.push(name.to_string());
        true
    }

    /// Remove the entry at `index`, shifting later entries down by one
    pub fn remove_entry(&mut self, index: usize) -> Option<String> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// "1 name" / "N names"
    pub fn count_label(&self) -> String {
        match self.entries.len() {
            1 => "1 name".to_string(),
            n => format!("{} names", n),
        }
    }

    /// First entry starting with `query`, ignoring case
    pub fn find_prefix(&self, query: &str) -> Option<usize> {
        if query.is_empty() {
            return None;
        }
        let query = query.to_lowercase();
        self.entries
            .iter()
            .position(|e| e.to_lowercase().starts_with(&query))
    }
}

impl<S: AsRef<str>> FromIterator<S> for EntryList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = EntryList::new();
        for name in iter {
            list.add_entry(name.as_ref());
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_skips_blank() {
        let mut list = EntryList::new();
        assert!(list.add_entry("  Alice "));
        assert!(!list.add_entry("   "));
        assert!(!list.add_entry(""));
        assert!(list.add_entry("Alice"));
        assert_eq!(list.entries(), &["Alice".to_string(), "Alice".to_string()]);
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut list: EntryList = ["A", "B", "C"].into_iter().collect();
        assert_eq!(list.remove_entry(0).as_deref(), Some("A"));
        assert_eq!(list.get(0), Some("B"));
        assert_eq!(list.get(1), Some("C"));
        assert_eq!(list.remove_entry(5), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_count_label() {
        let mut list = EntryList::new();
        assert_eq!(list.count_label(), "0 names");
        list.add_entry("Solo");
        assert_eq!(list.count_label(), "1 name");
        list.add_entry("Duo");
        assert_eq!(list.count_label(), "2 names");
    }

    #[test]
    fn test_find_prefix() {
        let list: EntryList = ["Maria", "marcus", "Bob"].into_iter().collect();
        assert_eq!(list.find_prefix("MAR"), Some(0));
        assert_eq!(list.find_prefix("marc"), Some(1));
        assert_eq!(list.find_prefix("b"), Some(2));
        assert_eq!(list.find_prefix("z"), None);
        assert_eq!(list.find_prefix(""), None);
    }
}
