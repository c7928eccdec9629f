//! Single-expansion ("accordion") state.
//!
//! An `Accordion` holds at most one open key; the representation makes two open
//! keys impossible. `toggle` is a pure reducer returning the next state.
//! `Accordions` keeps one independent accordion per namespace so several
//! panels (selection, history) never share storage.
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use strum_macros::{Display, EnumString};

/// Exclusive expansion state: nothing open, or exactly one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Option<String>,
}

impl Accordion {
    /// Empty state, nothing open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `key`: an open key closes (empty state); any other key opens
    /// alone, closing whatever was open.
    #[must_use]
    pub fn toggle(&self, key: &str) -> Self {
        match self.open.as_deref() {
            Some(open) if open == key => Accordion { open: None },
            _ => Accordion {
                open: Some(key.to_string()),
            },
        }
    }

    /// Whether `key` is expanded.
    pub fn is_open(&self, key: &str) -> bool {
        self.open.as_deref() == Some(key)
    }

    /// The open key, if any.
    pub fn open_key(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Key-to-flag view; holds at most one `true` entry and no `false` ones.
    pub fn as_map(&self) -> BTreeMap<String, bool> {
        self.open.iter().map(|k| (k.clone(), true)).collect()
    }
}

/// Panels driven by an accordion in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Panel {
    /// Drill-down selection of a commodity or group.
    Selection,
    /// Historical series panel of a commodity card.
    History,
}

/// One accordion per namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordions<N: Eq + Hash = Panel> {
    by_namespace: HashMap<N, Accordion>,
}

impl<N: Eq + Hash> Default for Accordions<N> {
    fn default() -> Self {
        Accordions {
            by_namespace: HashMap::new(),
        }
    }
}

impl<N: Eq + Hash + Clone> Accordions<N> {
    /// No namespace has anything open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `key` in `namespace`, leaving other namespaces untouched.
    #[must_use]
    pub fn toggle(&self, namespace: N, key: &str) -> Self {
        let mut next = self.clone();
        let toggled = next.get(&namespace).toggle(key);
        next.by_namespace.insert(namespace, toggled);
        next
    }

    /// Accordion of `namespace`; empty when never toggled.
    pub fn get(&self, namespace: &N) -> Accordion {
        self.by_namespace.get(namespace).cloned().unwrap_or_default()
    }

    /// Whether `key` is open in `namespace`.
    pub fn is_open(&self, namespace: &N, key: &str) -> bool {
        self.by_namespace
            .get(namespace)
            .is_some_and(|a| a.is_open(key))
    }
}
