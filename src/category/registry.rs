use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::warn;

/// A named, boolean-flagged bucket an event may fall into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    /// Display name. Defaults to the key; tree categorizers relabel leaves.
    pub name: String,
    /// Event-scoped membership flag.
    pub in_category: bool,
    /// Downstream consumers skip hidden categories when booking or saving output.
    pub hide: bool,
    /// Leaf used for the final statistical analysis.
    pub is_terminal: bool,
}

impl Category {
    pub fn new(key: &str, hide: bool, is_terminal: bool) -> Self {
        Self {
            key: key.to_string(),
            name: key.to_string(),
            in_category: false,
            hide,
            is_terminal,
        }
    }
}

/// Insertion-ordered registry of categories keyed by string.
///
/// Keys are fixed once a categorizer is constructed; evaluation only flips
/// flags. Looking up a key that was never registered is a programming error
/// and panics with the offending key.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    entries: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering an existing key overwrites its flags in place and keeps its position.
    pub fn register(&mut self, key: &str, hide: bool, is_terminal: bool) {
        if let Some(&i) = self.index.get(key) {
            warn!("Category '{}' registered twice, overwriting flags", key);
            self.entries[i] = Category::new(key, hide, is_terminal);
            return;
        }
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push(Category::new(key, hide, is_terminal));
    }

    pub fn reset(&mut self) {
        for c in &mut self.entries {
            c.in_category = false;
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    fn slot(&self, key: &str) -> usize {
        match self.index.get(key) {
            Some(&i) => i,
            None => panic!("category '{}' is not registered", key),
        }
    }

    pub fn is_in(&self, key: &str) -> bool {
        self.entries[self.slot(key)].in_category
    }

    pub fn set(&mut self, key: &str) {
        let i = self.slot(key);
        self.entries[i].in_category = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Category> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.key.as_str())
    }

    /// Keys currently flagged, in registration order.
    pub fn active_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|c| c.in_category)
            .map(|c| c.key.as_str())
            .collect()
    }

    /// Categories downstream code should book histograms for.
    pub fn visible(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().filter(|c| !c.hide)
    }

    /// One `key: flag` line per category, for eyeballing a single event.
    pub fn output_results(&self) -> String {
        let mut out = String::new();
        for c in &self.entries {
            let _ = writeln!(out, "    {}: {}", c.key, u8::from(c.in_category));
        }
        out
    }
}
