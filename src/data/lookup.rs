//! Label translation for presentation layers.
//!
//! Translation tables are injected by whoever renders the data. The pipeline
//! never consults them.

use std::collections::HashMap;

/// Translate a key for display, falling back to the key itself.
pub trait Lookup {
    fn translate<'a>(&'a self, key: &'a str) -> &'a str;
}

/// A [`Lookup`] backed by a plain map.
#[derive(Debug, Clone, Default)]
pub struct MapLookup {
    entries: HashMap<String, String>,
}

impl MapLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapLookup {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl Lookup for MapLookup {
    fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }
}

/// Identity lookup: every key translates to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Lookup for NoTranslation {
    fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup_falls_back_to_key() {
        let lookup: MapLookup = [("Drama", "Drama"), ("Action", "Ação")].into_iter().collect();
        assert_eq!(lookup.translate("Action"), "Ação");
        assert_eq!(lookup.translate("Horror"), "Horror");
        assert_eq!(NoTranslation.translate("Horror"), "Horror");
    }
}
