//! Two-level keyed collection.
//!
//! Elements are addressed by a resolution tag (e.g. a sensor name such as
//! `"L8"` or `"MODIS"`) and an integer date. Both levels are ordered maps, so
//! iteration and the `get_any*` lookups are deterministic: tags sort
//! lexicographically, dates numerically.
//!
//! A tag is present if and only if it has at least one element. Removals
//! prune tags that become empty.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use fusion_common::{FusionError, FusionResult};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

/// A collection of `T` keyed by (tag, date).
///
/// Serializes as a map of tags to maps of dates. Deserializing drops tags
/// without elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyedStore<T> {
    collection: BTreeMap<String, BTreeMap<i32, T>>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyedStore<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut collection = BTreeMap::<String, BTreeMap<i32, T>>::deserialize(deserializer)?;
        collection.retain(|_, dates| !dates.is_empty());
        Ok(Self { collection })
    }
}

impl<T> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            collection: BTreeMap::new(),
        }
    }
}

impl<T> KeyedStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Presence
    // ------------------------------------------------------------------

    /// Check if an element exists at exactly (tag, date).
    pub fn has(&self, tag: &str, date: i32) -> bool {
        self.collection
            .get(tag)
            .is_some_and(|dates| dates.contains_key(&date))
    }

    /// Check if any element exists under `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.collection.contains_key(tag)
    }

    /// Check if any element exists at `date`, under any tag.
    pub fn has_date(&self, date: i32) -> bool {
        self.collection
            .values()
            .any(|dates| dates.contains_key(&date))
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Get the element at (tag, date).
    pub fn get(&self, tag: &str, date: i32) -> FusionResult<&T> {
        self.collection
            .get(tag)
            .and_then(|dates| dates.get(&date))
            .ok_or_else(|| FusionError::not_found_pair(tag, date))
    }

    /// Get the element at (tag, date) mutably.
    pub fn get_mut(&mut self, tag: &str, date: i32) -> FusionResult<&mut T> {
        self.collection
            .get_mut(tag)
            .and_then(|dates| dates.get_mut(&date))
            .ok_or_else(|| FusionError::not_found_pair(tag, date))
    }

    /// Get the element at `date` under the first tag (in key order) that has one.
    pub fn get_any_at_date(&self, date: i32) -> FusionResult<&T> {
        self.collection
            .values()
            .find_map(|dates| dates.get(&date))
            .ok_or_else(|| FusionError::not_found_date(date))
    }

    /// Mutable counterpart of [`get_any_at_date`](Self::get_any_at_date).
    pub fn get_any_at_date_mut(&mut self, date: i32) -> FusionResult<&mut T> {
        self.collection
            .values_mut()
            .find_map(|dates| dates.get_mut(&date))
            .ok_or_else(|| FusionError::not_found_date(date))
    }

    /// Get the element with the earliest date under `tag`.
    pub fn get_any_with_tag(&self, tag: &str) -> FusionResult<&T> {
        self.collection
            .get(tag)
            .and_then(|dates| dates.values().next())
            .ok_or_else(|| FusionError::not_found_tag(tag))
    }

    /// Mutable counterpart of [`get_any_with_tag`](Self::get_any_with_tag).
    pub fn get_any_with_tag_mut(&mut self, tag: &str) -> FusionResult<&mut T> {
        self.collection
            .get_mut(tag)
            .and_then(|dates| dates.values_mut().next())
            .ok_or_else(|| FusionError::not_found_tag(tag))
    }

    /// Get the element at the first tag and its earliest date.
    pub fn get_any(&self) -> FusionResult<&T> {
        self.collection
            .values()
            .next()
            .and_then(|dates| dates.values().next())
            .ok_or_else(FusionError::empty_store)
    }

    /// Mutable counterpart of [`get_any`](Self::get_any).
    pub fn get_any_mut(&mut self) -> FusionResult<&mut T> {
        self.collection
            .values_mut()
            .next()
            .and_then(|dates| dates.values_mut().next())
            .ok_or_else(FusionError::empty_store)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Insert or replace the element at (tag, date).
    ///
    /// Returns a reference to the stored element.
    pub fn set(&mut self, tag: impl Into<String>, date: i32, value: T) -> &mut T {
        let dates = self.collection.entry(tag.into()).or_default();
        match dates.entry(date) {
            Entry::Occupied(mut slot) => {
                slot.insert(value);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(value),
        }
    }

    /// Remove the element at (tag, date) and return it.
    ///
    /// The tag itself is removed when this was its last element.
    pub fn remove(&mut self, tag: &str, date: i32) -> FusionResult<T> {
        let dates = self
            .collection
            .get_mut(tag)
            .ok_or_else(|| FusionError::not_found_pair(tag, date))?;
        let value = dates
            .remove(&date)
            .ok_or_else(|| FusionError::not_found_pair(tag, date))?;

        if dates.is_empty() {
            self.collection.remove(tag);
            trace!(tag, "pruned empty resolution tag");
        }
        Ok(value)
    }

    /// Remove every element under `tag` and return them by date.
    pub fn remove_tag(&mut self, tag: &str) -> FusionResult<BTreeMap<i32, T>> {
        self.collection
            .remove(tag)
            .ok_or_else(|| FusionError::not_found_tag(tag))
    }

    /// Remove every element at `date`, across all tags.
    ///
    /// Unlike the keyed removals this is a sweep: a date that is not present
    /// is not an error, the result is just empty. Tags left without elements
    /// are pruned.
    pub fn remove_date(&mut self, date: i32) -> Vec<(String, T)> {
        let mut removed = Vec::new();
        self.collection.retain(|tag, dates| {
            if let Some(value) = dates.remove(&date) {
                removed.push((tag.clone(), value));
            }
            !dates.is_empty()
        });

        if !removed.is_empty() {
            trace!(date, removed = removed.len(), "removed date from store");
        }
        removed
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.collection.clear();
    }

    // ------------------------------------------------------------------
    // Key queries
    // ------------------------------------------------------------------

    /// All tags, in key order.
    pub fn resolution_tags(&self) -> Vec<String> {
        self.collection.keys().cloned().collect()
    }

    /// Tags that have an element at `date`, in key order.
    pub fn resolution_tags_at(&self, date: i32) -> Vec<String> {
        self.collection
            .iter()
            .filter(|(_, dates)| dates.contains_key(&date))
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Dates under `tag`, ascending. Empty if the tag is absent.
    pub fn dates(&self, tag: &str) -> Vec<i32> {
        self.collection
            .get(tag)
            .map(|dates| dates.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Union of the dates of all tags.
    pub fn all_dates(&self) -> BTreeSet<i32> {
        self.collection
            .values()
            .flat_map(|dates| dates.keys().copied())
            .collect()
    }

    // ------------------------------------------------------------------
    // Sizes
    // ------------------------------------------------------------------

    pub fn count_resolution_tags(&self) -> usize {
        self.collection.len()
    }

    /// Total number of elements.
    pub fn count(&self) -> usize {
        self.collection.values().map(BTreeMap::len).sum()
    }

    /// Number of elements under `tag`.
    pub fn count_tag(&self, tag: &str) -> usize {
        self.collection.get(tag).map_or(0, BTreeMap::len)
    }

    /// Number of elements at `date`. Scans every tag.
    pub fn count_date(&self, date: i32) -> usize {
        self.collection
            .values()
            .filter(|dates| dates.contains_key(&date))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// Iterate over `(tag, date, element)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32, &T)> + '_ {
        self.collection.iter().flat_map(|(tag, dates)| {
            dates
                .iter()
                .map(move |(date, value)| (tag.as_str(), *date, value))
        })
    }

    /// Iterate over `(tag, date, element)` in key order with mutable elements.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, i32, &mut T)> + '_ {
        self.collection.iter_mut().flat_map(|(tag, dates)| {
            dates
                .iter_mut()
                .map(move |(date, value)| (tag.as_str(), *date, value))
        })
    }

    /// Build a store with the same keys and transformed elements.
    ///
    /// The key structure of the result is new; nothing is shared with `self`
    /// beyond what `f` itself shares.
    pub fn map_values<U>(&self, mut f: impl FnMut(&T) -> U) -> KeyedStore<U> {
        let collection = self
            .collection
            .iter()
            .map(|(tag, dates)| {
                let mapped: BTreeMap<i32, U> =
                    dates.iter().map(|(date, value)| (*date, f(value))).collect();
                (tag.clone(), mapped)
            })
            .collect();
        KeyedStore { collection }
    }
}

impl<T, S: Into<String>> FromIterator<(S, i32, T)> for KeyedStore<T> {
    fn from_iter<I: IntoIterator<Item = (S, i32, T)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<T, S: Into<String>> Extend<(S, i32, T)> for KeyedStore<T> {
    fn extend<I: IntoIterator<Item = (S, i32, T)>>(&mut self, iter: I) {
        for (tag, date, value) in iter {
            self.set(tag, date, value);
        }
    }
}
