//! Event type filter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::event::EventType;

/// Set of event types to show. An empty filter shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeFilter {
    types: BTreeSet<EventType>,
}

impl TypeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn matches(&self, event_type: &EventType) -> bool {
        self.types.is_empty() || self.types.contains(event_type)
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.types.contains(event_type)
    }

    /// Add the type if absent, remove it if present.
    pub fn toggle(&mut self, event_type: EventType) {
        if !self.types.remove(&event_type) {
            self.types.insert(event_type);
        }
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventType> {
        self.types.iter()
    }
}

impl<T: Into<EventType>> FromIterator<T> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        TypeFilter {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}
