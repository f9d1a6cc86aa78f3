//! Weak registry of feed elements for scroll-into-view lookups.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::coord::ListingId;

/// A feed element that can be scrolled into view.
///
/// Implemented by the feed's list-item wrappers. The contract is a smooth
/// scroll that centers the element in the visible list area.
pub trait ScrollTarget: Send + Sync {
    /// Scroll this element into view (smooth, centered).
    fn scroll_into_view(&self);
}

/// Mapping from listing id to a weakly-held feed element.
///
/// Entries are added when a list item mounts and removed when it unmounts.
/// The registry holds [`Weak`] references only, so it never keeps an
/// element alive past its owner; a lookup of a dead entry prunes it and
/// behaves like a missing entry.
#[derive(Default)]
pub struct ElementRegistry {
    entries: HashMap<ListingId, Weak<dyn ScrollTarget>>,
}

impl ElementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element for a listing, replacing any existing entry.
    ///
    /// Passing `None` removes the entry (unmount cleanup). Removing a
    /// missing entry is a no-op.
    pub fn register(&mut self, id: ListingId, element: Option<Weak<dyn ScrollTarget>>) {
        match element {
            Some(element) => {
                self.entries.insert(id, element);
            }
            None => {
                self.entries.remove(&id);
            }
        }
    }

    /// Look up the live element for a listing.
    ///
    /// Returns `None` for missing entries and for entries whose element has
    /// been dropped; dead entries are pruned on the way.
    pub fn lookup(&mut self, id: ListingId) -> Option<Arc<dyn ScrollTarget>> {
        match self.entries.get(&id) {
            Some(weak) => match weak.upgrade() {
                Some(strong) => Some(strong),
                None => {
                    self.entries.remove(&id);
                    None
                }
            },
            None => None,
        }
    }

    /// Number of registered entries (live or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
