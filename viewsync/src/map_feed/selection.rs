//! Selection and hover state shared between the map and the feed.

use crate::coord::ListingId;

/// Current selection/hover state.
///
/// At most one listing is selected at a time. Hover is independent of
/// selection: hovering never clears or replaces the selected listing, and
/// selection persists until explicitly cleared or replaced.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<ListingId>,
    hovered: Option<ListingId>,
}

impl SelectionState {
    /// Create an empty selection state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a listing, replacing any previous selection.
    pub fn select(&mut self, id: ListingId) {
        self.selected = Some(id);
    }

    /// Clear the selection. Calling this with nothing selected is a no-op.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Update the hovered listing (`None` = nothing hovered).
    pub fn hover(&mut self, id: Option<ListingId>) {
        self.hovered = id;
    }

    /// Currently selected listing, if any.
    pub fn selected(&self) -> Option<ListingId> {
        self.selected
    }

    /// Currently hovered listing, if any.
    pub fn hovered(&self) -> Option<ListingId> {
        self.hovered
    }
}
