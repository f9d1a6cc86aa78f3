//! Bidirectional map/feed synchronization.
//!
//! This module keeps a spatial map view and a linear feed of listings
//! mutually consistent: continuous map movement is rate limited into a
//! single "bounds settled" event suitable for triggering a fetch, and
//! selection flows both ways (feed entry → pan the map, map marker →
//! scroll the feed).
//!
//! # Architecture
//!
//! ```text
//! report_pan ──► Throttle(250ms) ──► Debounce(300ms) ──► bounds_settled
//!
//! select_from_list ──► pan_to / zoom raise ──► selection_changed
//! select_from_map  ──► scroll_into_view    ──► selection_changed
//! ```
//!
//! The map and the feed are external collaborators reached only through
//! the [`MapViewport`] and [`MapFeedEvents`] interfaces; the coordinator
//! never touches rendering.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use viewsync::coord::{GeoPoint, MapBounds, ListingId};
//! use viewsync::map_feed::{MapFeedConfig, MapFeedCoordinator};
//!
//! let coordinator = MapFeedCoordinator::new(MapFeedConfig::default(), viewport, events);
//! coordinator.report_load(MapBounds::new(54.0, 53.0, 11.0, 9.0));
//! coordinator.select_from_list(ListingId(42), GeoPoint::new(53.55, 9.99));
//! ```

mod config;
mod coordinator;
mod pipeline;
mod registry;
mod selection;

pub use config::{
    MapFeedConfig, DEFAULT_DEBOUNCE_DELAY, DEFAULT_SELECT_ZOOM_THRESHOLD,
    DEFAULT_THROTTLE_INTERVAL,
};
pub use coordinator::{MapFeedCoordinator, MapFeedEvents, MapViewport};
pub use pipeline::BoundsPipeline;
pub use registry::{ElementRegistry, ScrollTarget};
pub use selection::SelectionState;
