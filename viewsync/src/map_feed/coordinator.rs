//! Map/feed coordinator: public operations and the timer driver.
//!
//! State updates happen synchronously under a mutex; the only asynchronous
//! piece is a single driver task that sleeps until the pipeline's next
//! stage deadline and dispatches settled-bounds events. The driver holds a
//! [`CancellationToken`] that is cancelled when the coordinator is dropped,
//! so no pipeline timer can fire into a torn-down consumer.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::coord::{GeoPoint, ListingId, MapBounds};

use super::config::MapFeedConfig;
use super::pipeline::BoundsPipeline;
use super::registry::{ElementRegistry, ScrollTarget};
use super::selection::SelectionState;

/// Imperative handle onto the spatial map view.
///
/// Implemented by the map widget wrapper. Calls are fire-and-forget UI
/// requests; the coordinator never waits on them.
pub trait MapViewport: Send + Sync {
    /// Pan the map to a location, optionally raising the zoom level.
    fn pan_to(&self, location: GeoPoint, zoom: Option<f64>);

    /// Current zoom level of the map.
    fn zoom(&self) -> f64;
}

/// Callbacks the coordinator fires toward its consumer.
///
/// Each method is invoked exactly once per genuine state transition:
/// `bounds_settled` only when the settled bounds actually change value,
/// `selection_changed` once per select operation.
pub trait MapFeedEvents: Send + Sync {
    /// Map movement has stopped long enough to justify a data fetch.
    fn bounds_settled(&self, bounds: MapBounds);

    /// A listing was selected (from either view).
    fn selection_changed(&self, id: ListingId);
}

/// Per-instance mutable state, shared with the driver task.
struct Inner {
    pipeline: BoundsPipeline,
    selection: SelectionState,
    registry: ElementRegistry,
}

/// Coordinates a spatial map view and a linear feed view.
///
/// See the [module docs](super) for the event flow. All operations take
/// `&self` and return immediately; rate-limited work is completed by the
/// internal driver task.
pub struct MapFeedCoordinator {
    config: MapFeedConfig,
    inner: Arc<Mutex<Inner>>,
    viewport: Arc<dyn MapViewport>,
    events: Arc<dyn MapFeedEvents>,
    /// Wakes the driver when the pipeline's next deadline changes.
    wake: Arc<Notify>,
    shutdown: CancellationToken,
}

impl MapFeedCoordinator {
    /// Create a coordinator and spawn its timer driver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: MapFeedConfig,
        viewport: Arc<dyn MapViewport>,
        events: Arc<dyn MapFeedEvents>,
    ) -> Self {
        let inner = Arc::new(Mutex::new(Inner {
            pipeline: BoundsPipeline::new(&config),
            selection: SelectionState::new(),
            registry: ElementRegistry::new(),
        }));
        let wake = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(run_driver(
            Arc::clone(&inner),
            Arc::clone(&events),
            Arc::clone(&wake),
            shutdown.clone(),
        ));

        Self {
            config,
            inner,
            viewport,
            events,
            wake,
            shutdown,
        }
    }

    /// Seed the raw bounds when the map becomes ready.
    ///
    /// The first value bypasses rate limiting and dispatches a single
    /// initial `bounds_settled` immediately.
    pub fn report_load(&self, bounds: MapBounds) {
        let seeded = self.inner.lock().pipeline.seed(bounds, Instant::now());
        info!(bounds = %seeded, "map loaded, seeding bounds");
        self.events.bounds_settled(seeded);
        self.wake.notify_one();
    }

    /// Report a map movement tick (potentially 60/sec).
    ///
    /// Updates raw bounds state only; fetches are triggered by the settled
    /// event after movement stops.
    pub fn report_pan(&self, bounds: MapBounds) {
        self.inner.lock().pipeline.submit(bounds, Instant::now());
        self.wake.notify_one();
    }

    /// Select a listing from the feed.
    ///
    /// Pans the map to the listing's location, raising the zoom to the
    /// configured threshold when the map is zoomed out below it, and fires
    /// `selection_changed` exactly once regardless of prior selection.
    pub fn select_from_list(&self, id: ListingId, location: GeoPoint) {
        self.inner.lock().selection.select(id);

        let zoom = if self.viewport.zoom() < self.config.select_zoom_threshold {
            Some(self.config.select_zoom_threshold)
        } else {
            None
        };
        debug!(%id, %location, ?zoom, "feed selection, panning map");
        self.viewport.pan_to(location, zoom);
        self.events.selection_changed(id);
    }

    /// Select a listing from a map marker.
    ///
    /// Scrolls the corresponding feed element into view when it is
    /// registered and still alive (best effort — a missing element does
    /// not suppress the selection), and fires `selection_changed` exactly
    /// once.
    pub fn select_from_map(&self, id: ListingId) {
        let target = {
            let mut inner = self.inner.lock();
            inner.selection.select(id);
            inner.registry.lookup(id)
        };

        match target {
            Some(element) => element.scroll_into_view(),
            None => debug!(%id, "no live feed element for selection, skipping scroll"),
        }
        self.events.selection_changed(id);
    }

    /// Update the hovered listing. No callback fires.
    pub fn hover(&self, id: Option<ListingId>) {
        self.inner.lock().selection.hover(id);
    }

    /// Clear the selection. Idempotent; no callback fires.
    pub fn clear_selection(&self) {
        self.inner.lock().selection.clear();
    }

    /// Register or remove a feed element for scroll-into-view lookups.
    ///
    /// Called on list-item mount (`Some`) and unmount (`None`).
    pub fn register_element(&self, id: ListingId, element: Option<Weak<dyn ScrollTarget>>) {
        self.inner.lock().registry.register(id, element);
    }

    /// Currently selected listing, if any.
    pub fn selected_id(&self) -> Option<ListingId> {
        self.inner.lock().selection.selected()
    }

    /// Currently hovered listing, if any.
    pub fn hovered_id(&self) -> Option<ListingId> {
        self.inner.lock().selection.hovered()
    }

    /// Last settled bounds, if the map has produced any.
    pub fn settled_bounds(&self) -> Option<MapBounds> {
        self.inner.lock().pipeline.settled()
    }

    /// Most recent throttled bounds (fast-but-bounded-rate feedback).
    pub fn throttled_bounds(&self) -> Option<MapBounds> {
        self.inner.lock().pipeline.throttled()
    }
}

impl Drop for MapFeedCoordinator {
    fn drop(&mut self) {
        // Stops the driver and with it every pending pipeline timer.
        self.shutdown.cancel();
    }
}

/// Driver loop: sleep until the next stage deadline, fire it, dispatch.
async fn run_driver(
    inner: Arc<Mutex<Inner>>,
    events: Arc<dyn MapFeedEvents>,
    wake: Arc<Notify>,
    shutdown: CancellationToken,
) {
    loop {
        let deadline = inner.lock().pipeline.next_deadline();
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = wake.notified() => {
                // Deadline may have moved; recompute and go around.
            }
            _ = wait_until(deadline) => {
                let settled = inner.lock().pipeline.advance(Instant::now());
                if let Some(bounds) = settled {
                    debug!(%bounds, "bounds settled");
                    events.bounds_settled(bounds);
                }
            }
        }
    }
    debug!("map/feed driver stopped");
}

/// Sleep until `deadline`, or forever when no timer is armed.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
