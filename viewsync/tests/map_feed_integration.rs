//! Integration tests for the map/feed coordinator.
//!
//! These tests verify the complete flow under a paused tokio clock:
//! - pan ticks → throttle → debounce → bounds_settled timing
//! - selection choreography between map and feed
//! - teardown cancelling pending timers
//!
//! Run with: `cargo test --test map_feed_integration`

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use viewsync::coord::{GeoPoint, ListingId, MapBounds};
use viewsync::map_feed::{
    MapFeedConfig, MapFeedCoordinator, MapFeedEvents, MapViewport, ScrollTarget,
};

// ============================================================================
// Helper Types
// ============================================================================

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn bounds(offset: f64) -> MapBounds {
    MapBounds::new(54.0 + offset, 53.0 + offset, 11.0, 9.0)
}

/// Map stub recording pan requests and serving a fixed zoom level.
struct RecordingViewport {
    zoom: Mutex<f64>,
    pans: Mutex<Vec<(GeoPoint, Option<f64>)>>,
}

impl RecordingViewport {
    fn new(zoom: f64) -> Arc<Self> {
        Arc::new(Self {
            zoom: Mutex::new(zoom),
            pans: Mutex::new(Vec::new()),
        })
    }
}

impl MapViewport for RecordingViewport {
    fn pan_to(&self, location: GeoPoint, zoom: Option<f64>) {
        self.pans.lock().push((location, zoom));
    }

    fn zoom(&self) -> f64 {
        *self.zoom.lock()
    }
}

/// Events sink recording settled bounds (with timestamps) and selections.
#[derive(Default)]
struct RecordingEvents {
    settled: Mutex<Vec<(MapBounds, Instant)>>,
    selections: Mutex<Vec<ListingId>>,
}

impl MapFeedEvents for RecordingEvents {
    fn bounds_settled(&self, bounds: MapBounds) {
        self.settled.lock().push((bounds, Instant::now()));
    }

    fn selection_changed(&self, id: ListingId) {
        self.selections.lock().push(id);
    }
}

/// Feed element stub counting scroll requests.
#[derive(Default)]
struct RecordingElement {
    scrolls: Mutex<usize>,
}

impl ScrollTarget for RecordingElement {
    fn scroll_into_view(&self) {
        *self.scrolls.lock() += 1;
    }
}

fn coordinator_with(
    zoom: f64,
) -> (MapFeedCoordinator, Arc<RecordingViewport>, Arc<RecordingEvents>) {
    let viewport = RecordingViewport::new(zoom);
    let events = Arc::new(RecordingEvents::default());
    let coordinator = MapFeedCoordinator::new(
        MapFeedConfig::default(),
        Arc::clone(&viewport) as Arc<dyn MapViewport>,
        Arc::clone(&events) as Arc<dyn MapFeedEvents>,
    );
    (coordinator, viewport, events)
}

// ============================================================================
// Bounds Pipeline Timing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn single_pan_settles_exactly_once_within_window() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);
    let start = Instant::now();

    coordinator.report_pan(bounds(0.0));
    tokio::time::sleep(ms(700)).await;

    let settled = events.settled.lock();
    assert_eq!(settled.len(), 1, "expected exactly one settled event");
    assert_eq!(settled[0].0, bounds(0.0));
    let elapsed = settled[0].1 - start;
    assert!(
        elapsed >= ms(250) && elapsed <= ms(650),
        "settled after {:?}, expected within 250..650ms",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn pan_burst_settles_once_with_latest_bounds() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);

    coordinator.report_pan(bounds(0.0));
    tokio::time::sleep(ms(100)).await;
    coordinator.report_pan(bounds(0.1));
    tokio::time::sleep(ms(100)).await;
    coordinator.report_pan(bounds(0.2));
    let last_tick = Instant::now();

    tokio::time::sleep(ms(1000)).await;

    let settled = events.settled.lock();
    assert_eq!(settled.len(), 1, "expected exactly one settled event");
    assert_eq!(settled[0].0, bounds(0.2), "latest bounds must win");
    let elapsed = settled[0].1 - last_tick;
    assert!(
        elapsed >= ms(250) && elapsed <= ms(550),
        "settled {:?} after the last tick, expected within 250..550ms",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn continuous_dragging_defers_settling() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);

    // 60/sec ticks for two seconds
    for i in 0..120 {
        coordinator.report_pan(bounds(i as f64 * 0.01));
        tokio::time::sleep(ms(16)).await;
    }
    assert!(
        events.settled.lock().is_empty(),
        "no settled event while dragging"
    );

    tokio::time::sleep(ms(1000)).await;
    let settled = events.settled.lock();
    assert_eq!(settled.len(), 1, "exactly one settled event after the drag");
    assert_eq!(settled[0].0, bounds(119.0 * 0.01));
}

#[tokio::test(start_paused = true)]
async fn report_load_seeds_and_fires_initial_settled() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);

    coordinator.report_load(bounds(0.0));
    assert_eq!(events.settled.lock().len(), 1);
    assert_eq!(coordinator.settled_bounds(), Some(bounds(0.0)));

    // No movement: nothing further happens
    tokio::time::sleep(ms(2000)).await;
    assert_eq!(events.settled.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn settling_back_on_seeded_bounds_is_suppressed() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);

    coordinator.report_load(bounds(0.0));
    tokio::time::sleep(ms(300)).await;

    // Pan away and back to exactly the seeded bounds
    coordinator.report_pan(bounds(0.0));
    tokio::time::sleep(ms(2000)).await;

    let settled = events.settled.lock();
    assert_eq!(settled.len(), 1, "identical bounds must not re-fire");
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_timers() {
    let (coordinator, _viewport, events) = coordinator_with(14.0);

    coordinator.report_pan(bounds(0.0));
    drop(coordinator);

    tokio::time::sleep(ms(2000)).await;
    assert!(
        events.settled.lock().is_empty(),
        "no settled event may fire after teardown"
    );
}

// ============================================================================
// Selection Choreography
// ============================================================================

#[tokio::test(start_paused = true)]
async fn select_from_list_pans_and_fires_selection() {
    let (coordinator, viewport, events) = coordinator_with(16.0);
    let location = GeoPoint::new(53.55, 9.99);

    coordinator.select_from_list(ListingId(42), location);

    assert_eq!(&*events.selections.lock(), &[ListingId(42)]);
    let pans = viewport.pans.lock();
    assert_eq!(pans.len(), 1);
    assert_eq!(pans[0].0, location);
    // Already zoomed in past the threshold: no zoom change requested
    assert_eq!(pans[0].1, None);
    assert_eq!(coordinator.selected_id(), Some(ListingId(42)));
}

#[tokio::test(start_paused = true)]
async fn select_from_list_raises_zoom_below_threshold() {
    let (coordinator, viewport, _events) = coordinator_with(10.0);

    coordinator.select_from_list(ListingId(7), GeoPoint::new(53.55, 9.99));

    let pans = viewport.pans.lock();
    assert_eq!(pans[0].1, Some(15.0));
}

#[tokio::test(start_paused = true)]
async fn select_from_list_fires_even_when_reselecting() {
    let (coordinator, _viewport, events) = coordinator_with(16.0);
    let location = GeoPoint::new(53.55, 9.99);

    coordinator.select_from_list(ListingId(42), location);
    coordinator.select_from_list(ListingId(42), location);

    assert_eq!(
        &*events.selections.lock(),
        &[ListingId(42), ListingId(42)],
        "one callback per call, regardless of prior selection"
    );
}

#[tokio::test(start_paused = true)]
async fn select_from_map_scrolls_registered_element() {
    let (coordinator, _viewport, events) = coordinator_with(16.0);
    let element = Arc::new(RecordingElement::default());
    coordinator.register_element(
        ListingId(3),
        Some(Arc::downgrade(&element) as std::sync::Weak<dyn ScrollTarget>),
    );

    coordinator.select_from_map(ListingId(3));

    assert_eq!(*element.scrolls.lock(), 1);
    assert_eq!(&*events.selections.lock(), &[ListingId(3)]);
}

#[tokio::test(start_paused = true)]
async fn select_from_map_without_element_still_selects() {
    let (coordinator, _viewport, events) = coordinator_with(16.0);

    // Never registered
    coordinator.select_from_map(ListingId(9));
    assert_eq!(&*events.selections.lock(), &[ListingId(9)]);
    assert_eq!(coordinator.selected_id(), Some(ListingId(9)));
}

#[tokio::test(start_paused = true)]
async fn unregistered_element_is_skipped_without_error() {
    let (coordinator, _viewport, events) = coordinator_with(16.0);
    let element = Arc::new(RecordingElement::default());
    coordinator.register_element(
        ListingId(3),
        Some(Arc::downgrade(&element) as std::sync::Weak<dyn ScrollTarget>),
    );
    coordinator.register_element(ListingId(3), None);

    coordinator.select_from_map(ListingId(3));

    assert_eq!(*element.scrolls.lock(), 0, "scroll is best-effort only");
    assert_eq!(&*events.selections.lock(), &[ListingId(3)]);
}

#[tokio::test(start_paused = true)]
async fn hover_and_clear_do_not_fire_callbacks() {
    let (coordinator, _viewport, events) = coordinator_with(16.0);

    coordinator.select_from_map(ListingId(1));
    coordinator.hover(Some(ListingId(2)));
    assert_eq!(coordinator.hovered_id(), Some(ListingId(2)));
    assert_eq!(coordinator.selected_id(), Some(ListingId(1)));

    coordinator.clear_selection();
    coordinator.clear_selection(); // idempotent
    assert_eq!(coordinator.selected_id(), None);
    assert_eq!(coordinator.hovered_id(), Some(ListingId(2)));

    // Only the initial selection fired a callback
    assert_eq!(events.selections.lock().len(), 1);
}
