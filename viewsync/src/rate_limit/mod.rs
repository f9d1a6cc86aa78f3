//! Rate-limiting primitives (throttle and debounce).
//!
//! Both primitives are pure state machines driven by caller-supplied
//! timestamps: the caller submits inputs with `now`, asks for the next
//! pending deadline, and polls when that deadline passes. Actual timer
//! scheduling lives with the owner (see `map_feed::coordinator`), which
//! keeps the primitives deterministic under a test clock and guarantees
//! pending work dies with its owner.
//!
//! # Disciplines
//!
//! - **Throttle**: at most one emission per interval. The first input of a
//!   burst passes through immediately (leading edge); later inputs within
//!   the window replace a single pending trailing emission, so the final
//!   value of a burst is never dropped.
//! - **Debounce**: emission only after a full quiet period, carrying the
//!   most recent input.
//!
//! Neither primitive can fail — they only store, replace, and release
//! values.

mod debounce;
mod throttle;

pub use debounce::Debounce;
pub use throttle::Throttle;
