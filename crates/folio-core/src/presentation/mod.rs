//! Display state for the public showcase page, as explicit state machines.
//!
//! Nothing here touches a terminal or a clock directly. Callers feed in
//! events, scroll offsets and `Instant`s, and read back what should be
//! shown and when the next update is due.
//!
//! - `typewriter`: rotating phrases typed and deleted on a fixed cadence
//! - `nav`: active section, navbar and back-to-top state from scroll offset
//! - `menu`: collapsible navigation menu and keyboard shortcuts
//! - `visibility`: viewport intersection, lazy images and fade-in reveal
//! - `rate_limit`: debounce and throttle
//! - `toast`: short-lived notifications
//! - `footer`: copyright year stamping

pub mod footer;
pub mod menu;
pub mod nav;
pub mod rate_limit;
pub mod toast;
pub mod typewriter;
pub mod visibility;

pub use footer::stamp_year;
pub use menu::{keyboard_action, Key, KeyAction, MenuEvent, MobileMenu};
pub use nav::{scroll_progress, NavLayout, ScrollMetrics, Section};
pub use rate_limit::{Debouncer, Throttle};
pub use toast::{Toast, ToastKind, TOAST_DURATION};
pub use typewriter::Typewriter;
pub use visibility::{LazyImage, Reveal, Viewport};
