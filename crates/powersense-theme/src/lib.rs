//! # PowerSense Theme - dark/light preference for the PowerSense site
//!
//! `powersense-theme` owns the site's single theme preference: it picks the
//! initial value from a persisted override or the ambient color scheme,
//! applies it to the page, animates changes, persists them, and tells
//! subscribers.
//!
//! ## Precedence
//!
//! 1. An explicit override persisted under `PowerSense-dark-mode`
//! 2. The ambient `prefers dark` signal
//! 3. Light
//!
//! ## Visual contract
//!
//! The rest of the UI reads the preference only through the surface:
//! the `dark-mode` class on the root container and the theme-color hint
//! (`#377519` dark, `#61d222` light). While a change animates, the root also
//! carries `theme-transition`, which the installed stylesheet turns into a
//! 300ms transition of every visual property.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use powersense_theme::{Document, FixedAmbient, ManualClock, ThemeController};
//!
//! let doc = Document::with_theme_meta("#61d222");
//! let mut theme = ThemeController::builder()
//!     .ambient(FixedAmbient(false))
//!     .surface(doc.clone())
//!     .clock(ManualClock::new())
//!     .build();
//!
//! let mut changes = theme.stream();
//! theme.toggle();
//! theme.advance(Duration::from_millis(10));
//!
//! assert!(doc.has_class("dark-mode"));
//! assert_eq!(changes.by_ref().map(|p| p.is_dark()).collect::<Vec<_>>(), vec![false, true]);
//! ```
//!
//! ## Execution model
//!
//! Single-threaded. The controller never sleeps: it queues deferred steps
//! that the host runs with [`ThemeController::run_due`] (real time) or
//! [`ThemeController::advance`] (a [`ManualClock`]).

mod ambient;
mod config;
mod controller;
mod error;
mod preference;
mod storage;
mod surface;
mod timer;

pub use ambient::{AmbientSignal, FixedAmbient, OsAmbient, SharedAmbient, Unavailable};
pub use config::{
    ThemeConfig, DEFAULT_COMMIT_DELAY_MS, DEFAULT_DARK_CLASS, DEFAULT_DARK_THEME_COLOR,
    DEFAULT_LIGHT_THEME_COLOR, DEFAULT_STORAGE_KEY, DEFAULT_TRANSITION_CLASS,
    DEFAULT_TRANSITION_DURATION_MS,
};
pub use controller::{
    PreferenceSource, PreferenceStream, Subscription, ThemeController, ThemeControllerBuilder,
};
pub use error::{ConfigError, ParsePreferenceError, StorageError};
pub use preference::ThemePreference;
pub use storage::{read_override, write_override, FileStore, MemoryStore, PreferenceStore};
pub use surface::{transition_stylesheet, Document, Surface, SurfaceEvent};
pub use timer::{Clock, ManualClock, SystemClock, TimerQueue};
