//! The theme controller.
//!
//! [`ThemeController`] owns the single current [`ThemePreference`] for a page
//! session. It reconciles the persisted override with the ambient signal,
//! applies the result to a [`Surface`], and broadcasts every commit to its
//! subscribers.
//!
//! # Transitions
//!
//! [`set_preference`](ThemeController::set_preference) returns immediately
//! after adding the transition marker. The rest happens in two deferred steps
//! run by [`run_due`](ThemeController::run_due) or
//! [`advance`](ThemeController::advance):
//!
//! 1. after the commit delay: commit, persist, apply, notify
//! 2. after the transition duration: remove the transition marker
//!
//! Transitions are never cancelled. Overlapping requests race and the last
//! commit wins.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use powersense_theme::{
//!     Document, FixedAmbient, ManualClock, MemoryStore, ThemeController, ThemePreference,
//! };
//!
//! let doc = Document::with_theme_meta("#61d222");
//! let store = MemoryStore::new();
//! let mut controller = ThemeController::builder()
//!     .store(store.clone())
//!     .ambient(FixedAmbient(false))
//!     .surface(doc.clone())
//!     .clock(ManualClock::new())
//!     .build();
//!
//! assert_eq!(controller.current_preference(), ThemePreference::Light);
//!
//! controller.set_preference(ThemePreference::Dark);
//! controller.advance(Duration::from_millis(310));
//!
//! assert!(controller.is_dark());
//! assert_eq!(store.raw("PowerSense-dark-mode").as_deref(), Some("true"));
//! assert!(doc.has_class("dark-mode"));
//! assert_eq!(doc.theme_color().as_deref(), Some("#377519"));
//! ```

mod builder;
mod subscribe;

pub use builder::ThemeControllerBuilder;
pub use subscribe::{PreferenceStream, Subscription};

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ambient::AmbientSignal;
use crate::config::ThemeConfig;
use crate::preference::ThemePreference;
use crate::storage::{read_override, write_override, PreferenceStore};
use crate::surface::{apply_preference, transition_stylesheet, Surface};
use crate::timer::{Clock, TimerQueue};

use subscribe::Listeners;

/// Which precedence level governs the preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// An override is persisted; ambient changes are ignored.
    Override,
    /// No override; ambient changes are followed.
    Ambient,
    /// Inert controller, fixed to light.
    Default,
}

impl PreferenceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceSource::Override => "stored override",
            PreferenceSource::Ambient => "ambient",
            PreferenceSource::Default => "default",
        }
    }
}

impl fmt::Display for PreferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deferred step of a preference transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionStep {
    Commit(ThemePreference),
    EndTransition,
}

/// Owner of the dark/light preference for one page session.
///
/// Construct one per session with [`ThemeController::builder`] and hand out
/// references to the UI code that needs it.
pub struct ThemeController {
    config: ThemeConfig,
    store: Box<dyn PreferenceStore>,
    ambient: Box<dyn AmbientSignal>,
    surface: Box<dyn Surface>,
    clock: Box<dyn Clock>,
    current: ThemePreference,
    last_ambient: Option<bool>,
    inert: bool,
    listeners: Listeners,
    steps: TimerQueue<TransitionStep>,
}

impl ThemeController {
    pub fn builder() -> ThemeControllerBuilder {
        ThemeControllerBuilder::new()
    }

    pub(crate) fn new(
        config: ThemeConfig,
        store: Box<dyn PreferenceStore>,
        ambient: Box<dyn AmbientSignal>,
        surface: Box<dyn Surface>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut controller = Self {
            config,
            store,
            ambient,
            surface,
            clock,
            current: ThemePreference::Light,
            last_ambient: None,
            inert: false,
            listeners: Listeners::default(),
            steps: TimerQueue::new(),
        };
        controller.initialize();
        controller
    }

    fn initialize(&mut self) {
        let Some(prefers_dark) = self.ambient.prefers_dark() else {
            debug!("no ambient color-scheme signal, theme controller is inert");
            self.inert = true;
            return;
        };

        let stored = read_override(self.store.as_ref(), &self.config.storage_key);
        let initial = stored.unwrap_or_else(|| ThemePreference::from_dark(prefers_dark));

        self.current = initial;
        self.last_ambient = Some(prefers_dark);
        apply_preference(self.surface.as_mut(), &self.config, initial);

        match transition_stylesheet(&self.config) {
            Ok(css) => self.surface.install_stylesheet(&css),
            Err(error) => warn!(%error, "failed to render theme transition stylesheet"),
        }

        debug!(
            preference = %initial,
            prefers_dark,
            overridden = stored.is_some(),
            "theme controller initialized"
        );
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn current_preference(&self) -> ThemePreference {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current.is_dark()
    }

    /// The theme-color hint matching the current preference.
    pub fn theme_color(&self) -> &str {
        self.config.theme_color(self.current)
    }

    /// True when there was no ambient signal at construction; every mutating
    /// operation is then a no-op and the preference stays light.
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Registers `listener`, calling it at once with the current value and
    /// then after every commit.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(ThemePreference) + 'static,
    {
        self.listeners.register(Box::new(listener), self.current)
    }

    /// Like [`subscribe`](Self::subscribe), buffering values for iteration.
    pub fn stream(&mut self) -> PreferenceStream {
        PreferenceStream::attach(&mut self.listeners, self.current)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.active()
    }

    /// Requests a transition to `pref`.
    ///
    /// Adds the transition marker now and schedules the commit. Storage
    /// failures during the commit are logged and otherwise ignored.
    pub fn set_preference(&mut self, pref: ThemePreference) {
        if self.inert {
            return;
        }
        self.surface.add_class(&self.config.transition_class);
        let due = self.clock.now() + self.config.commit_delay();
        self.steps.schedule(due, TransitionStep::Commit(pref));
        debug!(preference = %pref, "theme transition requested");
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.set_preference(ThemePreference::from_dark(dark));
    }

    /// Requests the opposite of the committed preference.
    pub fn toggle(&mut self) {
        self.set_preference(self.current.toggled());
    }

    /// Re-applies the persisted override, if there is one.
    pub fn initialize_from_storage(&mut self) {
        if self.inert {
            return;
        }
        if let Some(stored) = read_override(self.store.as_ref(), &self.config.storage_key) {
            self.set_preference(stored);
        }
    }

    /// Reacts to an ambient change. Ignored while an override is persisted.
    pub fn handle_ambient_change(&mut self, prefers_dark: bool) {
        if self.inert {
            return;
        }
        self.last_ambient = Some(prefers_dark);
        if read_override(self.store.as_ref(), &self.config.storage_key).is_some() {
            debug!(prefers_dark, "ambient change ignored, override persisted");
            return;
        }
        self.set_preference(ThemePreference::from_dark(prefers_dark));
    }

    /// Re-reads the ambient signal and handles it if it changed since the
    /// last observation. Returns whether a change was seen.
    pub fn poll_ambient(&mut self) -> bool {
        if self.inert {
            return false;
        }
        match self.ambient.prefers_dark() {
            Some(prefers_dark) if self.last_ambient != Some(prefers_dark) => {
                self.handle_ambient_change(prefers_dark);
                true
            }
            _ => false,
        }
    }

    /// Forgets the persisted override so ambient changes apply again. The
    /// current preference is left as is.
    pub fn clear_override(&mut self) {
        if self.inert {
            return;
        }
        if let Err(error) = self.store.remove(&self.config.storage_key) {
            warn!(%error, key = %self.config.storage_key, "failed to clear theme override");
        }
    }

    /// Returns the persisted override, if any.
    pub fn persisted_override(&self) -> Option<ThemePreference> {
        if self.inert {
            return None;
        }
        read_override(self.store.as_ref(), &self.config.storage_key)
    }

    pub fn preference_source(&self) -> PreferenceSource {
        if self.inert {
            PreferenceSource::Default
        } else if self.persisted_override().is_some() {
            PreferenceSource::Override
        } else {
            PreferenceSource::Ambient
        }
    }

    /// Runs every step due at the clock's current time. Returns how many ran.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut ran = 0;
        while let Some((due, step)) = self.steps.pop_due(now) {
            self.run_step(due, step);
            ran += 1;
        }
        ran
    }

    /// Moves a controllable clock forward by `elapsed`, then runs due steps.
    /// On a clock that cannot be moved this is just [`run_due`](Self::run_due).
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.clock.advance(elapsed);
        self.run_due()
    }

    /// Runs every pending step, including ones not yet due, in order.
    pub fn flush(&mut self) -> usize {
        let mut ran = 0;
        while let Some((due, step)) = self.steps.pop_next() {
            self.run_step(due, step);
            ran += 1;
        }
        ran
    }

    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    /// When the next deferred step is due, on the controller's clock.
    pub fn next_due(&self) -> Option<Duration> {
        self.steps.next_due()
    }

    pub fn is_transitioning(&self) -> bool {
        !self.inert && self.surface.has_class(&self.config.transition_class)
    }

    fn run_step(&mut self, due: Duration, step: TransitionStep) {
        match step {
            TransitionStep::Commit(pref) => {
                self.current = pref;
                if let Err(error) =
                    write_override(self.store.as_mut(), &self.config.storage_key, pref)
                {
                    warn!(%error, key = %self.config.storage_key, "failed to persist theme preference");
                }
                apply_preference(self.surface.as_mut(), &self.config, pref);
                self.listeners.notify(pref);
                self.steps.schedule(
                    due + self.config.transition_duration(),
                    TransitionStep::EndTransition,
                );
                debug!(preference = %pref, "theme preference committed");
            }
            TransitionStep::EndTransition => {
                self.surface.remove_class(&self.config.transition_class);
            }
        }
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("config", &self.config)
            .field("current", &self.current)
            .field("last_ambient", &self.last_ambient)
            .field("inert", &self.inert)
            .field("listeners", &self.listeners)
            .field("pending_steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}
