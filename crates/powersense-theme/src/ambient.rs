//! Ambient color-scheme signals.
//!
//! The ambient signal is the host environment's own "prefers dark" setting:
//! the `prefers-color-scheme` media feature in a browser, the desktop color
//! mode on an OS. It ranks below a persisted override and above the default.
//!
//! A signal that reports `None` means there is no visual environment to read
//! from (server-side rendering, a headless process). The controller goes
//! inert in that case.

use std::cell::Cell;
use std::rc::Rc;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

/// Source of the ambient "prefers dark" flag.
pub trait AmbientSignal {
    /// Returns the current flag, or `None` when no signal is available.
    fn prefers_dark(&self) -> Option<bool>;
}

impl<T: AmbientSignal + ?Sized> AmbientSignal for Box<T> {
    fn prefers_dark(&self) -> Option<bool> {
        (**self).prefers_dark()
    }
}

/// A signal that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAmbient(pub bool);

impl AmbientSignal for FixedAmbient {
    fn prefers_dark(&self) -> Option<bool> {
        Some(self.0)
    }
}

/// No ambient signal at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unavailable;

impl AmbientSignal for Unavailable {
    fn prefers_dark(&self) -> Option<bool> {
        None
    }
}

/// A settable signal shared between the host and the controller.
///
/// Hosts that receive change notifications push them with [`set`](Self::set)
/// and then call
/// [`ThemeController::poll_ambient`](crate::ThemeController::poll_ambient).
#[derive(Debug, Clone, Default)]
pub struct SharedAmbient {
    value: Rc<Cell<Option<bool>>>,
}

impl SharedAmbient {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(prefers_dark))),
        }
    }

    pub fn set(&self, prefers_dark: bool) {
        self.value.set(Some(prefers_dark));
    }

    pub fn get(&self) -> Option<bool> {
        self.value.get()
    }
}

impl AmbientSignal for SharedAmbient {
    fn prefers_dark(&self) -> Option<bool> {
        self.value.get()
    }
}

type Detector = fn() -> Option<bool>;

/// The operating system's color mode.
///
/// The detector can be replaced, which is useful for testing or for forcing
/// a specific mode.
#[derive(Debug, Clone, Copy)]
pub struct OsAmbient {
    detector: Detector,
}

impl OsAmbient {
    pub fn new() -> Self {
        Self {
            detector: os_theme_detector,
        }
    }

    pub fn with_detector(detector: Detector) -> Self {
        Self { detector }
    }
}

impl Default for OsAmbient {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientSignal for OsAmbient {
    fn prefers_dark(&self) -> Option<bool> {
        (self.detector)()
    }
}

fn os_theme_detector() -> Option<bool> {
    match detect_os_theme() {
        OsThemeMode::Dark => Some(true),
        _ => Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_and_unavailable() {
        assert_eq!(FixedAmbient(true).prefers_dark(), Some(true));
        assert_eq!(Unavailable.prefers_dark(), None);
    }

    #[test]
    fn test_shared_ambient_clones_observe_updates() {
        let host = SharedAmbient::new(false);
        let signal: Box<dyn AmbientSignal> = Box::new(host.clone());
        assert_eq!(signal.prefers_dark(), Some(false));
        host.set(true);
        assert_eq!(signal.prefers_dark(), Some(true));
    }

    #[test]
    fn test_shared_ambient_default_is_unavailable() {
        assert_eq!(SharedAmbient::default().prefers_dark(), None);
    }

    #[test]
    fn test_os_ambient_uses_detector() {
        assert_eq!(OsAmbient::with_detector(|| Some(true)).prefers_dark(), Some(true));
        assert_eq!(OsAmbient::with_detector(|| None).prefers_dark(), None);
    }
}
