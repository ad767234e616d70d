//! Builder for [`ThemeController`].

use tracing::warn;

use super::ThemeController;
use crate::ambient::{AmbientSignal, OsAmbient};
use crate::config::ThemeConfig;
use crate::storage::{MemoryStore, PreferenceStore};
use crate::surface::{Document, Surface};
use crate::timer::{Clock, SystemClock};

/// Builder for a [`ThemeController`].
///
/// Every part is optional. By default:
/// - the default [`ThemeConfig`]
/// - a fresh [`MemoryStore`] (nothing survives the process)
/// - the operating system's color mode ([`OsAmbient`])
/// - a headless [`Document`] without a theme-color meta element
/// - a [`SystemClock`]
#[derive(Default)]
pub struct ThemeControllerBuilder {
    config: Option<ThemeConfig>,
    store: Option<Box<dyn PreferenceStore>>,
    ambient: Option<Box<dyn AmbientSignal>>,
    surface: Option<Box<dyn Surface>>,
    clock: Option<Box<dyn Clock>>,
}

impl ThemeControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn ambient(mut self, ambient: impl AmbientSignal + 'static) -> Self {
        self.ambient = Some(Box::new(ambient));
        self
    }

    pub fn surface(mut self, surface: impl Surface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Builds the controller and runs its initialization against the
    /// ambient signal, the store and the surface.
    ///
    /// A config that fails [`ThemeConfig::validate`] is replaced by the
    /// default config.
    pub fn build(self) -> ThemeController {
        let config = match self.config {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(error) => {
                    warn!(%error, "invalid theme config, using defaults");
                    ThemeConfig::default()
                }
            },
            None => ThemeConfig::default(),
        };
        ThemeController::new(
            config,
            self.store.unwrap_or_else(|| Box::new(MemoryStore::new())),
            self.ambient.unwrap_or_else(|| Box::new(OsAmbient::new())),
            self.surface.unwrap_or_else(|| Box::new(Document::new())),
            self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
        )
    }
}

impl std::fmt::Debug for ThemeControllerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeControllerBuilder")
            .field("config", &self.config)
            .field("store", &self.store.is_some())
            .field("ambient", &self.ambient.is_some())
            .field("surface", &self.surface.is_some())
            .field("clock", &self.clock.is_some())
            .finish()
    }
}
