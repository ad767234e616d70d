//! The visual surface the preference is applied to.
//!
//! This module provides:
//!
//! - [`Surface`]: root-container class list, theme-color hint and stylesheets
//! - [`Document`]: a headless, inspectable surface
//! - [`transition_stylesheet`]: the global rule animating theme transitions
//!
//! The rest of the UI only ever observes the preference through this
//! surface: the dark class on the root container and the theme-color hint.

mod document;
mod stylesheet;

pub use document::{Document, SurfaceEvent};
pub use stylesheet::transition_stylesheet;

use crate::config::ThemeConfig;
use crate::preference::ThemePreference;

/// A document-like target for theme markers.
pub trait Surface {
    /// Adds a class to the root container. Adding a present class is a no-op.
    fn add_class(&mut self, class: &str);
    /// Removes a class from the root container. Removing an absent class is a no-op.
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    /// Updates the environment-chrome color hint, if the surface has one.
    fn set_theme_color(&mut self, color: &str);
    fn install_stylesheet(&mut self, css: &str);
}

/// Applies the dark marker and theme color for `pref`.
pub(crate) fn apply_preference(
    surface: &mut dyn Surface,
    config: &ThemeConfig,
    pref: ThemePreference,
) {
    if pref.is_dark() {
        surface.add_class(&config.dark_class);
    } else {
        surface.remove_class(&config.dark_class);
    }
    surface.set_theme_color(config.theme_color(pref));
}
