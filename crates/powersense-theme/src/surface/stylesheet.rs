//! Transition stylesheet rendering.

use minijinja::{context, Environment, Error};
use once_cell::sync::Lazy;

use crate::config::ThemeConfig;

static STYLE_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
});

const TRANSITION_TEMPLATE: &str = r#"{% for suffix in ["", " *", " *:before", " *:after"] %}
.{{ class }}{{ suffix }}{% if not loop.last %},{% endif %}

{% endfor %}
{
  transition: all {{ duration_ms }}ms ease !important;
  transition-delay: 0s !important;
}
"#;

/// Renders the global rule that animates every visual property change on
/// the transition class and its descendants over the configured duration.
pub fn transition_stylesheet(config: &ThemeConfig) -> Result<String, Error> {
    STYLE_ENV.render_str(
        TRANSITION_TEMPLATE,
        context! {
            class => &config.transition_class,
            duration_ms => config.transition_duration_ms,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet() {
        let css = transition_stylesheet(&ThemeConfig::default()).unwrap();
        assert!(css.contains(".theme-transition,"));
        assert!(css.contains(".theme-transition *,"));
        assert!(css.contains(".theme-transition *:before,"));
        assert!(css.contains(".theme-transition *:after"));
        assert!(css.contains("transition: all 300ms ease !important;"));
        assert!(css.contains("transition-delay: 0s !important;"));
    }

    #[test]
    fn test_stylesheet_follows_config() {
        let mut config = ThemeConfig::default();
        config.transition_class = "fade".to_string();
        config.transition_duration_ms = 120;
        let css = transition_stylesheet(&config).unwrap();
        assert!(css.contains(".fade *:after"));
        assert!(css.contains("all 120ms"));
        assert!(!css.contains("theme-transition"));
    }
}
