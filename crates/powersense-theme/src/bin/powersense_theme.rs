//! Command line host for the theme controller.
//!
//! Persists the preference to a JSON file and reads the ambient signal from
//! the operating system (or a forced value), which makes it handy for
//! inspecting and resetting the stored override.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Style};
use minijinja::{context, Environment, Value};
use powersense_theme::{
    transition_stylesheet, AmbientSignal, Document, FileStore, FixedAmbient, OsAmbient,
    ThemeConfig, ThemeController, ThemePreference, Unavailable,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "powersense-theme", version, about = "Inspect and change the PowerSense theme preference")]
struct Cli {
    /// Preference file (JSON object of stored keys)
    #[arg(long, env = "POWERSENSE_THEME_STORE", default_value = "powersense-theme.json")]
    store: PathBuf,

    /// Theme config file (.yaml or .json)
    #[arg(long, env = "POWERSENSE_THEME_CONFIG")]
    config: Option<PathBuf>,

    /// Where the ambient color scheme comes from
    #[arg(long, value_enum, default_value_t = AmbientArg::Os)]
    ambient: AmbientArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum AmbientArg {
    Os,
    Dark,
    Light,
    Unavailable,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current preference and where it came from
    Show,
    /// Set and persist a preference (dark or light)
    Set { preference: ThemePreference },
    /// Flip the current preference
    Toggle,
    /// Forget the stored override so the ambient scheme applies again
    Clear,
    /// Re-apply the stored override, if any
    Sync,
    /// Print the transition stylesheet
    Stylesheet,
    /// Follow ambient changes and print every committed preference
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("POWERSENSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ThemeConfig::from_path(path)
            .with_context(|| format!("loading theme config from {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    let doc = Document::with_theme_meta(config.theme_color(ThemePreference::Light));
    let mut controller = ThemeController::builder()
        .config(config)
        .store(FileStore::new(&cli.store))
        .ambient(ambient_signal(cli.ambient))
        .surface(doc.clone())
        .build();

    if controller.is_inert() {
        eprintln!(
            "{}",
            style("no ambient color scheme available; preference is fixed to light").yellow()
        );
    }

    match cli.command {
        Command::Show => {}
        Command::Set { preference } => controller.set_preference(preference),
        Command::Toggle => controller.toggle(),
        Command::Clear => controller.clear_override(),
        Command::Sync => controller.initialize_from_storage(),
        Command::Watch { interval_ms, polls } => {
            let env = status_env(console::colors_enabled());
            return watch(&mut controller, env, Duration::from_millis(interval_ms), polls);
        }
        Command::Stylesheet => {
            let css = transition_stylesheet(controller.config())
                .context("rendering transition stylesheet")?;
            print!("{css}");
            return Ok(());
        }
    }

    controller.flush();
    let env = status_env(console::colors_enabled());
    println!(
        "{}",
        render_status(&env, &controller, &doc).context("rendering status")?
    );
    Ok(())
}

fn ambient_signal(arg: AmbientArg) -> Box<dyn AmbientSignal> {
    match arg {
        AmbientArg::Os => Box::new(OsAmbient::new()),
        AmbientArg::Dark => Box::new(FixedAmbient(true)),
        AmbientArg::Light => Box::new(FixedAmbient(false)),
        AmbientArg::Unavailable => Box::new(Unavailable),
    }
}

const STATUS_TEMPLATE: &str = r#"{{ "theme:" | style("label") }} {{ preference | style(preference) }} {{ ("(" ~ source ~ ")") | style("label") }}
{{ "surface:" | style("label") }} {{ surface }}"#;

const CHANGE_TEMPLATE: &str = r#"{{ "theme:" | style("label") }} {{ preference | style(preference) }}"#;

/// Builds the environment for CLI output. The `style` filter maps `dark`,
/// `light` and `label` to terminal styles; unknown names pass text through.
fn status_env(colored: bool) -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("style", move |value: Value, name: String| -> String {
        let style = match name.as_str() {
            "dark" => Style::new().green().bold(),
            "light" => Style::new().yellow().bold(),
            "label" => Style::new().dim(),
            _ => Style::new(),
        };
        style.force_styling(colored).apply_to(value.to_string()).to_string()
    });
    env
}

fn render_status(
    env: &Environment<'static>,
    controller: &ThemeController,
    doc: &Document,
) -> Result<String, minijinja::Error> {
    env.render_str(
        STATUS_TEMPLATE,
        context! {
            preference => controller.current_preference().as_str(),
            source => controller.preference_source().as_str(),
            surface => doc.to_string(),
        },
    )
}

fn render_change(env: &Environment<'static>, pref: ThemePreference) -> Result<String, minijinja::Error> {
    env.render_str(CHANGE_TEMPLATE, context! { preference => pref.as_str() })
}

fn watch(
    controller: &mut ThemeController,
    env: Environment<'static>,
    interval: Duration,
    polls: Option<u64>,
) -> Result<()> {
    controller
        .subscribe(move |pref| match render_change(&env, pref) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::warn!(%error, "failed to render theme change"),
        })
        .detach();

    let mut count = 0;
    while polls.map_or(true, |limit| count < limit) {
        std::thread::sleep(interval);
        if controller.poll_ambient() {
            tracing::info!("ambient color scheme changed");
        }
        controller.run_due();
        count += 1;
    }
    controller.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use powersense_theme::{ManualClock, MemoryStore, PreferenceStore};

    fn controller(store: &MemoryStore, doc: &Document, ambient: AmbientArg) -> ThemeController {
        ThemeController::builder()
            .store(store.clone())
            .ambient(ambient_signal(ambient))
            .surface(doc.clone())
            .clock(ManualClock::new())
            .build()
    }

    #[test]
    fn test_status_reports_ambient_source() {
        let store = MemoryStore::new();
        let doc = Document::with_theme_meta("#61d222");
        let c = controller(&store, &doc, AmbientArg::Dark);
        let status = render_status(&status_env(false), &c, &doc).unwrap();
        assert_eq!(
            status,
            "theme: dark (ambient)\nsurface: class=\"dark-mode\" theme-color=\"#377519\""
        );
    }

    #[test]
    fn test_status_reports_stored_override() {
        let mut store = MemoryStore::new();
        store.set("PowerSense-dark-mode", "false").unwrap();
        let doc = Document::new();
        let c = controller(&store, &doc, AmbientArg::Dark);
        let status = render_status(&status_env(false), &c, &doc).unwrap();
        assert!(status.starts_with("theme: light (stored override)"));
    }

    #[test]
    fn test_status_reports_default_when_inert() {
        let store = MemoryStore::new();
        let doc = Document::new();
        let c = controller(&store, &doc, AmbientArg::Unavailable);
        let status = render_status(&status_env(false), &c, &doc).unwrap();
        assert!(status.starts_with("theme: light (default)"));
    }

    #[test]
    fn test_clear_flow_returns_to_ambient() {
        let store = MemoryStore::new();
        let doc = Document::new();
        let env = status_env(false);

        let mut c = controller(&store, &doc, AmbientArg::Light);
        c.set_preference(ThemePreference::Dark);
        c.flush();
        assert!(render_status(&env, &c, &doc)
            .unwrap()
            .starts_with("theme: dark (stored override)"));

        c.clear_override();
        c.flush();
        assert!(render_status(&env, &c, &doc)
            .unwrap()
            .starts_with("theme: dark (ambient)"));

        // A fresh run after clearing starts from the ambient scheme.
        let reloaded = controller(&store, &doc, AmbientArg::Light);
        assert!(render_status(&env, &reloaded, &doc)
            .unwrap()
            .starts_with("theme: light (ambient)"));
    }

    #[test]
    fn test_style_filter_colors_when_enabled() {
        let line = render_change(&status_env(true), ThemePreference::Dark).unwrap();
        assert!(line.contains("\x1b["));
        assert!(line.contains("dark"));

        let plain = render_change(&status_env(false), ThemePreference::Dark).unwrap();
        assert_eq!(plain, "theme: dark");
    }
}
