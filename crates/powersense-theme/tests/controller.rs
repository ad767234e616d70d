//! End-to-end behavior of the theme controller against the in-memory host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use powersense_theme::{
    AmbientSignal, Document, FixedAmbient, ManualClock, MemoryStore, PreferenceStore,
    SharedAmbient, ThemeController, ThemePreference,
};
use proptest::prelude::*;

const KEY: &str = "PowerSense-dark-mode";
const COMMIT: Duration = Duration::from_millis(10);
const SETTLE: Duration = Duration::from_millis(310);

fn controller(
    store: &MemoryStore,
    doc: &Document,
    ambient: impl AmbientSignal + 'static,
) -> ThemeController {
    ThemeController::builder()
        .store(store.clone())
        .ambient(ambient)
        .surface(doc.clone())
        .clock(ManualClock::new())
        .build()
}

#[test]
fn test_light_to_dark_walkthrough() {
    let store = MemoryStore::new();
    let doc = Document::with_theme_meta("#61d222");
    let mut theme = controller(&store, &doc, FixedAmbient(false));
    assert_eq!(theme.current_preference(), ThemePreference::Light);

    theme.set_preference(ThemePreference::Dark);
    theme.advance(SETTLE);

    assert_eq!(theme.current_preference(), ThemePreference::Dark);
    assert_eq!(store.raw(KEY).as_deref(), Some("true"));
    assert!(doc.has_class("dark-mode"));
    assert!(!doc.has_class("theme-transition"));
    assert_eq!(doc.theme_color().as_deref(), Some("#377519"));
}

#[test]
fn test_idempotent_request_still_transitions() {
    let mut store = MemoryStore::new();
    store.set(KEY, "false").unwrap();
    let doc = Document::with_theme_meta("#61d222");
    let mut theme = controller(&store, &doc, FixedAmbient(true));

    theme.set_preference(ThemePreference::Light);
    assert!(theme.is_transitioning());
    theme.advance(SETTLE);

    assert!(!theme.is_transitioning());
    assert_eq!(theme.current_preference(), ThemePreference::Light);
    assert_eq!(store.raw(KEY).as_deref(), Some("false"));
    assert!(!doc.has_class("dark-mode"));
}

#[test]
fn test_persistence_survives_reload() {
    let store = MemoryStore::new();
    let doc = Document::new();
    {
        let mut theme = controller(&store, &doc, FixedAmbient(false));
        theme.set_dark(true);
        theme.advance(SETTLE);
    }

    // Reload with an ambient signal that disagrees.
    let reload_doc = Document::new();
    let mut reloaded = controller(&store, &reload_doc, FixedAmbient(false));
    assert!(reloaded.is_dark());
    reloaded.initialize_from_storage();
    reloaded.advance(SETTLE);
    assert!(reloaded.is_dark());
    assert!(reload_doc.has_class("dark-mode"));
}

#[test]
fn test_ambient_followed_until_override_exists() {
    let store = MemoryStore::new();
    let doc = Document::new();
    let ambient = SharedAmbient::new(false);
    let mut theme = controller(&store, &doc, ambient.clone());

    ambient.set(true);
    theme.poll_ambient();
    theme.advance(COMMIT);
    assert!(theme.is_dark());

    // Every commit persists, so the ambient-driven change is now an override.
    ambient.set(false);
    theme.poll_ambient();
    theme.advance(SETTLE);
    assert!(theme.is_dark());

    theme.clear_override();
    theme.handle_ambient_change(false);
    theme.advance(SETTLE);
    assert!(!theme.is_dark());
}

#[test]
fn test_ambient_ignored_with_persisted_override() {
    let mut store = MemoryStore::new();
    store.set(KEY, "true").unwrap();
    let doc = Document::new();
    let ambient = SharedAmbient::new(false);
    let mut theme = controller(&store, &doc, ambient.clone());
    assert!(theme.is_dark());

    ambient.set(true);
    theme.poll_ambient();
    ambient.set(false);
    theme.poll_ambient();
    theme.advance(SETTLE);

    assert!(theme.is_dark());
    assert_eq!(theme.pending_steps(), 0);
}

#[test]
fn test_subscriber_receives_initial_plus_each_commit() {
    let store = MemoryStore::new();
    let doc = Document::new();
    let mut theme = controller(&store, &doc, FixedAmbient(false));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = theme.subscribe(move |p| sink.borrow_mut().push(p));

    let requests = [true, true, false, true];
    for dark in requests {
        theme.set_dark(dark);
        theme.advance(COMMIT);
    }

    let expected: Vec<ThemePreference> = std::iter::once(ThemePreference::Light)
        .chain(requests.iter().copied().map(ThemePreference::from_dark))
        .collect();
    assert_eq!(*seen.borrow(), expected);

    subscription.unsubscribe();
    theme.toggle();
    theme.advance(SETTLE);
    assert_eq!(seen.borrow().len(), requests.len() + 1);
}

#[test]
fn test_stream_stops_after_close() {
    let store = MemoryStore::new();
    let doc = Document::new();
    let mut theme = controller(&store, &doc, FixedAmbient(true));

    let mut stream = theme.stream();
    theme.set_dark(false);
    theme.advance(SETTLE);
    stream.close();
    theme.set_dark(true);
    theme.advance(SETTLE);

    assert_eq!(
        stream.collect::<Vec<_>>(),
        vec![ThemePreference::Dark, ThemePreference::Light]
    );
    assert!(theme.is_dark());
}

proptest! {
    #[test]
    fn prop_last_requested_value_wins(requests in proptest::collection::vec(any::<bool>(), 1..16)) {
        let store = MemoryStore::new();
        let doc = Document::with_theme_meta("#61d222");
        let mut theme = controller(&store, &doc, FixedAmbient(false));

        for &dark in &requests {
            theme.set_dark(dark);
            theme.advance(COMMIT);
            prop_assert_eq!(theme.is_dark(), dark);
        }

        let last = *requests.last().unwrap();
        theme.advance(SETTLE);
        prop_assert_eq!(theme.is_dark(), last);
        prop_assert_eq!(store.raw(KEY), Some(last.to_string()));
        prop_assert_eq!(doc.has_class("dark-mode"), last);
        prop_assert!(!doc.has_class("theme-transition"));
    }

    #[test]
    fn prop_batched_requests_commit_in_order(requests in proptest::collection::vec(any::<bool>(), 1..16)) {
        let store = MemoryStore::new();
        let doc = Document::new();
        let mut theme = controller(&store, &doc, FixedAmbient(false));
        let mut stream = theme.stream();

        for &dark in &requests {
            theme.set_dark(dark);
        }
        theme.advance(SETTLE);

        let delivered: Vec<bool> = stream.by_ref().map(|p| p.is_dark()).collect();
        prop_assert_eq!(delivered.len(), requests.len() + 1);
        prop_assert_eq!(&delivered[1..], &requests[..]);
        prop_assert_eq!(theme.is_dark(), *requests.last().unwrap());
    }
}
