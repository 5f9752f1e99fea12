use std::sync::Once;

use listfetch_core::{update, Effect, Epoch, FetchQuery, Items, ListState, Msg};
use pretty_assertions::assert_eq;

type State = ListState<u32, String, String>;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(listfetch_logging::initialize_for_tests);
}

fn fetch_of(effects: &[Effect<String>]) -> (Epoch, FetchQuery<String>) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch { epoch, query } => Some((*epoch, query.clone())),
            _ => None,
        })
        .expect("fetch effect")
}

fn filter(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Drives the state to `pages` loaded pages of three items each, unfiltered.
fn loaded_pages(pages: u32) -> State {
    let mut state = State::new();
    for n in 0..pages {
        let (next, effects) = update(state, Msg::LoadMoreRequested);
        let (epoch, _) = fetch_of(&effects);
        let base = n * 3;
        let (next, _) = update(
            next,
            Msg::PageLoaded {
                epoch,
                items: vec![base, base + 1, base + 2],
            },
        );
        state = next;
    }
    state
}

#[test]
fn filter_change_resets_and_requests_first_page() {
    init_logging();
    let state = loaded_pages(2);
    assert_eq!(state.page(), 2);

    let (state, effects) = update(state, Msg::FilterSelected(filter("alive")));
    let (epoch, query) = fetch_of(&effects);

    assert_eq!(query, FetchQuery::first(filter("alive")));
    assert_eq!(state.page(), 0);
    assert_eq!(state.items(), &Items::Unloaded);
    assert!(state.is_loading());
    assert_eq!(state.filter(), Some(&"alive".to_string()));

    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            epoch,
            items: vec![10, 11],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.items().len(), 2);
    assert_eq!(state.page(), 1);
    assert!(!state.is_loading());
    assert_eq!(state.filter(), Some(&"alive".to_string()));
}

#[test]
fn reselecting_same_filter_fetches_once() {
    init_logging();
    let (state, first) = update(State::new(), Msg::FilterSelected(filter("alive")));
    assert_eq!(first.len(), 1);

    let before = state.clone();
    let (state, second) = update(state, Msg::FilterSelected(filter("alive")));
    assert!(second.is_empty());
    assert_eq!(state, before);
}

#[test]
fn clearing_filter_counts_as_change() {
    init_logging();
    let (state, effects) = update(State::new(), Msg::FilterSelected(filter("dead")));
    let (epoch, _) = fetch_of(&effects);
    let (state, _) = update(state, Msg::PageLoaded { epoch, items: vec![1] });

    let (state, effects) = update(state, Msg::FilterSelected(None));
    let (_, query) = fetch_of(&effects);
    assert_eq!(query, FetchQuery::first(None));
    assert_eq!(state.filter(), None);
    assert!(state.is_loading());
}

#[test]
fn selecting_none_on_fresh_state_is_noop() {
    init_logging();
    let state = State::new();
    let (next, effects) = update(state.clone(), Msg::FilterSelected(None));
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn filter_change_while_loading_cancels_previous_fetch() {
    init_logging();
    let (state, effects) = update(State::new(), Msg::FilterSelected(filter("alive")));
    let (first_epoch, _) = fetch_of(&effects);

    let (state, effects) = update(state, Msg::FilterSelected(filter("dead")));
    let (second_epoch, query) = fetch_of(&effects);

    assert_eq!(effects[0], Effect::Cancel { epoch: first_epoch });
    assert_ne!(first_epoch, second_epoch);
    assert_eq!(query, FetchQuery::first(filter("dead")));
    assert_eq!(state.current_epoch(), Some(second_epoch));
}

#[test]
fn explicit_reset_keeps_filter_and_restarts() {
    init_logging();
    let (state, effects) = update(State::new(), Msg::FilterSelected(filter("unknown")));
    let (epoch, _) = fetch_of(&effects);
    let (state, _) = update(state, Msg::PageLoaded { epoch, items: vec![1, 2] });

    let (state, effects) = update(state, Msg::ResetRequested);
    let (_, query) = fetch_of(&effects);
    assert_eq!(effects.len(), 1);
    assert_eq!(query, FetchQuery::first(filter("unknown")));
    assert_eq!(state.items(), &Items::Unloaded);
    assert_eq!(state.page(), 0);
}

#[test]
fn failed_reset_leaves_items_unloaded() {
    init_logging();
    let state = loaded_pages(1);
    let (state, effects) = update(state, Msg::FilterSelected(filter("alive")));
    let (epoch, _) = fetch_of(&effects);

    let (mut state, _) = update(
        state,
        Msg::PageFailed {
            epoch,
            error: "server error 500".to_string(),
        },
    );

    assert_eq!(state.items(), &Items::Unloaded);
    assert_eq!(state.page(), 0);
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(&"server error 500".to_string()));
    assert!(state.consume_dirty());
}

#[test]
fn reset_clears_previous_error() {
    init_logging();
    let (state, effects) = update(State::new(), Msg::ResetRequested);
    let (epoch, _) = fetch_of(&effects);
    let (state, _) = update(
        state,
        Msg::PageFailed {
            epoch,
            error: "offline".to_string(),
        },
    );
    assert!(state.error().is_some());

    let (state, _) = update(state, Msg::ResetRequested);
    assert_eq!(state.error(), None);
    assert!(state.is_loading());
}

#[test]
fn empty_first_page_is_loaded_not_unloaded() {
    init_logging();
    let (state, effects) = update(State::new(), Msg::ResetRequested);
    let (epoch, _) = fetch_of(&effects);
    let (state, _) = update(state, Msg::PageLoaded { epoch, items: vec![] });

    assert_eq!(state.items(), &Items::Loaded(Vec::new()));
    assert_eq!(state.page(), 1);
    assert!(state.view().is_empty_result());
}
