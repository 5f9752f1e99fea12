use listfetch_logging::listfetch_trace;

use crate::{Effect, ListState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T, F, E>(
    mut state: ListState<T, F, E>,
    msg: Msg<T, F, E>,
) -> (ListState<T, F, E>, Vec<Effect<F>>)
where
    F: Clone + PartialEq,
{
    if state.is_torn_down() {
        listfetch_trace!("Ignoring message after teardown");
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::FilterSelected(filter) => state.select_filter(filter),
        Msg::ResetRequested => state.reset(),
        Msg::LoadMoreRequested => state.load_more(),
        Msg::PageLoaded { epoch, items } => {
            state.apply_loaded(epoch, items);
            Vec::new()
        }
        Msg::PageFailed { epoch, error } => {
            state.apply_failed(epoch, error);
            Vec::new()
        }
        Msg::TornDown => state.tear_down(),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
