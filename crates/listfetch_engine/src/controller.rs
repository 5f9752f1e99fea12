use std::sync::Arc;

use listfetch_core::{update, Effect, Epoch, Items, ListState, ListViewModel, Msg, ResultPage};
use listfetch_logging::{listfetch_debug, listfetch_trace, listfetch_warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{FetchError, PageFetcher};

struct Completion<T> {
    epoch: Epoch,
    result: Result<ResultPage<T>, FetchError>,
}

/// Drives one [`ListState`] for one list view.
///
/// All operations take `&mut self` and are meant to be called from the
/// owner's event sequence. Fetches run as tasks on `runtime`; their results
/// come back through an internal channel and are applied by
/// [`apply_pending`](Self::apply_pending) or [`settle`](Self::settle).
pub struct ListController<T, F> {
    state: ListState<T, F, FetchError>,
    fetcher: Arc<dyn PageFetcher<T, F>>,
    runtime: Handle,
    in_flight: Option<(Epoch, CancellationToken)>,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<T, F> ListController<T, F>
where
    T: Send + 'static,
    F: Clone + PartialEq + Send + 'static,
{
    pub fn new(fetcher: Arc<dyn PageFetcher<T, F>>, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            state: ListState::new(),
            fetcher,
            runtime,
            in_flight: None,
            completion_tx,
            completion_rx,
        }
    }

    /// Records `filter` and restarts from page 1 if it differs from the current one.
    pub fn set_filter(&mut self, filter: Option<F>) {
        self.dispatch(Msg::FilterSelected(filter));
    }

    /// Drops all results, cancels any running fetch and requests page 1.
    pub fn reset(&mut self) {
        self.dispatch(Msg::ResetRequested);
    }

    /// Requests the next page unless a fetch is already running.
    pub fn load_more(&mut self) {
        self.dispatch(Msg::LoadMoreRequested);
    }

    /// Applies every completion that has already arrived without waiting.
    /// Returns how many were received, stale ones included.
    pub fn apply_pending(&mut self) -> usize {
        let mut received = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            received += 1;
        }
        received
    }

    /// Waits until the in-flight fetch settles and applies it. Stale
    /// completions met on the way are discarded. Returns immediately when
    /// nothing is loading.
    ///
    /// A fetch that never settles keeps this pending forever; callers that
    /// care wrap it in a timeout.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            // The controller holds a sender, so the channel never closes.
            let Some(completion) = self.completion_rx.recv().await else {
                return;
            };
            self.apply(completion);
        }
    }

    /// Tears the controller down, cancelling any outstanding fetch.
    pub fn shutdown(mut self) {
        self.dispatch(Msg::TornDown);
    }

    fn dispatch(&mut self, msg: Msg<T, F, FetchError>) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn apply(&mut self, completion: Completion<T>) {
        let Completion { epoch, result } = completion;
        if self
            .in_flight
            .as_ref()
            .is_some_and(|(current, _)| *current == epoch)
        {
            self.in_flight = None;
        }

        let msg = match result {
            Ok(items) => {
                listfetch_debug!("Fetch {} returned {} items", epoch, items.len());
                Msg::PageLoaded { epoch, items }
            }
            Err(error) => {
                listfetch_warn!("Fetch {} failed: {}", epoch, error);
                Msg::PageFailed { epoch, error }
            }
        };
        self.dispatch(msg);
    }

    fn execute(&mut self, effect: Effect<F>) {
        match effect {
            Effect::Fetch { epoch, query } => {
                listfetch_debug!("Issuing fetch {} for page {}", epoch, query.page);
                let token = CancellationToken::new();
                let cancelled = token.clone();
                let fetcher = Arc::clone(&self.fetcher);
                let completion_tx = self.completion_tx.clone();
                self.runtime.spawn(async move {
                    tokio::select! {
                        _ = cancelled.cancelled() => {
                            listfetch_trace!("Fetch {} dropped after cancellation", epoch);
                        }
                        result = fetcher.fetch_page(query) => {
                            let _ = completion_tx.send(Completion { epoch, result });
                        }
                    }
                });
                self.in_flight = Some((epoch, token));
            }
            Effect::Cancel { epoch } => match self.in_flight.take() {
                Some((current, token)) if current == epoch => {
                    listfetch_debug!("Cancelling fetch {}", epoch);
                    token.cancel();
                }
                other => {
                    listfetch_trace!("Cancel for {} found no running task", epoch);
                    self.in_flight = other;
                }
            },
        }
    }
}

impl<T, F> ListController<T, F> {
    pub fn items(&self) -> &Items<T> {
        self.state.items()
    }

    pub fn page(&self) -> u32 {
        self.state.page()
    }

    pub fn filter(&self) -> Option<&F> {
        self.state.filter()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.state.error()
    }

    pub fn state(&self) -> &ListState<T, F, FetchError> {
        &self.state
    }

    /// Returns whether anything observable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn view(&self) -> ListViewModel<T, F>
    where
        T: Clone,
        F: Clone,
    {
        self.state.view()
    }
}

impl<T, F> Drop for ListController<T, F> {
    fn drop(&mut self) {
        if let Some((epoch, token)) = self.in_flight.take() {
            listfetch_debug!("Controller dropped; cancelling fetch {}", epoch);
            token.cancel();
        }
    }
}
