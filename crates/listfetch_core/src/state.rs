use std::fmt;
use std::num::NonZeroU32;

use listfetch_logging::listfetch_debug;

use crate::view_model::ListViewModel;
use crate::{Effect, Epoch, FetchMode, FetchQuery, Items, ResultPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    epoch: Epoch,
    mode: FetchMode,
    page: NonZeroU32,
}

/// Pagination state of one list view.
///
/// Only [`crate::update`] mutates it. At most one fetch is in flight; its
/// epoch is the only one whose completion is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState<T, F, E> {
    items: Items<T>,
    page: u32,
    filter: Option<F>,
    error: Option<E>,
    in_flight: Option<InFlight>,
    last_epoch: Epoch,
    torn_down: bool,
    dirty: bool,
}

impl<T, F, E> Default for ListState<T, F, E> {
    fn default() -> Self {
        Self {
            items: Items::Unloaded,
            page: 0,
            filter: None,
            error: None,
            in_flight: None,
            last_epoch: Epoch::default(),
            torn_down: false,
            dirty: false,
        }
    }
}

impl<T, F, E> ListState<T, F, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &Items<T> {
        &self.items
    }

    /// Number of pages fetched so far; 0 before the first success.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Epoch of the fetch currently in flight.
    pub fn current_epoch(&self) -> Option<Epoch> {
        self.in_flight.map(|in_flight| in_flight.epoch)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Returns whether anything observable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> ListViewModel<T, F>
    where
        T: Clone,
        F: Clone,
        E: fmt::Display,
    {
        ListViewModel {
            items: self.items.as_slice().map(<[T]>::to_vec),
            page: self.page,
            is_loading: self.is_loading(),
            error: self.error.as_ref().map(ToString::to_string),
            filter: self.filter.clone(),
        }
    }

    pub(crate) fn select_filter(&mut self, filter: Option<F>) -> Vec<Effect<F>>
    where
        F: Clone + PartialEq,
    {
        if self.filter == filter {
            return Vec::new();
        }
        self.filter = filter;
        self.reset()
    }

    pub(crate) fn reset(&mut self) -> Vec<Effect<F>>
    where
        F: Clone,
    {
        self.page = 0;
        self.items = Items::Unloaded;
        self.error = None;
        self.begin_fetch(FetchMode::Reset)
    }

    pub(crate) fn load_more(&mut self) -> Vec<Effect<F>>
    where
        F: Clone,
    {
        // Single logical owner: the check and the set below cannot interleave.
        if self.is_loading() {
            return Vec::new();
        }
        self.error = None;
        self.begin_fetch(FetchMode::Append)
    }

    pub(crate) fn apply_loaded(&mut self, epoch: Epoch, page: ResultPage<T>) {
        let Some(in_flight) = self.take_current(epoch) else {
            return;
        };
        match in_flight.mode {
            FetchMode::Reset => self.items = Items::Loaded(page),
            FetchMode::Append => self.items.append(page),
        }
        self.page = in_flight.page.get();
        self.dirty = true;
    }

    pub(crate) fn apply_failed(&mut self, epoch: Epoch, error: E) {
        if self.take_current(epoch).is_none() {
            return;
        }
        // A failed reset already left `items` unloaded; a failed append keeps
        // items and page as they were.
        self.error = Some(error);
        self.dirty = true;
    }

    pub(crate) fn tear_down(&mut self) -> Vec<Effect<F>> {
        self.torn_down = true;
        self.dirty = true;
        self.cancel_in_flight().into_iter().collect()
    }

    fn begin_fetch(&mut self, mode: FetchMode) -> Vec<Effect<F>>
    where
        F: Clone,
    {
        let mut effects = Vec::with_capacity(2);
        effects.extend(self.cancel_in_flight());

        let page = match mode {
            FetchMode::Reset => NonZeroU32::MIN,
            FetchMode::Append => NonZeroU32::MIN.saturating_add(self.page),
        };
        self.last_epoch = self.last_epoch.next();
        let epoch = self.last_epoch;
        self.in_flight = Some(InFlight { epoch, mode, page });
        self.dirty = true;

        effects.push(Effect::Fetch {
            epoch,
            query: FetchQuery::new(page, self.filter.clone()),
        });
        effects
    }

    fn cancel_in_flight(&mut self) -> Option<Effect<F>> {
        self.in_flight
            .take()
            .map(|in_flight| Effect::Cancel {
                epoch: in_flight.epoch,
            })
    }

    fn take_current(&mut self, epoch: Epoch) -> Option<InFlight> {
        match self.in_flight {
            Some(in_flight) if in_flight.epoch == epoch => self.in_flight.take(),
            current => {
                listfetch_debug!(
                    "Discarding stale completion epoch={} current={:?}",
                    epoch,
                    current.map(|in_flight| in_flight.epoch)
                );
                None
            }
        }
    }
}
