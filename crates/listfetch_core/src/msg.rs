use crate::Epoch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T, F, E> {
    /// User picked a filter (or cleared it with `None`).
    FilterSelected(Option<F>),
    /// Drop current results and restart from the first page.
    ResetRequested,
    /// Presentation layer wants the next page appended.
    LoadMoreRequested,
    /// Fetch issued under `epoch` delivered a page.
    PageLoaded { epoch: Epoch, items: Vec<T> },
    /// Fetch issued under `epoch` failed.
    PageFailed { epoch: Epoch, error: E },
    /// Owning presentation context ended.
    TornDown,
    /// Fallback for placeholder wiring.
    NoOp,
}
