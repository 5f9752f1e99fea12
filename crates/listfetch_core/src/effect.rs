use crate::{Epoch, FetchQuery};

/// Side effects requested by [`crate::update`], executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<F> {
    /// Start fetching `query`; its completion must be reported with `epoch`.
    Fetch { epoch: Epoch, query: FetchQuery<F> },
    /// Abandon the fetch issued under `epoch`.
    Cancel { epoch: Epoch },
}
