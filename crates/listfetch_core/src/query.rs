use std::fmt;
use std::num::NonZeroU32;

/// One page of results in server order.
pub type ResultPage<T> = Vec<T>;

/// Request for a single page of entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchQuery<F> {
    /// 1-based page number.
    pub page: NonZeroU32,
    pub filter: Option<F>,
}

impl<F> FetchQuery<F> {
    pub fn new(page: NonZeroU32, filter: Option<F>) -> Self {
        Self { page, filter }
    }

    pub fn first(filter: Option<F>) -> Self {
        Self::new(NonZeroU32::MIN, filter)
    }
}

/// Token identifying one issued fetch. Completions carrying any other epoch
/// than the in-flight one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u64);

impl Epoch {
    pub(crate) fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a successful fetch does to the current item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replace everything with the first page.
    Reset,
    /// Append the next page.
    Append,
}

/// Loaded items, keeping "never loaded" apart from "loaded but empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items<T> {
    Unloaded,
    Loaded(Vec<T>),
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Items::Unloaded
    }
}

impl<T> Items<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Items::Loaded(_))
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Items::Unloaded => None,
            Items::Loaded(items) => Some(items),
        }
    }

    /// Number of loaded items; zero while unloaded.
    pub fn len(&self) -> usize {
        self.as_slice().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `page` in order. An unloaded list becomes loaded.
    pub(crate) fn append(&mut self, page: ResultPage<T>) {
        match self {
            Items::Unloaded => *self = Items::Loaded(page),
            Items::Loaded(items) => items.extend(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Epoch, FetchQuery, Items};

    #[test]
    fn unloaded_differs_from_loaded_empty() {
        let unloaded: Items<u8> = Items::Unloaded;
        let empty: Items<u8> = Items::Loaded(Vec::new());
        assert_ne!(unloaded, empty);
        assert_eq!(unloaded.len(), empty.len());
        assert!(!unloaded.is_loaded());
        assert!(empty.is_loaded());
    }

    #[test]
    fn append_onto_unloaded_loads() {
        let mut items = Items::Unloaded;
        items.append(vec![1, 2]);
        items.append(vec![2, 3]);
        assert_eq!(items.as_slice(), Some(&[1, 2, 2, 3][..]));
    }

    #[test]
    fn first_query_is_page_one() {
        let query = FetchQuery::first(Some("alive"));
        assert_eq!(query.page.get(), 1);
        assert_eq!(query, FetchQuery::first(Some("alive")));
        assert_ne!(query, FetchQuery::first(Some("dead")));
    }

    #[test]
    fn epochs_increase() {
        let start = Epoch::default();
        assert!(start.next() > start);
        assert_eq!(start.next().to_string(), "#1");
    }
}
