/// Owned snapshot of a list for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel<T, F> {
    /// `None` until the first page arrives.
    pub items: Option<Vec<T>>,
    pub page: u32,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filter: Option<F>,
}

impl<T, F> ListViewModel<T, F> {
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Loaded, settled and nothing came back.
    pub fn is_empty_result(&self) -> bool {
        !self.is_loading && self.items.as_ref().is_some_and(Vec::is_empty)
    }
}
