use listfetch_core::ListViewModel;

use crate::model::{Character, StatusFilter};

/// Text rendering of the list. Items already printed are not repeated;
/// a reset starts over.
#[derive(Debug, Default)]
pub struct TerminalView {
    rendered: usize,
}

impl TerminalView {
    pub fn render(&mut self, view: &ListViewModel<Character, StatusFilter>) -> Vec<String> {
        let mut lines = Vec::new();
        let filter = view
            .filter
            .map_or_else(|| "all".to_string(), |filter| filter.to_string());
        lines.push(format!(
            "[{filter}] page={} items={}{}",
            view.page,
            view.item_count(),
            if view.is_loading { " loading..." } else { "" }
        ));

        match &view.items {
            None => self.rendered = 0,
            Some(items) => {
                if items.len() < self.rendered {
                    self.rendered = 0;
                }
                for character in &items[self.rendered..] {
                    lines.push(format!(
                        "  #{:<4} {} ({}, {})",
                        character.id, character.name, character.status, character.species
                    ));
                }
                self.rendered = items.len();
                if view.is_empty_result() {
                    lines.push("  (no results)".to_string());
                }
            }
        }

        if let Some(error) = &view.error {
            lines.push(format!("! {error}"));
        }
        lines
    }
}
