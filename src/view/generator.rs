//! Generator page: generation history.

use super::pagination::{Page, Paginator};
use crate::domain::GeneratedWorkflow;

/// State of the generator page's history table.
#[derive(Debug, Clone)]
pub struct GeneratorView {
    history: Vec<GeneratedWorkflow>,
    page: usize,
    paginator: Paginator,
}

impl GeneratorView {
    /// Builds the view from previously generated workflows.
    #[must_use]
    pub fn new(history: Vec<GeneratedWorkflow>, page_size: usize) -> Self {
        Self {
            history,
            page: 1,
            paginator: Paginator::new(page_size),
        }
    }

    /// Jumps to `page`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Current page of history.
    #[must_use]
    pub fn page(&self) -> Page<'_, GeneratedWorkflow> {
        self.paginator.page(&self.history, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(i: usize) -> GeneratedWorkflow {
        GeneratedWorkflow {
            id: format!("g{i}"),
            requester: None,
            prompt: format!("prompt {i}"),
            file_url: format!("https://cdn.example/g{i}.json"),
            generated_at: None,
        }
    }

    #[test]
    fn history_pages_clamp_to_last() {
        let mut view = GeneratorView::new((0..7).map(generated).collect(), 5);
        assert_eq!(view.page().items.len(), 5);
        view.set_page(2);
        assert_eq!(view.page().items.len(), 2);
        view.set_page(9);
        assert_eq!(view.page().number, 2);
        assert_eq!(view.page().total_pages, 2);
    }
}
