pub mod collate;
pub mod filters;
pub mod sort;

use std::sync::Arc;

use crate::model::TriviaItem;

pub use filters::{distinct_values, filter_items, FilterField, FilterState};
pub use sort::{sort_items, SortField, SortOrder, SortState};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// Filter then sort `full` into a fresh displayed subset.
pub fn project(
    full: &[TriviaItem],
    filter: Option<&FilterState>,
    sort: Option<SortState>,
) -> Vec<TriviaItem> {
    let mut out = match filter {
        Some(f) => filter_items(full, f),
        None => full.to_vec(),
    };
    if let Some(s) = sort {
        sort_items(&mut out, s);
    }
    out
}

/// Table state: the loaded dataset, what is currently shown, and the user's
/// sort and filter selections.
#[derive(Clone, Debug)]
pub struct TriviaView {
    full: Arc<[TriviaItem]>,
    displayed: Vec<TriviaItem>,
    sort: Option<SortState>,
    filter: Option<FilterState>,
    filter_field: Option<FilterField>,
    load_state: LoadState,
}

impl Default for TriviaView {
    fn default() -> Self {
        Self {
            full: Arc::from(Vec::new()),
            displayed: Vec::new(),
            sort: None,
            filter: None,
            filter_field: None,
            load_state: LoadState::Pending,
        }
    }
}

impl TriviaView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(items: Vec<TriviaItem>) -> Self {
        let mut view = Self::new();
        view.set_dataset(items);
        view
    }

    /// Replaces the full dataset and re-derives the displayed subset.
    pub fn set_dataset(&mut self, items: Vec<TriviaItem>) {
        self.full = items.into();
        self.load_state = LoadState::Loaded;
        self.recompute();
    }

    pub fn mark_failed(&mut self) {
        self.load_state = LoadState::Failed;
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn full(&self) -> &[TriviaItem] {
        &self.full
    }

    pub fn displayed(&self) -> &[TriviaItem] {
        &self.displayed
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn filter_state(&self) -> Option<&FilterState> {
        self.filter.as_ref()
    }

    pub fn filter_field(&self) -> Option<FilterField> {
        self.filter_field
    }

    /// Value shown in the value selector: the applied value when it belongs
    /// to the selected field, otherwise nothing.
    pub fn selected_value(&self) -> Option<&str> {
        match (&self.filter, self.filter_field) {
            (Some(f), Some(field)) if f.field == field => Some(f.value.as_str()),
            _ => None,
        }
    }

    /// Header click on `field`: toggles the order and re-sorts what is shown.
    pub fn sort_by(&mut self, field: SortField) -> SortState {
        let next = SortState::toggle(self.sort, field);
        sort_items(&mut self.displayed, next);
        self.sort = Some(next);
        tracing::debug!(field = %field, order = next.order.label(), "sorted table");
        next
    }

    /// Picks the filter field. Picking a different field resets the value
    /// selection; the displayed subset is left alone until a value is chosen.
    pub fn select_filter_field(&mut self, field: Option<FilterField>) {
        self.filter_field = field;
    }

    /// Values selectable for the current filter field.
    pub fn filter_options(&self) -> Vec<String> {
        match self.filter_field {
            Some(field) => distinct_values(&self.full, field),
            None => Vec::new(),
        }
    }

    /// Applies `value` to the selected filter field. Returns false when no
    /// field is selected or the value is empty; nothing changes then.
    pub fn select_filter_value(&mut self, value: &str) -> bool {
        let Some(field) = self.filter_field else {
            return false;
        };
        if value.is_empty() {
            return false;
        }
        self.filter = Some(FilterState {
            field,
            value: value.to_string(),
        });
        self.recompute();
        tracing::debug!(
            field = %field,
            value,
            shown = self.displayed.len(),
            "filtered table"
        );
        true
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.filter_field = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.displayed = project(&self.full, self.filter.as_ref(), self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionType};

    fn item(category: &str, kind: QuestionType, difficulty: Difficulty) -> TriviaItem {
        TriviaItem {
            category: category.to_string(),
            kind,
            difficulty,
            question: format!("q-{category}"),
            correct_answer: "yes".to_string(),
            incorrect_answers: vec!["no".to_string()],
        }
    }

    fn three() -> Vec<TriviaItem> {
        vec![
            item("A", QuestionType::Multiple, Difficulty::Medium),
            item("B", QuestionType::Boolean, Difficulty::Easy),
            item("A", QuestionType::Boolean, Difficulty::Hard),
        ]
    }

    fn difficulties(view: &TriviaView) -> Vec<&str> {
        view.displayed()
            .iter()
            .map(|i| i.difficulty.as_str())
            .collect()
    }

    #[test]
    fn fresh_view_is_empty_and_pending() {
        let view = TriviaView::new();
        assert!(view.full().is_empty());
        assert!(view.displayed().is_empty());
        assert_eq!(view.load_state(), LoadState::Pending);
    }

    #[test]
    fn dataset_initializes_identical_displayed_copy() {
        let view = TriviaView::with_dataset(three());
        assert_eq!(view.displayed(), view.full());
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert!(view.sort_state().is_none());
        assert!(view.filter_state().is_none());
    }

    #[test]
    fn difficulty_header_clicks_toggle_order() {
        let mut view = TriviaView::with_dataset(three());
        view.sort_by(SortField::Difficulty);
        assert_eq!(difficulties(&view), vec!["easy", "medium", "hard"]);
        view.sort_by(SortField::Difficulty);
        assert_eq!(difficulties(&view), vec!["hard", "medium", "easy"]);
        let third = view.sort_by(SortField::Difficulty);
        assert_eq!(third.order, SortOrder::Ascending);
        assert_eq!(difficulties(&view), vec!["easy", "medium", "hard"]);
    }

    #[test]
    fn sorting_never_touches_full_dataset() {
        let mut view = TriviaView::with_dataset(three());
        view.sort_by(SortField::Category);
        view.sort_by(SortField::Category);
        assert_eq!(view.full(), three().as_slice());
    }

    #[test]
    fn lowercase_category_filter_matches_uppercase_values() {
        let mut view = TriviaView::with_dataset(three());
        view.select_filter_field(Some(FilterField::Category));
        assert!(view.select_filter_value("a"));
        assert_eq!(view.displayed().len(), 2);
        assert!(view.displayed().iter().all(|i| i.category == "A"));
    }

    #[test]
    fn filter_rederives_from_full_dataset() {
        let mut view = TriviaView::with_dataset(three());
        view.select_filter_field(Some(FilterField::Category));
        view.select_filter_value("B");
        assert_eq!(view.displayed().len(), 1);

        view.select_filter_field(Some(FilterField::Difficulty));
        view.select_filter_value("hard");
        assert_eq!(view.displayed().len(), 1);
        assert_eq!(view.displayed()[0].difficulty, Difficulty::Hard);
        assert_eq!(view.displayed()[0].category, "A");
    }

    #[test]
    fn filter_reapplies_active_sort() {
        let mut view = TriviaView::with_dataset(three());
        view.sort_by(SortField::Difficulty);
        view.sort_by(SortField::Difficulty);
        view.select_filter_field(Some(FilterField::Category));
        view.select_filter_value("a");
        assert_eq!(difficulties(&view), vec!["hard", "medium"]);
        assert_eq!(
            view.sort_state(),
            Some(SortState {
                field: SortField::Difficulty,
                order: SortOrder::Descending
            })
        );
    }

    #[test]
    fn field_without_value_is_inert() {
        let mut view = TriviaView::with_dataset(three());
        view.select_filter_field(Some(FilterField::Type));
        assert_eq!(view.displayed().len(), 3);
        assert!(!view.select_filter_value(""));
        assert_eq!(view.displayed().len(), 3);

        view.select_filter_field(None);
        assert!(!view.select_filter_value("boolean"));
        assert!(view.filter_state().is_none());
    }

    #[test]
    fn changing_field_resets_selected_value() {
        let mut view = TriviaView::with_dataset(three());
        view.select_filter_field(Some(FilterField::Type));
        view.select_filter_value("boolean");
        assert_eq!(view.selected_value(), Some("boolean"));

        view.select_filter_field(Some(FilterField::Category));
        assert_eq!(view.selected_value(), None);
        assert_eq!(view.displayed().len(), 2);
        assert_eq!(view.filter_options(), vec!["A", "B"]);
    }

    #[test]
    fn clearing_filter_restores_excluded_items() {
        let mut view = TriviaView::with_dataset(three());
        view.select_filter_field(Some(FilterField::Difficulty));
        view.select_filter_value("easy");
        assert_eq!(view.displayed().len(), 1);
        view.clear_filter();
        assert_eq!(view.displayed().len(), 3);
        assert!(view.filter_field().is_none());
    }

    #[test]
    fn project_is_pure_over_inputs() {
        let full = three();
        let filter = FilterState {
            field: FilterField::Type,
            value: "bool".to_string(),
        };
        let sort = SortState {
            field: SortField::Difficulty,
            order: SortOrder::Ascending,
        };
        let out = project(&full, Some(&filter), Some(sort));
        let diffs: Vec<_> = out.iter().map(|i| i.difficulty.as_str()).collect();
        assert_eq!(diffs, vec!["easy", "hard"]);
        assert_eq!(full, three());
    }
}
