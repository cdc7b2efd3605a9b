use std::cmp::Ordering;
use std::fmt;

use super::collate::locale_compare;
use crate::model::TriviaItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Category,
    Type,
    Difficulty,
    Question,
    CorrectAnswer,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Category,
        SortField::Type,
        SortField::Difficulty,
        SortField::Question,
        SortField::CorrectAnswer,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "category" => Some(Self::Category),
            "type" => Some(Self::Type),
            "difficulty" => Some(Self::Difficulty),
            "question" => Some(Self::Question),
            "correct_answer" | "answer" => Some(Self::CorrectAnswer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Type => "type",
            Self::Difficulty => "difficulty",
            Self::Question => "question",
            Self::CorrectAnswer => "correct_answer",
        }
    }

    pub fn compare(self, a: &TriviaItem, b: &TriviaItem) -> Ordering {
        match self {
            Self::Type => a.kind.rank().cmp(&b.kind.rank()),
            Self::Difficulty => a.difficulty.rank().cmp(&b.difficulty.rank()),
            Self::Category => locale_compare(&a.category, &b.category),
            Self::Question => locale_compare(&a.question, &b.question),
            Self::CorrectAnswer => locale_compare(&a.correct_answer, &b.correct_answer),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    /// State after a click on `field`'s header.
    ///
    /// Only a second click on the field that is currently ascending flips to
    /// descending; everything else starts over ascending.
    pub fn toggle(current: Option<SortState>, field: SortField) -> SortState {
        let order = match current {
            Some(s) if s.field == field && s.order == SortOrder::Ascending => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };
        SortState { field, order }
    }
}

/// Stable in-place sort; ties keep their current relative order.
pub fn sort_items(items: &mut [TriviaItem], state: SortState) {
    match state.order {
        SortOrder::Ascending => items.sort_by(|a, b| state.field.compare(a, b)),
        SortOrder::Descending => items.sort_by(|a, b| state.field.compare(b, a)),
    }
}
