use std::fmt;

use itertools::Itertools;

use crate::model::TriviaItem;

/// Fields offered by the filter selector. Free-text columns are sortable but
/// not filterable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
    Type,
    Difficulty,
    Category,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::Type,
        FilterField::Difficulty,
        FilterField::Category,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "type" => Some(Self::Type),
            "difficulty" => Some(Self::Difficulty),
            "category" => Some(Self::Category),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Difficulty => "difficulty",
            Self::Category => "category",
        }
    }

    pub fn value_of(self, item: &TriviaItem) -> &str {
        match self {
            Self::Type => item.kind.as_str(),
            Self::Difficulty => item.difficulty.as_str(),
            Self::Category => item.category.as_str(),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub field: FilterField,
    pub value: String,
}

impl FilterState {
    pub fn matches(&self, item: &TriviaItem) -> bool {
        self.field
            .value_of(item)
            .to_lowercase()
            .contains(&self.value.to_lowercase())
    }
}

/// Items of `full` whose field contains `state.value`, case-insensitively,
/// in dataset order.
pub fn filter_items(full: &[TriviaItem], state: &FilterState) -> Vec<TriviaItem> {
    full.iter().filter(|item| state.matches(item)).cloned().collect()
}

/// Distinct values of `field` across `full`, first-seen order.
pub fn distinct_values(full: &[TriviaItem], field: FilterField) -> Vec<String> {
    full.iter()
        .map(|item| field.value_of(item))
        .unique()
        .map(str::to_string)
        .collect()
}
