pub mod report;

use std::borrow::Cow;

use colored::Colorize;

use crate::model::TriviaItem;
use crate::view::{FilterState, SortField, SortState, TriviaView};

const MAX_CELL_WIDTH: usize = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Category,
    Type,
    Difficulty,
    Question,
    CorrectAnswer,
    IncorrectAnswers,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Category,
        Column::Type,
        Column::Difficulty,
        Column::Question,
        Column::CorrectAnswer,
        Column::IncorrectAnswers,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Type => "Type",
            Self::Difficulty => "Difficulty",
            Self::Question => "Question",
            Self::CorrectAnswer => "Correct Answer",
            Self::IncorrectAnswers => "Incorrect Answers",
        }
    }

    /// Only these three headers are clickable in the table.
    pub fn sort_field(self) -> Option<SortField> {
        match self {
            Self::Category => Some(SortField::Category),
            Self::Type => Some(SortField::Type),
            Self::Difficulty => Some(SortField::Difficulty),
            _ => None,
        }
    }

    pub fn cell(self, item: &TriviaItem) -> Cow<'_, str> {
        match self {
            Self::Category => Cow::Borrowed(item.category.as_str()),
            Self::Type => Cow::Borrowed(item.kind.as_str()),
            Self::Difficulty => Cow::Borrowed(item.difficulty.as_str()),
            Self::Question => Cow::Borrowed(item.question.as_str()),
            Self::CorrectAnswer => Cow::Borrowed(item.correct_answer.as_str()),
            Self::IncorrectAnswers => Cow::Owned(item.incorrect_answers_joined()),
        }
    }

    /// Header text with the direction arrow when this column is the active
    /// sort.
    pub fn header(self, sort: Option<SortState>) -> String {
        match (self.sort_field(), sort) {
            (Some(field), Some(s)) if s.field == field => {
                format!("{} {}", self.title(), s.order.arrow())
            }
            _ => self.title().to_string(),
        }
    }
}

/// What gets rendered: the displayed subset plus the selections that
/// produced it.
#[derive(Clone, Copy, Debug)]
pub struct OutputTable<'a> {
    pub items: &'a [TriviaItem],
    pub total: usize,
    pub sort: Option<SortState>,
    pub filter: Option<&'a FilterState>,
}

impl<'a> OutputTable<'a> {
    pub fn from_view(view: &'a TriviaView) -> Self {
        Self {
            items: view.displayed(),
            total: view.full().len(),
            sort: view.sort_state(),
            filter: view.filter_state(),
        }
    }
}

fn truncate_cell(value: &str, width: usize) -> Cow<'_, str> {
    let count = value.chars().count();
    let multiline = value.contains('\n');
    if count <= width && !multiline {
        return Cow::Borrowed(value);
    }
    let flat = value.chars().map(|c| if c == '\n' { ' ' } else { c });
    if count <= width {
        return Cow::Owned(flat.collect());
    }
    let mut out: String = flat.take(width.saturating_sub(1)).collect();
    out.push('…');
    Cow::Owned(out)
}

pub fn render_text(table: &OutputTable<'_>, styled: bool) -> Vec<u8> {
    let headers: Vec<String> = Column::ALL.iter().map(|c| c.header(table.sort)).collect();
    let rows: Vec<Vec<String>> = table
        .items
        .iter()
        .map(|item| {
            Column::ALL
                .iter()
                .map(|c| truncate_cell(&c.cell(item), MAX_CELL_WIDTH).into_owned())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows.iter() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect::<Vec<_>>()
        .join(" | ");
    if styled {
        out.push_str(&header_line.bold().to_string());
    } else {
        out.push_str(&header_line);
    }
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');

    for row in rows.iter() {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(table: &OutputTable<'_>) -> Vec<u8> {
    serde_json::to_vec_pretty(table.items).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render_html(table: &OutputTable<'_>) -> Vec<u8> {
    report::render_html(table)
}

pub fn render(table: &OutputTable<'_>, format: OutputFormat, styled: bool) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(table, styled),
        OutputFormat::Json => render_json(table),
        OutputFormat::Html => render_html(table),
    }
}

/// One-line description of the active selections, e.g.
/// `3/50 shown filter=category~"film" sort=difficulty desc`.
pub fn summarize(table: &OutputTable<'_>) -> String {
    let mut parts = vec![format!("{}/{} shown", table.items.len(), table.total)];
    if let Some(f) = table.filter {
        parts.push(format!("filter={}~{:?}", f.field, f.value));
    }
    if let Some(s) = table.sort {
        parts.push(format!("sort={} {}", s.field, s.order.label()));
    }
    parts.join(" ")
}
