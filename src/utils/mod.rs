use crate::view::{FilterField, SortField};

pub fn parse_sort_field(value: &str) -> Result<SortField, String> {
    SortField::parse(value).ok_or_else(|| {
        let names: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown sort field, expected one of {}", names.join(", "))
    })
}

pub fn parse_filter_field(value: &str) -> Result<FilterField, String> {
    FilterField::parse(value).ok_or_else(|| {
        let names: Vec<&str> = FilterField::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown filter field, expected one of {}", names.join(", "))
    })
}

/// Parses header clicks in order. Each entry may itself be a comma-separated
/// list, so `["type,type", "category"]` is three clicks.
pub fn parse_sort_clicks(values: &[String]) -> Result<Vec<SortField>, String> {
    let mut out = Vec::new();
    for value in values {
        for part in value.split(',') {
            let item = part.trim();
            if item.is_empty() {
                continue;
            }
            out.push(parse_sort_field(item).map_err(|e| format!("'{item}': {e}"))?);
        }
    }
    Ok(out)
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
