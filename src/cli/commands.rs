use crate::view::{FilterField, SortField};

/// One line of input in interactive mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Sort(SortField),
    /// `None` puts the selector back on "Select a field".
    Field(Option<FilterField>),
    Value(ValueChoice),
    Values,
    Clear,
    Show,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueChoice {
    Text(String),
    /// 1-based position in the listed values (`#2`).
    Index(usize),
}

pub const HELP: &str = "\
commands:
  sort <field>        click a header (category, type, difficulty, question, correct_answer)
  field [<field>]     choose the filter field (type, difficulty, category) and list its values
  value <text|#n>     filter on text, or on the n-th listed value
  values              list values for the chosen field
  clear               remove the filter
  show                print the table
  help                this text
  quit                leave";

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let cmd = match verb.to_lowercase().as_str() {
        "sort" | "s" => {
            if rest.is_empty() {
                return Err("sort needs a field".to_string());
            }
            Command::Sort(crate::utils::parse_sort_field(rest)?)
        }
        "field" | "f" => {
            if rest.is_empty() {
                Command::Field(None)
            } else {
                Command::Field(Some(crate::utils::parse_filter_field(rest)?))
            }
        }
        "value" | "v" => {
            if rest.is_empty() {
                return Err("value needs text or #index".to_string());
            }
            match rest.strip_prefix('#') {
                Some(n) => {
                    let idx: usize = n
                        .trim()
                        .parse()
                        .map_err(|_| format!("invalid index '{n}'"))?;
                    if idx == 0 {
                        return Err("indexes start at 1".to_string());
                    }
                    Command::Value(ValueChoice::Index(idx))
                }
                None => Command::Value(ValueChoice::Text(rest.to_string())),
            }
        }
        "values" => Command::Values,
        "clear" => Command::Clear,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sort_and_field() {
        assert_eq!(
            parse_command("sort Difficulty").unwrap(),
            Some(Command::Sort(SortField::Difficulty))
        );
        assert_eq!(
            parse_command("  field   category ").unwrap(),
            Some(Command::Field(Some(FilterField::Category)))
        );
        assert_eq!(parse_command("field").unwrap(), Some(Command::Field(None)));
    }

    #[test]
    fn value_keeps_inner_spaces_and_supports_index() {
        assert_eq!(
            parse_command("value Entertainment: Film").unwrap(),
            Some(Command::Value(ValueChoice::Text(
                "Entertainment: Film".to_string()
            )))
        );
        assert_eq!(
            parse_command("v #3").unwrap(),
            Some(Command::Value(ValueChoice::Index(3)))
        );
        assert!(parse_command("value #0").is_err());
    }

    #[test]
    fn blank_lines_are_ignored_and_unknown_verbs_rejected() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("dance").unwrap_err().contains("unknown command"));
        assert!(parse_command("sort").is_err());
        assert!(parse_command("field question").is_err());
    }
}
