use quick_xml::escape::escape;

use super::{summarize, Column, OutputTable};

const STYLE: &str = r#"
    body { font-family: 'Inter', sans-serif; margin: 2rem; color: #0f172a; background: #f8fafc; }
    h1 { font-family: 'Montserrat', sans-serif; font-weight: 800; letter-spacing: -0.025em; }
    p.summary { color: #64748b; font-weight: 500; }
    table { border-collapse: collapse; width: 100%; background: #fff; }
    th, td { border: 1px solid #e2e8f0; padding: 0.5rem 0.75rem; text-align: left; vertical-align: top; }
    th { background: #f1f5f9; font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.1em; }
    th.sortable { color: #135bec; }
    tr:hover td { background: #f8fafc; }
"#;

/// Static report of the displayed subset. Every cell goes through `escape`,
/// so decoded text that looks like markup is shown, never interpreted.
pub fn render_html(table: &OutputTable<'_>) -> Vec<u8> {
    let mut head = String::new();
    for column in Column::ALL {
        let class = if column.sort_field().is_some() {
            " class=\"sortable\""
        } else {
            ""
        };
        head.push_str(&format!(
            "          <th{class}>{}</th>\n",
            escape(column.header(table.sort).as_str())
        ));
    }

    let mut body = String::new();
    for item in table.items {
        body.push_str("        <tr>\n");
        for column in Column::ALL {
            body.push_str(&format!(
                "          <td>{}</td>\n",
                escape(column.cell(item).as_ref())
            ));
        }
        body.push_str("        </tr>\n");
    }

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Trivia Questions</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Trivia Questions</h1>
  <p class="summary">{summary}</p>
  <table>
    <thead>
      <tr>
{head}      </tr>
    </thead>
    <tbody>
{body}    </tbody>
  </table>
</body>
</html>
"####,
        summary = escape(summarize(table).as_str()),
    );

    html.into_bytes()
}
