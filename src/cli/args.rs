use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "trivia-table",
    version,
    about = "browse Open Trivia DB questions as a sortable, filterable table",
    long_about = "trivia-table fetches a batch of trivia questions, decodes their HTML entities and renders them as a table you can sort and filter.\n\nExamples:\n  trivia-table\n  trivia-table --sort difficulty --sort difficulty\n  trivia-table --filter-field category --filter-value film -o film.html\n  trivia-table --interactive\n\nTip: repeat --sort to click the same header again (ascending, then descending)."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the table to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'e',
        long = "ep",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Input",
        help = "Question bank endpoint (defaults to https://opentdb.com/api.php)."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'N',
        long = "amt",
        visible_alias = "amount",
        value_name = "N",
        help_heading = "Input",
        help = "Number of questions to fetch (1-50)."
    )]
    pub amount: Option<u32>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.trivia-table/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 's',
        long = "srt",
        visible_alias = "sort",
        value_name = "FIELD",
        action = ArgAction::Append,
        help_heading = "View",
        help = "Click a column header (repeatable): category, type, difficulty, question, correct_answer."
    )]
    pub sort: Vec<String>,

    #[arg(
        short = 'f',
        long = "ff",
        visible_alias = "filter-field",
        value_name = "FIELD",
        help_heading = "View",
        help = "Field to filter on: type, difficulty or category."
    )]
    pub filter_field: Option<String>,

    #[arg(
        short = 'F',
        long = "fv",
        visible_alias = "filter-value",
        value_name = "TEXT",
        help_heading = "View",
        help = "Keep rows whose filter field contains TEXT (case-insensitive)."
    )]
    pub filter_value: Option<String>,

    #[arg(
        short = 'l',
        long = "lv",
        visible_alias = "list-values",
        help_heading = "View",
        help = "Print the selectable values of --filter-field and exit."
    )]
    pub list_values: bool,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "View",
        help = "Browse the table with line commands (sort, field, value, clear, show, quit)."
    )]
    pub interactive: bool,
}
