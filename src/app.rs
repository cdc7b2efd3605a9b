use std::sync::Arc;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::commands::{self, Command, ValueChoice};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::loader::{self, LoadOutcome, Loader, LoaderOptions};
use crate::output::{self, OutputFormat, OutputTable};
use crate::view::{FilterField, LoadState, SortField, TriviaView};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trivia_table={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    loader: LoaderOptions,
    sort_clicks: Vec<SortField>,
    filter_field: Option<FilterField>,
    filter_value: Option<String>,
    list_values: bool,
    interactive: bool,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let endpoint = args
        .endpoint
        .or(cfg.endpoint)
        .unwrap_or_else(|| loader::DEFAULT_ENDPOINT.to_string());
    let amount = args.amount.or(cfg.amount).unwrap_or(loader::DEFAULT_AMOUNT);
    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(loader::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let sort_raw = if args.sort.is_empty() {
        cfg.sort.unwrap_or_default()
    } else {
        args.sort
    };
    let sort_clicks = crate::utils::parse_sort_clicks(&sort_raw)
        .map_err(|e| format!("invalid sort {e}"))?;

    // The value only makes sense for the field it came with, so both come
    // from the same source.
    let (filter_field_raw, filter_value) = if args.filter_field.is_some() {
        (args.filter_field, args.filter_value)
    } else {
        (cfg.filter_field, cfg.filter_value)
    };
    let filter_field = match filter_field_raw.as_deref() {
        Some(raw) => Some(
            crate::utils::parse_filter_field(raw)
                .map_err(|e| format!("invalid filter field '{raw}': {e}"))?,
        ),
        None => None,
    };
    if filter_value.is_some() && filter_field.is_none() {
        return Err("filter value requires a filter field".to_string());
    }
    if args.list_values && filter_field.is_none() {
        return Err("--list-values requires --filter-field".to_string());
    }

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        loader: LoaderOptions {
            endpoint,
            amount,
            timeout_seconds: timeout,
            proxy,
        },
        sort_clicks,
        filter_field,
        filter_value,
        list_values: args.list_values,
        interactive: args.interactive,
        output,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

/// Applies the configured selections in the order a user would: pick the
/// filter, then click the headers.
fn apply_initial_selections(view: &mut TriviaView, run: &RunConfig) {
    if let Some(field) = run.filter_field {
        view.select_filter_field(Some(field));
        if let Some(value) = run.filter_value.as_deref() {
            view.select_filter_value(value);
        }
    }
    for field in run.sort_clicks.iter() {
        view.sort_by(*field);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum CommandOutcome {
    Render,
    Print(String),
    Quit,
}

fn format_options(options: &[String]) -> String {
    if options.is_empty() {
        return "(no values)".to_string();
    }
    options
        .iter()
        .enumerate()
        .map(|(i, v)| format!("  #{} {}", i + 1, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Values for the chosen field followed by the value currently selected for
/// it; switching fields shows `(none)` until a value is picked.
fn describe_selector(view: &TriviaView) -> String {
    format!(
        "{}\n  selected: {}",
        format_options(&view.filter_options()),
        view.selected_value().unwrap_or("(none)")
    )
}

fn apply_command(view: &mut TriviaView, cmd: Command) -> CommandOutcome {
    match cmd {
        Command::Sort(field) => {
            view.sort_by(field);
            CommandOutcome::Render
        }
        Command::Field(None) => {
            view.select_filter_field(None);
            CommandOutcome::Print("filter field cleared; choose one to filter".to_string())
        }
        Command::Field(Some(field)) => {
            view.select_filter_field(Some(field));
            CommandOutcome::Print(describe_selector(view))
        }
        Command::Values => match view.filter_field() {
            Some(_) => CommandOutcome::Print(describe_selector(view)),
            None => CommandOutcome::Print("choose a field first (field <name>)".to_string()),
        },
        Command::Value(choice) => {
            if view.filter_field().is_none() {
                return CommandOutcome::Print("choose a field first (field <name>)".to_string());
            }
            let value = match choice {
                ValueChoice::Text(text) => text,
                ValueChoice::Index(idx) => match view.filter_options().get(idx - 1) {
                    Some(v) => v.clone(),
                    None => return CommandOutcome::Print(format!("no value #{idx}")),
                },
            };
            if view.select_filter_value(&value) {
                CommandOutcome::Render
            } else {
                CommandOutcome::Print("nothing to filter on".to_string())
            }
        }
        Command::Clear => {
            view.clear_filter();
            CommandOutcome::Render
        }
        Command::Show => CommandOutcome::Render,
        Command::Help => CommandOutcome::Print(commands::HELP.to_string()),
        Command::Quit => CommandOutcome::Quit,
    }
}

fn render_table(view: &TriviaView, format: OutputFormat, styled: bool) -> Vec<u8> {
    output::render(&OutputTable::from_view(view), format, styled)
}

async fn run_interactive(view: Arc<Mutex<TriviaView>>, run: &RunConfig) -> Result<(), String> {
    let styled = !run.no_color;
    {
        let view = view.lock().await;
        print!(
            "{}",
            String::from_utf8_lossy(&render_table(&view, OutputFormat::Text, styled))
        );
    }
    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read command: {e}")),
        };
        let cmd = match commands::parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let mut view = view.lock().await;
        match apply_command(&mut view, cmd) {
            CommandOutcome::Render => {
                print!(
                    "{}",
                    String::from_utf8_lossy(&render_table(&view, OutputFormat::Text, styled))
                );
                println!("{}", output::summarize(&OutputTable::from_view(&view)));
            }
            CommandOutcome::Print(text) => println!("{text}"),
            CommandOutcome::Quit => break,
        }
    }
    Ok(())
}

async fn write_output(path: &str, rendered: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(rendered)
        .await
        .map_err(|e| format!("failed to write output file: {e}"))
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let now = Instant::now();

    let loader = Loader::new(run.loader.clone()).map_err(|e| e.to_string())?;
    format_kv_line("Source", loader.url().as_str());
    format_kv_line("Timeout", &format!("{}s", run.loader.timeout_seconds));
    if let Some(proxy) = run.loader.proxy.as_deref() {
        format_kv_line("Proxy", proxy);
    }

    let view = Arc::new(Mutex::new(TriviaView::new()));

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message("fetching questions");

    let handle = loader::spawn_load(loader, Arc::downgrade(&view));
    let outcome = handle
        .await
        .map_err(|e| format!("load task failed: {e}"))?;
    pb.finish_and_clear();

    let mut guard = view.lock().await;
    match outcome {
        LoadOutcome::Applied { items } => {
            format_kv_line("Loaded", &format!("{items} questions"));
        }
        LoadOutcome::Failed | LoadOutcome::Discarded => {
            format_kv_line("Loaded", "0 questions (see log)");
        }
    }
    apply_initial_selections(&mut guard, &run);

    if run.list_values {
        for value in guard.filter_options() {
            println!("{value}");
        }
        return Ok(());
    }

    if run.interactive {
        drop(guard);
        return run_interactive(view, &run).await;
    }

    let table = OutputTable::from_view(&guard);
    format_kv_line("View", &output::summarize(&table));

    match run.output.as_deref() {
        Some(path) => {
            let rendered = output::render(&table, run.output_format, false);
            write_output(path, &rendered).await?;
            format_kv_line("Output", path);
        }
        None => {
            let rendered = output::render(&table, run.output_format, !run.no_color);
            print!("{}", String::from_utf8_lossy(&rendered));
        }
    }

    if guard.load_state() == LoadState::Failed {
        tracing::warn!("table is empty because the question bank could not be loaded");
    }
    tracing::debug!(elapsed_ms = now.elapsed().as_millis() as u64, "done");
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    init_tracing(args.verbose);

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "could not determine home directory".to_string())?,
        };
        if config::ensure_default_config_file(&path)? {
            println!("wrote {}", path.display());
        } else {
            println!("{} already exists", path.display());
        }
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    tracing::debug!(
        verbose = run.verbose,
        interactive = crate::utils::format_bool(run.interactive),
        "starting"
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
