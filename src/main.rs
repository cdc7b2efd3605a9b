use std::process::exit;

fn main() {
    if let Err(e) = trivia_table::app::run_cli() {
        eprintln!("{e}");
        exit(1);
    }
}
