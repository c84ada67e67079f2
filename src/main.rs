use std::process::exit;

fn main() {
    if let Err(e) = exercise_editor::app::run_cli() {
        eprintln!("error: {e}");
        exit(1);
    }
}
