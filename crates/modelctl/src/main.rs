use modelctl_core::init_logging;

mod app;
mod commands;
mod table;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Quiet unless asked otherwise; stdout is reserved for command output
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    if commands::run_command(&matches).is_err() {
        std::process::exit(1);
    }
}
