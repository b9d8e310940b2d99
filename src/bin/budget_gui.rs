use budget_tracker::config::Cli;
use budget_tracker::db::connection::establish_connection;
use budget_tracker::logging;
use budget_tracker::operations::gui::run_gui;
use clap::Parser;
use tracing::error;
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    // Anything written to stderr would land on top of the UI, so stay quiet unless asked.
    logging::init(cli.verbose, LevelFilter::OFF);

    let result = establish_connection(&cli.db).and_then(|conn| run_gui(&conn));
    if let Err(e) = result {
        error!(error = %e, "budget tracker GUI stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
