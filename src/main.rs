use budget_tracker::config::Cli;
use budget_tracker::db::connection::establish_connection;
use budget_tracker::error::Result;
use budget_tracker::logging;
use budget_tracker::operations::menu::run_menu;
use clap::Parser;
use std::io;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, LevelFilter::WARN);

    if let Err(e) = run(&cli) {
        error!(error = %e, "budget tracker stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let conn = establish_connection(&cli.db)?;
    info!(db = %cli.db.display(), "budget tracker ready");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_menu(&conn, &mut input, &mut output)?;

    info!("budget tracker finished");
    Ok(())
}
