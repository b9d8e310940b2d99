use crate::db::connection::DEFAULT_DB_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Command-line options shared by the text menu and the terminal GUI.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Personal budget tracker backed by a local SQLite file")]
pub struct Cli {
    /// Path of the SQLite database file (created if missing)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["budget"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("budget_tracker.db"));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_db_and_verbosity() {
        let cli = Cli::try_parse_from(["budget", "--db", "/tmp/money.db", "-vv"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/money.db"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["budget", "extra"]).is_err());
    }
}
