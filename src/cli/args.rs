use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "masjid", version, author, about = "Prayer times, Hijri date and Iftar countdown for your masjid")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full-screen prayer board (the default)
    Board,
    /// Refresh once and print today's prayer times
    Times,
    /// Print the Hijri date
    Hijri {
        /// Gregorian date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Skip the remote source and use the local approximation
        #[arg(long)]
        offline: bool,
    },
    /// Print the time left until Maghrib
    Countdown,
    /// Compute a seasonal fallback table for the configured location
    Calibrate {
        /// Save the table into config.toml
        #[arg(long)]
        write: bool,
    },
    /// Inspect or clear the cached prayer data
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show the cached snapshot and Hijri date
    Show,
    /// Delete the cached snapshot
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_board() {
        let cli = Cli::try_parse_from(["masjid"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn hijri_takes_an_iso_date() {
        let cli = Cli::try_parse_from(["masjid", "hijri", "--date", "2026-03-20", "--offline"])
            .unwrap();
        match cli.command {
            Some(Commands::Hijri { date, offline }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 20));
                assert!(offline);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(Cli::try_parse_from(["masjid", "hijri", "--date", "20-03-2026"]).is_err());
    }

    #[test]
    fn cache_needs_an_action() {
        assert!(Cli::try_parse_from(["masjid", "cache"]).is_err());
        let cli = Cli::try_parse_from(["masjid", "cache", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Cache {
                action: CacheCommands::Clear
            })
        ));
    }
}
