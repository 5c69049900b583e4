//! Command line schema for the subway binary.

use clap::{Parser, Subcommand};

/// Manage subway stations, lines and their sections.
#[derive(Parser, Debug)]
#[command(name = "subway", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Station registry commands
    Station {
        #[command(subcommand)]
        action: StationAction,
    },
    /// Line commands
    Line {
        #[command(subcommand)]
        action: LineAction,
    },
    /// Section editing commands
    Section {
        #[command(subcommand)]
        action: SectionAction,
    },
    /// Print the ordered stations of one line, or of every line
    Show {
        /// Line id; omit to show the whole network
        line: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StationAction {
    /// Register a station
    Add { name: String },
    /// List every station
    List,
    /// Rename a station
    Rename { id: u64, name: String },
    /// Delete a station no line uses
    Remove { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum LineAction {
    /// Create an empty line
    Add { name: String, color: String },
    /// List every line
    List,
    /// Change a line's name and color
    Update { id: u64, name: String, color: String },
    /// Delete a line and its sections
    Remove { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SectionAction {
    /// Add the section UP -> DOWN to a line
    Add {
        line: u64,
        up: u64,
        down: u64,
        distance: u32,
    },
    /// Place STATION next to BASE on a line
    Place {
        line: u64,
        station: u64,
        base: u64,
        distance: u32,
        /// UP places the station above BASE, DOWN below it
        #[arg(long, default_value = "")]
        direction: String,
    },
    /// Remove a station from a line, merging its neighbouring sections
    Remove { line: u64, station: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_section_place() {
        let cli = Cli::try_parse_from([
            "subway", "section", "place", "1", "3", "1", "4", "--direction", "DOWN",
        ])
        .expect("valid arguments");
        match cli.command {
            Command::Section {
                action:
                    SectionAction::Place {
                        line,
                        station,
                        base,
                        distance,
                        direction,
                    },
            } => {
                assert_eq!((line, station, base, distance), (1, 3, 1, 4));
                assert_eq!(direction, "DOWN");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_line_is_optional() {
        let cli = Cli::try_parse_from(["subway", "show"]).expect("valid arguments");
        assert!(matches!(cli.command, Command::Show { line: None }));
    }

    #[test]
    fn rejects_negative_distance() {
        assert!(Cli::try_parse_from(["subway", "section", "add", "1", "1", "2", "-3"]).is_err());
    }
}
